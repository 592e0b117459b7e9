//! Diagram export for built machines.
//!
//! The exporter walks the live tree through [`StateView`]s and renders it
//! as PlantUML or Mermaid state diagram text. States are named by their
//! declared names; output follows declaration order so repeated exports of
//! an unchanged machine are identical.

use crate::core::{ChildMode, Event, State, StateKind};
use crate::machine::{Machine, StateView};
use serde::{Deserialize, Serialize};

const INDENT: &str = "    ";

/// Diagram dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    PlantUml,
    Mermaid,
}

/// Options controlling diagram export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: DiagramFormat,
    /// Mark the currently active states.
    pub highlight_active: bool,
    pub title: Option<String>,
}

/// Renders a machine's tree as diagram text.
///
/// # Example
///
/// ```
/// use statecraft::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
/// use statecraft::export::{DiagramExporter, DiagramFormat, ExportOptions};
/// use statecraft::{event_enum, state_enum};
///
/// state_enum! {
///     enum Light {
///         Root,
///         Red,
///         Green,
///     }
/// }
///
/// event_enum! {
///     enum Signal {
///         Go,
///     }
/// }
///
/// let root = StateBuilder::<Light, Signal, ()>::new(Light::Root)
///     .initial(StateBuilder::new(Light::Red).transition(TransitionBuilder::on("Go").target(Light::Green)))
///     .child(StateBuilder::new(Light::Green));
/// let machine = MachineBuilder::new(root).build().unwrap();
///
/// let exporter = DiagramExporter::new(ExportOptions {
///     format: DiagramFormat::Mermaid,
///     ..ExportOptions::default()
/// });
/// assert!(exporter.export(&machine).contains("Red --> Green : Go"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagramExporter {
    options: ExportOptions,
}

impl DiagramExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn export<S: State, E: Event, D>(&self, machine: &Machine<S, E, D>) -> String {
        let mut writer = Writer {
            options: &self.options,
            out: String::new(),
        };
        let root = machine.root();

        writer.header();
        writer.line(0, format!("[*] --> {}", alias(root.name())));
        writer.declare(root, 0);
        writer.edges(root, 0);

        if self.options.highlight_active && self.options.format == DiagramFormat::Mermaid {
            let active: Vec<String> = machine
                .active_states()
                .into_iter()
                .map(|state| alias(state.name()))
                .collect();
            if !active.is_empty() {
                writer.line(0, "classDef active fill:#98fb98");
                writer.line(0, format!("class {} active", active.join(",")));
            }
        }

        writer.footer();
        writer.out
    }
}

struct Writer<'o> {
    options: &'o ExportOptions,
    out: String,
}

impl Writer<'_> {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn plant_uml(&self) -> bool {
        self.options.format == DiagramFormat::PlantUml
    }

    fn header(&mut self) {
        let title = self.options.title.clone();
        if self.plant_uml() {
            self.line(0, "@startuml");
            if let Some(title) = title {
                self.line(0, format!("title {}", single_line(&title)));
            }
            self.line(0, "hide empty description");
        } else {
            if let Some(title) = title {
                self.line(0, "---");
                self.line(0, format!("title: {}", single_line(&title)));
                self.line(0, "---");
            }
            self.line(0, "stateDiagram-v2");
        }
    }

    fn footer(&mut self) {
        if self.plant_uml() {
            self.line(0, "@enduml");
        }
    }

    /// Declare `state` and, for composites, its nested block.
    fn declare<S: State, E, D>(&mut self, state: StateView<'_, S, E, D>, depth: usize) {
        let name = state.name();
        let id = alias(name);
        let highlight = if self.plant_uml() && self.options.highlight_active && state.is_active() {
            " #palegreen"
        } else {
            ""
        };
        let children = state.children();

        let head = if is_identifier(name) {
            format!("state {id}")
        } else if self.plant_uml() {
            format!("state \"{}\" as {id}", single_line(name))
        } else {
            // Mermaid cannot open a block on a described state.
            self.line(depth, format!("state \"{}\" as {id}", single_line(name)));
            if children.is_empty() {
                return;
            }
            format!("state {id}")
        };

        if children.is_empty() {
            self.line(depth, format!("{head}{highlight}"));
            return;
        }

        self.line(depth, format!("{head}{highlight} {{"));
        if state.mode() == Some(ChildMode::Parallel) {
            for (index, child) in children.iter().enumerate() {
                if index > 0 {
                    self.line(depth + 1, "--");
                }
                self.declare(*child, depth + 1);
                self.edges(*child, depth + 1);
            }
        } else {
            if let Some(initial) = children.iter().find(|child| child.is_initial()) {
                self.line(depth + 1, format!("[*] --> {}", alias(initial.name())));
            }
            for child in &children {
                self.declare(*child, depth + 1);
            }
            for child in &children {
                self.edges(*child, depth + 1);
            }
        }
        self.line(depth, "}");
    }

    /// Outgoing edges of `state`, written in its parent's block.
    fn edges<S: State, E, D>(&mut self, state: StateView<'_, S, E, D>, depth: usize) {
        let id = alias(state.name());

        if state.kind() == StateKind::Final {
            self.line(depth, format!("{id} --> [*]"));
        }

        for transition in state.transitions() {
            let label = single_line(transition.label());
            if transition.is_targetless() {
                self.line(depth, format!("{id} : {label}"));
                continue;
            }
            let arrow = if transition.is_computed() && self.plant_uml() {
                "-[dashed]->"
            } else {
                "-->"
            };
            for target in transition.targets() {
                self.line(depth, format!("{id} {arrow} {} : {label}", alias(target.name())));
            }
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Diagram-safe identifier for a state name.
fn alias(name: &str) -> String {
    if is_identifier(name) {
        return name.to_string();
    }
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !id.starts_with(|c: char| c.is_ascii_alphabetic()) {
        id.insert(0, '_');
    }
    id
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ").replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
    use crate::core::HookError;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Phone {
            Root,
            Line,
            Idle,
            Busy,
            Audio,
            Muted,
            Speaking,
            Off,
        }
        final: [Off]
    }

    event_enum! {
        enum PhoneEvent {
            Dial,
            Hold,
            Mute,
            HangUp,
        }
    }

    // Root (parallel)
    // ├── Line: Idle -> Busy, Off
    // └── Audio: Muted <-> Speaking
    fn machine() -> Machine<Phone, PhoneEvent> {
        let line = StateBuilder::new(Phone::Line)
            .initial(
                StateBuilder::new(Phone::Idle)
                    .transition(TransitionBuilder::on("Dial").named("dial out").target(Phone::Busy)),
            )
            .child(
                StateBuilder::new(Phone::Busy)
                    .transition(TransitionBuilder::on("Hold").named("hold line"))
                    .transition(TransitionBuilder::on("HangUp").try_target_fn(
                        [Phone::Idle, Phone::Off],
                        |_, _| -> Result<Phone, HookError> { Ok(Phone::Off) },
                    )),
            )
            .child(StateBuilder::new(Phone::Off));
        let audio = StateBuilder::new(Phone::Audio)
            .initial(
                StateBuilder::new(Phone::Muted)
                    .transition(TransitionBuilder::on("Mute").target(Phone::Speaking)),
            )
            .child(StateBuilder::new(Phone::Speaking));
        let root = StateBuilder::new(Phone::Root).parallel().child(line).child(audio);

        MachineBuilder::new(root).build().unwrap()
    }

    fn plant_uml(machine: &Machine<Phone, PhoneEvent>) -> String {
        DiagramExporter::default().export(machine)
    }

    #[test]
    fn plant_uml_nests_composites_and_separates_regions() {
        let expected = "\
@startuml
hide empty description
[*] --> Root
state Root {
    state Line {
        [*] --> Idle
        state Idle
        state Busy
        state Off
        Idle --> Busy : dial out
        Busy : hold line
        Busy -[dashed]-> Idle : HangUp
        Busy -[dashed]-> Off : HangUp
        Off --> [*]
    }
    --
    state Audio {
        [*] --> Muted
        state Muted
        state Speaking
        Muted --> Speaking : Mute
    }
}
@enduml
";
        assert_eq!(plant_uml(&machine()), expected);
    }

    #[test]
    fn export_is_idempotent() {
        let mut machine = machine();
        machine.start().unwrap();
        machine.process(PhoneEvent::Dial).unwrap();

        assert_eq!(machine.export_diagram(), machine.export_diagram());
    }

    #[test]
    fn highlight_marks_active_states_in_plant_uml() {
        let mut machine = machine();
        machine.start().unwrap();

        let text = machine.export_diagram_with(&ExportOptions {
            highlight_active: true,
            title: Some("phone".to_string()),
            ..ExportOptions::default()
        });

        assert!(text.contains("title phone\n"));
        assert!(text.contains("state Idle #palegreen\n"));
        assert!(text.contains("state Busy\n"));
        assert!(text.contains("state Line #palegreen {\n"));
    }

    #[test]
    fn mermaid_uses_front_matter_and_class_highlights() {
        let mut machine = machine();
        machine.start().unwrap();

        let text = machine.export_diagram_with(&ExportOptions {
            format: DiagramFormat::Mermaid,
            highlight_active: true,
            title: Some("phone".to_string()),
        });

        assert!(text.starts_with("---\ntitle: phone\n---\nstateDiagram-v2\n"));
        assert!(text.contains("    Busy --> Off : HangUp\n"));
        assert!(text.contains("classDef active fill:#98fb98\n"));
        assert!(text.ends_with("class Root,Line,Idle,Audio,Muted active\n"));
        assert!(!text.contains("@startuml"));
    }

    #[test]
    fn names_that_are_not_identifiers_get_aliases() {
        #[derive(Clone, PartialEq, Debug)]
        struct Named(&'static str);

        impl State for Named {
            fn name(&self) -> &str {
                self.0
            }
        }

        let root = StateBuilder::<Named, PhoneEvent, ()>::new(Named("app state"))
            .initial(
                StateBuilder::new(Named("1:1 call"))
                    .transition(TransitionBuilder::on("HangUp").target(Named("group call"))),
            )
            .child(StateBuilder::new(Named("group call")));
        let machine = MachineBuilder::new(root).build().unwrap();

        let text = machine.export_diagram();

        assert!(text.contains("state \"app state\" as app_state {\n"));
        assert!(text.contains("    state \"1:1 call\" as _1_1_call\n"));
        assert!(text.contains("    _1_1_call --> group_call : HangUp\n"));
    }

    #[test]
    fn alias_sanitizes_names() {
        assert_eq!(alias("GroupCall"), "GroupCall");
        assert_eq!(alias("group call"), "group_call");
        assert_eq!(alias("1st"), "_1st");
        assert!(!is_identifier(""));
    }

    #[test]
    fn format_deserializes_lowercase() {
        let options: ExportOptions = serde_json::from_str(r#"{ "format": "plantuml" }"#).unwrap();

        assert_eq!(options.format, DiagramFormat::PlantUml);
        assert!(!options.highlight_active);
    }
}
