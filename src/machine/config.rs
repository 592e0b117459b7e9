//! Machine configuration.

use crate::export::ExportOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cap on events posted by hooks during one `process` call.
pub const DEFAULT_MAX_POSTED_EVENTS: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for a machine.
///
/// Every field has a default, so a configuration file only needs the
/// values it overrides.
///
/// # Example
///
/// ```rust
/// use statecraft::machine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "name": "calls", "max_posted_events": 8 }"#).unwrap();
/// assert_eq!(config.name.as_deref(), Some("calls"));
/// assert_eq!(config.max_posted_events, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name used in logs and errors. Defaults to the root state's name.
    pub name: Option<String>,

    /// Maximum number of hook-posted events drained during one `process`
    /// call. Guards against hooks that keep posting each other's events.
    pub max_posted_events: usize,

    /// Options used by `Machine::export_diagram`.
    pub export: ExportOptions,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: None,
            max_posted_events: DEFAULT_MAX_POSTED_EVENTS,
            export: ExportOptions::default(),
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DiagramFormat;

    #[test]
    fn empty_object_yields_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();

        assert_eq!(config, MachineConfig::default());
        assert_eq!(config.max_posted_events, DEFAULT_MAX_POSTED_EVENTS);
    }

    #[test]
    fn nested_export_options_are_read() {
        let config = MachineConfig::from_json(
            r#"{ "export": { "format": "mermaid", "highlight_active": true } }"#,
        )
        .unwrap();

        assert_eq!(config.export.format, DiagramFormat::Mermaid);
        assert!(config.export.highlight_active);
        assert!(config.name.is_none());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = MachineConfig::from_json("{ name: }").unwrap_err();

        assert!(err.to_string().starts_with("Invalid machine configuration"));
    }
}
