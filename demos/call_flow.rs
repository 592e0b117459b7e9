//! Call Flow
//!
//! This example models a login and group-call session as a hierarchical
//! machine and walks it through a typical session.
//!
//! Key concepts:
//! - Parallel root with a nested exclusive region
//! - Named transitions, targetless transitions and computed targets
//! - Entry, exit and triggered hooks reading machine data
//! - A listener observing state changes
//! - PlantUML export of the live tree
//!
//! Run with: RUST_LOG=statecraft=debug cargo run --example call_flow

use statecraft::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
use statecraft::core::{MachineListener, State};
use statecraft::{event_enum, state_enum};
use std::error::Error;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum AppState {
        Nysno,
        App,
        Login,
        LoginProgress,
        ChangePassword,
        RequestPermission,
        GroupCall,
        OneOnOneCall,
        AppOffline,
        AppExit,
    }
    final: [AppExit]
}

event_enum! {
    enum AppEvent {
        SubmitLoginDetails { user: String },
        LoginSuccess,
        LoginFailed,
        ChangePassword,
        ChangePasswordSuccess,
        ChangePasswordFailed,
        PermissionGranted,
        PermissionDenied,
        SwitchGroup(String),
        StartOneOnOneCall,
        EndOneOnOneCall,
        AcceptOneOnOneCall,
        MakeAppOffline,
        MakeAppOnline,
        ExitApp,
    }
}

struct Device {
    permission_granted: bool,
}

struct Screen;

impl MachineListener<AppState, AppEvent> for Screen {
    fn on_state_entered(&self, state: &AppState, _event: Option<&AppEvent>) {
        println!("  [screen] showing {}", state.name());
    }

    fn on_finished(&self) {
        println!("  [screen] session over");
    }
}

type Builder = StateBuilder<AppState, AppEvent, Device>;
type Transition = TransitionBuilder<AppState, AppEvent, Device>;

fn after_login(_: &AppEvent, device: &Device) -> AppState {
    if device.permission_granted {
        AppState::GroupCall
    } else {
        AppState::RequestPermission
    }
}

fn app() -> Builder {
    Builder::new(AppState::App)
        .initial(
            Builder::new(AppState::Login)
                .on_entry(|_| println!("  login form ready"))
                .on_exit(|_| println!("  leaving login form"))
                .transition(
                    Transition::on("SubmitLoginDetails")
                        .named("submit login details")
                        .target(AppState::LoginProgress)
                        .on_triggered(|ctx| {
                            if let AppEvent::SubmitLoginDetails { user } = ctx.event {
                                println!("  logging in {user}");
                            }
                        }),
                ),
        )
        .child(
            Builder::new(AppState::ChangePassword)
                .transition(
                    Transition::on("ChangePasswordSuccess")
                        .named("password changed")
                        .target_fn(
                            [AppState::GroupCall, AppState::RequestPermission],
                            after_login,
                        ),
                )
                .transition(
                    Transition::on("ChangePasswordFailed")
                        .named("failed changing password")
                        .target(AppState::ChangePassword),
                ),
        )
        .child(
            Builder::new(AppState::RequestPermission)
                .transition(
                    Transition::on("PermissionGranted")
                        .named("permission granted")
                        .target(AppState::GroupCall),
                )
                .transition(
                    Transition::on("PermissionDenied")
                        .named("permission denied")
                        .target(AppState::AppExit),
                ),
        )
        .child(
            Builder::new(AppState::GroupCall)
                .transition(
                    Transition::on("SwitchGroup")
                        .named("switch group")
                        .on_triggered(|ctx| {
                            if let AppEvent::SwitchGroup(group) = ctx.event {
                                println!("  switched to group {group}");
                            }
                        }),
                )
                .transition(
                    Transition::on("StartOneOnOneCall")
                        .named("start 1:1 call")
                        .target(AppState::OneOnOneCall),
                )
                .transition(
                    Transition::on("MakeAppOffline")
                        .named("app offline")
                        .target(AppState::AppOffline),
                )
                .transition(
                    Transition::on("ExitApp")
                        .named("exit app & terminate group call")
                        .target(AppState::AppExit),
                ),
        )
        .child(
            Builder::new(AppState::OneOnOneCall)
                .transition(
                    Transition::on("EndOneOnOneCall")
                        .named("end 1:1 call")
                        .target(AppState::GroupCall),
                )
                .transition(
                    Transition::on("AcceptOneOnOneCall")
                        .on_triggered(|_| println!("  accepting the incoming call")),
                ),
        )
        .child(
            Builder::new(AppState::AppOffline)
                .transition(
                    Transition::on("MakeAppOnline")
                        .named("make app online")
                        .target(AppState::GroupCall),
                )
                .transition(
                    Transition::on("ExitApp")
                        .named("exit app")
                        .target(AppState::AppExit),
                ),
        )
        .child(
            Builder::new(AppState::LoginProgress)
                .transition(
                    Transition::on("LoginSuccess")
                        .named("login success")
                        .target_fn(
                            [AppState::GroupCall, AppState::RequestPermission],
                            after_login,
                        ),
                )
                .transition(
                    Transition::on("LoginFailed")
                        .named("login failed")
                        .target(AppState::Login),
                )
                .transition(
                    Transition::on("ChangePassword")
                        .named("login success, please change password")
                        .target(AppState::ChangePassword),
                ),
        )
        .child(Builder::new(AppState::AppExit).on_entry(|_| println!("  exiting state machine")))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Call Flow Example ===\n");

    let root = Builder::new(AppState::Nysno).parallel().child(app());
    let mut machine = MachineBuilder::with_data(
        root,
        Device {
            permission_granted: true,
        },
    )
    .listener(Screen)
    .build()?;

    println!("Starting machine {} ({})", machine.name(), machine.id());
    machine.start()?;

    let session = [
        AppEvent::SubmitLoginDetails {
            user: "ada".to_string(),
        },
        AppEvent::LoginSuccess,
        AppEvent::SwitchGroup("night shift".to_string()),
        AppEvent::StartOneOnOneCall,
        AppEvent::AcceptOneOnOneCall,
        AppEvent::EndOneOnOneCall,
        // Not handled in GroupCall: ignored.
        AppEvent::MakeAppOnline,
        AppEvent::MakeAppOffline,
        AppEvent::ExitApp,
    ];

    for event in session {
        println!("\n-> {event:?}");
        machine.process(event)?;
    }

    println!("\nFinished: {}", machine.is_finished());
    println!("\n=== Diagram ===\n");
    println!("{}", machine.export_diagram());

    println!("=== Example Complete ===");
    Ok(())
}
