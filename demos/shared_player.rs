//! Shared Player
//!
//! This example shares one machine between several tokio tasks and
//! exports it as a Mermaid diagram configured from JSON.
//!
//! Key concepts:
//! - Parallel regions that change independently on the same event
//! - `SharedMachine` serializing events from concurrent submitters
//! - Events posted from hooks
//! - `MachineConfig` loaded from JSON
//!
//! Run with: cargo run --example shared_player

use statecraft::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
use statecraft::machine::{MachineConfig, SharedMachine};
use statecraft::{event_enum, state_enum};
use std::error::Error;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Player {
        Root,
        Transport,
        Stopped,
        Playing,
        Ejected,
        Volume,
        Quiet,
        Loud,
        Off,
    }
    final: [Ejected, Off]
}

event_enum! {
    enum Control {
        Play,
        Stop,
        Louder,
        Softer,
        Eject,
        PowerDown,
    }
}

const CONFIG: &str = r#"{
    "name": "living-room",
    "max_posted_events": 4,
    "export": { "format": "mermaid", "highlight_active": true, "title": "Player" }
}"#;

fn player() -> StateBuilder<Player, Control, ()> {
    let transport = StateBuilder::new(Player::Transport)
        .initial(
            StateBuilder::new(Player::Stopped)
                .transition(TransitionBuilder::on("Play").target(Player::Playing))
                .transition(TransitionBuilder::on("Eject").target(Player::Ejected)),
        )
        .child(
            StateBuilder::new(Player::Playing)
                .transition(TransitionBuilder::on("Stop").target(Player::Stopped)),
        )
        .child(
            StateBuilder::new(Player::Ejected).on_entry(|ctx| ctx.post(Control::PowerDown)),
        );

    let volume = StateBuilder::new(Player::Volume)
        .initial(
            StateBuilder::new(Player::Quiet)
                .transition(TransitionBuilder::on("Louder").target(Player::Loud)),
        )
        .child(
            StateBuilder::new(Player::Loud)
                .transition(TransitionBuilder::on("Softer").target(Player::Quiet)),
        )
        .child(StateBuilder::new(Player::Off))
        .transition(
            TransitionBuilder::on("PowerDown")
                .named("power down")
                .target(Player::Off),
        );

    StateBuilder::new(Player::Root)
        .parallel()
        .child(transport)
        .child(volume)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Shared Player Example ===\n");

    let config = MachineConfig::from_json(CONFIG)?;
    let machine: SharedMachine<Player, Control> =
        MachineBuilder::new(player()).config(config).build()?.into();
    machine.start()?;

    let remotes: Vec<_> = [Control::Louder, Control::Play, Control::Softer]
        .into_iter()
        .map(|control| {
            let machine = machine.clone();
            tokio::task::spawn_blocking(move || machine.process(control))
        })
        .collect();
    for remote in remotes {
        remote.await??;
    }
    println!("Active after remotes: {:?}", machine.active_states());

    machine.process(Control::Stop)?;
    machine.process(Control::Eject)?;

    println!("Finished: {}", machine.is_finished());
    println!("\n{}", machine.export_diagram());

    println!("=== Example Complete ===");
    Ok(())
}
