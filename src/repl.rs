//! Interactive operator surface for the exerciser
//!
//! Loads persisted settings, spawns the playback engine and the debounced
//! settings writer, then reads transport and parameter commands line by line.

use crate::commands::{create_registry, CommandContext, CommandResult};
use crate::playback::LooperEngine;
use crate::settings::SettingsStore;
use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the REPL until the user quits
pub fn run() -> Result<()> {
    let store = SettingsStore::default_location();
    let params = store.load();

    let engine = LooperEngine::new(params);
    // Every parameter mutation flows into the debounced writer
    let _saver = store.spawn_debounced(engine.watch_params());

    let registry = create_registry();
    let mut ctx = CommandContext::new(engine);

    println!("{}", "🎵 etude - practice loop exerciser".bold());
    println!("Type {} for commands, {} to leave.", "help".cyan(), "quit".cyan());

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("etude> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);

                match registry.execute(input, &mut ctx) {
                    CommandResult::Success => {}
                    CommandResult::Message(msg) => println!("{}", msg),
                    CommandResult::Error(e) => println!("{}", format!("⚠ {}", e).yellow()),
                    CommandResult::NotACommand => {
                        println!(
                            "{}",
                            format!("Unknown command: {} (try 'help')", input).yellow()
                        );
                    }
                    CommandResult::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("etude: readline error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
