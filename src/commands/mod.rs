//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod exercise;
pub mod general;
pub mod transport;

use crate::playback::LooperEngine;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub engine: LooperEngine,
}

impl CommandContext {
    pub fn new(engine: LooperEngine) -> Self {
        Self { engine }
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix (e.g., "intro beats")
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        // Sort by prefix length descending for longest-match-first
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = if input.len() > prefix.len() {
                    input[prefix.len()..].trim()
                } else {
                    ""
                };
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Transport commands (order matters for prefix matching - register specific first)
    registry.register("intro beats", transport::cmd_intro_beats);
    registry.register("intro", transport::cmd_intro);
    registry.register("loop", transport::cmd_loop);
    registry.register("pause", transport::cmd_pause);

    // Exercise parameter commands
    registry.register("tempo", exercise::cmd_tempo);
    registry.register("root", exercise::cmd_root);
    registry.register("octaves", exercise::cmd_octaves);
    registry.register("octave", exercise::cmd_octave);
    registry.register("scale", exercise::cmd_scale);
    registry.register("notes", exercise::cmd_notes);
    registry.register("rests", exercise::cmd_rests);
    registry.register("duration", exercise::cmd_duration);
    registry.register("pattern", exercise::cmd_pattern);
    registry.register("status", exercise::cmd_status);

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}
