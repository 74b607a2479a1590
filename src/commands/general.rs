//! General REPL commands (help, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Print help information
fn print_help() {
    println!("{}", "🎵 Etude Help".bold());
    println!("{}", "=============".bold());
    println!();
    println!("{}", "Playback:".green());
    println!("  {}               - Start/stop indefinite looping", "loop".cyan());
    println!("  {}              - Pause or resume", "pause".cyan());
    println!("  {}              - Count-in on the root, then loop", "intro".cyan());
    println!("  {}  - Count-in length", "intro beats <2|3|4>".cyan());
    println!();
    println!("{}", "Exercise:".green());
    println!("  {}        - Root note (C, F#, Bb, ...)", "root <note>".cyan());
    println!("  {}         - Root octave (-1 to 9)", "octave <n>".cyan());
    println!(
        "  {}  - Scale by name or semitone list",
        "scale <name|0 2 4..>".cyan()
    );
    println!("  {}        - Octaves to ascend (0-5)", "octaves <n>".cyan());
    println!("  {}          - Extra notes past the top root", "notes <n>".cyan());
    println!("  {}          - Trailing rests per pass", "rests <n>".cyan());
    println!();
    println!("{}", "Timing:".green());
    println!("  {}        - Tempo (40-240 BPM)", "tempo <bpm>".cyan());
    println!("  {}       - Note sustain in seconds", "duration <s>".cyan());
    println!(
        "  {}     - quarter, eighth, triplet or sixteenth",
        "pattern <name>".cyan()
    );
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}             - Show the full exercise state", "status".bright_green());
    println!("  {}               - Show this help", "help".bright_green());
    println!("  {}               - Exit", "quit".bright_red());
    println!();
    println!("Run any parameter command with no argument to show its current value.");
}
