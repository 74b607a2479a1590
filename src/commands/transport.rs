//! Transport commands (loop, pause, intro)

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use etude_core::types::exercise::{INTRO_BEATS_MAX, INTRO_BEATS_MIN};

/// Handle `loop` - start or stop indefinite looping
pub fn cmd_loop(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if ctx.engine.sequence_len() == 0 {
        return CommandResult::Error("No exercise notes generated to play".to_string());
    }

    let stopping = ctx.engine.is_playing();
    ctx.engine.toggle_loop();

    let msg = if stopping {
        "⏹ Stopped".to_string()
    } else {
        "🔁 Looping exercise... (use 'loop' again to stop)"
            .bright_green()
            .to_string()
    };
    CommandResult::Message(msg)
}

/// Handle `pause` - pause or resume the current session
pub fn cmd_pause(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !ctx.engine.is_playing() {
        // Nothing started yet: defined as a no-op, not an error
        return CommandResult::Success;
    }

    let resuming = ctx.engine.is_paused();
    ctx.engine.toggle_pause();

    let msg = if resuming {
        "▶ Resumed".bright_green().to_string()
    } else {
        "⏸ Paused".to_string()
    };
    CommandResult::Message(msg)
}

/// Handle `intro` - restart with a count-in, then loop
pub fn cmd_intro(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if ctx.engine.sequence_len() == 0 {
        return CommandResult::Error("No exercise notes generated to play".to_string());
    }

    let beats = ctx.engine.params().intro_beats;
    ctx.engine.play_with_intro();
    CommandResult::Message(
        format!("🎵 {}-beat count-in, then looping...", beats)
            .bright_green()
            .to_string(),
    )
}

/// Handle `intro beats <2|3|4>` - set the count-in length
pub fn cmd_intro_beats(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Intro count-in: {} beats",
            ctx.engine.params().intro_beats
        ));
    }

    match args.parse::<u8>() {
        Ok(beats) if (INTRO_BEATS_MIN..=INTRO_BEATS_MAX).contains(&beats) => {
            ctx.engine.set_intro_beats(beats);
            CommandResult::Message(
                format!("🎵 Intro count-in set to {} beats", beats)
                    .bright_green()
                    .to_string(),
            )
        }
        _ => CommandResult::Error(format!(
            "Invalid intro length. Use {}-{} beats",
            INTRO_BEATS_MIN, INTRO_BEATS_MAX
        )),
    }
}
