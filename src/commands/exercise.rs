//! Exercise parameter commands
//!
//! Each command shows the current value when called with no argument and
//! sets it otherwise, mirroring the show-or-set tempo command shape.

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use etude_core::types::exercise::{
    EXTRA_RESTS_MAX, NOTE_DURATION_MAX, NOTE_DURATION_MIN, NUM_OCTAVES_MAX, ROOT_OCTAVE_MAX,
    ROOT_OCTAVE_MIN, TEMPO_MAX, TEMPO_MIN,
};
use etude_core::types::{scale, Note, Subdivision};

/// Handle `tempo [bpm]`
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current tempo: {:.0} BPM", ctx.engine.params().tempo));
    }

    match args.parse::<f32>() {
        Ok(bpm) if (TEMPO_MIN..=TEMPO_MAX).contains(&bpm) => {
            ctx.engine.set_tempo(bpm);
            CommandResult::Message(
                format!("🎵 Tempo set to {:.0} BPM", bpm)
                    .bright_green()
                    .to_string(),
            )
        }
        _ => CommandResult::Error(format!(
            "Invalid tempo. Use a value between {:.0}-{:.0} BPM",
            TEMPO_MIN, TEMPO_MAX
        )),
    }
}

/// Handle `root [note]` - set the root note by name
pub fn cmd_root(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current root: {}", ctx.engine.params().root));
    }

    match args.parse::<Note>() {
        Ok(note) => {
            ctx.engine.set_root(note);
            CommandResult::Message(
                format!("🎵 Root set to {}", note).bright_green().to_string(),
            )
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `octave [n]` - set the root octave
pub fn cmd_octave(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current root octave: {}",
            ctx.engine.params().root_octave
        ));
    }

    match args.parse::<i8>() {
        Ok(octave) if (ROOT_OCTAVE_MIN..=ROOT_OCTAVE_MAX).contains(&octave) => {
            ctx.engine.set_root_octave(octave);
            CommandResult::Message(
                format!("🎵 Root octave set to {}", octave)
                    .bright_green()
                    .to_string(),
            )
        }
        _ => CommandResult::Error(format!(
            "Invalid octave. Use a value between {} and {}",
            ROOT_OCTAVE_MIN, ROOT_OCTAVE_MAX
        )),
    }
}

/// Handle `octaves [n]` - set how many octaves the exercise ascends
pub fn cmd_octaves(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current octave span: {}",
            ctx.engine.params().num_octaves
        ));
    }

    match args.parse::<u8>() {
        Ok(n) if n <= NUM_OCTAVES_MAX => {
            ctx.engine.set_num_octaves(n);
            CommandResult::Message(
                format!("🎵 Octave span set to {}", n).bright_green().to_string(),
            )
        }
        _ => CommandResult::Error(format!("Invalid span. Use 0-{} octaves", NUM_OCTAVES_MAX)),
    }
}

/// Handle `scale [name | intervals...]`
///
/// Accepts a catalog name (`scale dorian`) or an explicit semitone-offset
/// list (`scale 0 2 4 5 7 9 11`).
pub fn cmd_scale(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        let params = ctx.engine.params();
        let intervals: Vec<String> = params.intervals.iter().map(|i| i.to_string()).collect();
        return CommandResult::Message(format!("Current scale: [{}]", intervals.join(" ")));
    }

    if let Some(intervals) = scale::by_name(args) {
        ctx.engine.set_intervals(intervals.to_vec());
        return CommandResult::Message(
            format!("🎵 Scale set to {} ({} degrees)", args.to_lowercase(), intervals.len())
                .bright_green()
                .to_string(),
        );
    }

    let parsed: Result<Vec<u8>, _> = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>())
        .collect();

    match parsed {
        Ok(intervals) if !intervals.is_empty() => {
            let degrees = intervals.len();
            ctx.engine.set_intervals(intervals);
            CommandResult::Message(
                format!("🎵 Custom scale set ({} degrees)", degrees)
                    .bright_green()
                    .to_string(),
            )
        }
        _ => CommandResult::Error(format!(
            "Invalid scale. Use a name ({}) or a semitone list like '0 2 4 5 7 9 11'",
            scale::names().join(", ")
        )),
    }
}

/// Handle `notes [n]` - extra notes past the top root
pub fn cmd_notes(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current extra notes: {}",
            ctx.engine.params().extra_notes
        ));
    }

    let max = ctx.engine.params().intervals.len();
    match args.parse::<usize>() {
        Ok(n) if n <= max => {
            ctx.engine.set_extra_notes(n);
            CommandResult::Message(
                format!("🎵 Extra notes set to {}", n).bright_green().to_string(),
            )
        }
        _ => CommandResult::Error(format!(
            "Invalid count. Extra notes are bounded by the scale length ({})",
            max
        )),
    }
}

/// Handle `rests [n]` - trailing rests at the end of each pass
pub fn cmd_rests(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current trailing rests: {}",
            ctx.engine.params().extra_rests
        ));
    }

    match args.parse::<usize>() {
        Ok(n) if n <= EXTRA_RESTS_MAX => {
            ctx.engine.set_extra_rests(n);
            CommandResult::Message(
                format!("🎵 Trailing rests set to {}", n)
                    .bright_green()
                    .to_string(),
            )
        }
        _ => CommandResult::Error(format!("Invalid count. Use 0-{} rests", EXTRA_RESTS_MAX)),
    }
}

/// Handle `duration [seconds]` - note sustain
pub fn cmd_duration(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current note duration: {}s",
            ctx.engine.params().note_duration
        ));
    }

    match args.parse::<f32>() {
        Ok(seconds) if (NOTE_DURATION_MIN..=NOTE_DURATION_MAX).contains(&seconds) => {
            ctx.engine.set_note_duration(seconds);
            CommandResult::Message(
                format!("🎵 Note duration set to {}s", seconds)
                    .bright_green()
                    .to_string(),
            )
        }
        _ => CommandResult::Error(format!(
            "Invalid duration. Use {}-{} seconds",
            NOTE_DURATION_MIN, NOTE_DURATION_MAX
        )),
    }
}

/// Handle `pattern [name]` - note spacing subdivision
pub fn cmd_pattern(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current pattern: {}",
            ctx.engine.params().pattern.name()
        ));
    }

    match Subdivision::from_str(args) {
        Some(pattern) => {
            ctx.engine.set_pattern(pattern);
            CommandResult::Message(
                format!("🎵 Pattern set to {}", pattern.name())
                    .bright_green()
                    .to_string(),
            )
        }
        None => {
            let names: Vec<&str> = Subdivision::all().iter().map(|p| p.name()).collect();
            CommandResult::Error(format!("Invalid pattern. Use one of: {}", names.join(", ")))
        }
    }
}

/// Handle `status` - show the full exercise and transport state
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let params = ctx.engine.params();
    let intervals: Vec<String> = params.intervals.iter().map(|i| i.to_string()).collect();

    let transport = if ctx.engine.is_intro_active() {
        "counting in".yellow().to_string()
    } else if ctx.engine.is_paused() {
        "paused".yellow().to_string()
    } else if ctx.engine.is_playing() {
        "playing".bright_green().to_string()
    } else {
        "stopped".to_string()
    };

    let mut output = format!("{}\n", "🎛  Exercise".bold());
    output.push_str(&format!("  Root:        {}{}\n", params.root, params.root_octave));
    output.push_str(&format!("  Scale:       [{}]\n", intervals.join(" ")));
    output.push_str(&format!("  Octave span: {}\n", params.num_octaves));
    output.push_str(&format!("  Extra notes: {}\n", params.extra_notes));
    output.push_str(&format!("  Rests:       {}\n", params.extra_rests));
    output.push_str(&format!("  Tempo:       {:.0} BPM\n", params.tempo));
    output.push_str(&format!("  Duration:    {}s\n", params.note_duration));
    output.push_str(&format!("  Pattern:     {}\n", params.pattern.name()));
    output.push_str(&format!("  Intro:       {} beats\n", params.intro_beats));
    output.push_str(&format!(
        "  Sequence:    {} slots, {}\n",
        ctx.engine.sequence_len(),
        transport
    ));
    CommandResult::Message(output)
}
