//! Exercise sequence generation
//!
//! Turns an [`ExerciseParameters`] snapshot into the finite list of
//! pitch-or-rest slots the playback scheduler walks. Generation is a pure
//! function of the parameters: any change to pitch content regenerates the
//! whole sequence, never patches it.

use crate::types::ExerciseParameters;

/// One slot in a generated exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEntry {
    /// Absolute pitch number (MIDI, 0-127)
    Pitch(u8),
    /// Silence for one slot
    Rest,
}

impl SequenceEntry {
    pub fn is_rest(&self) -> bool {
        matches!(self, SequenceEntry::Rest)
    }

    /// The pitch number, if this slot is not a rest
    pub fn pitch(&self) -> Option<u8> {
        match self {
            SequenceEntry::Pitch(p) => Some(*p),
            SequenceEntry::Rest => None,
        }
    }
}

/// Clamp a computed pitch into the MIDI range
fn push_pitch(out: &mut Vec<SequenceEntry>, pitch: i32) {
    out.push(SequenceEntry::Pitch(pitch.clamp(0, 127) as u8));
}

/// Generate the exercise sequence for a parameter set
///
/// Ascends through the configured octaves, optionally past the top root,
/// mirrors back down without repeating the top note or the starting root,
/// closes on the root again so looping is seamless, and appends any trailing
/// rests. Deterministic: identical parameters always yield the identical
/// sequence.
pub fn generate(params: &ExerciseParameters) -> Vec<SequenceEntry> {
    let mut notes: Vec<SequenceEntry> = Vec::new();
    let base = params.base_note();
    let len = params.intervals.len();
    if len == 0 {
        return notes;
    }

    // The first octave always plays, even with an octave span of zero.
    for interval in &params.intervals {
        push_pitch(&mut notes, base + *interval as i32);
    }
    for octave in 1..params.num_octaves as i32 {
        for interval in &params.intervals {
            push_pitch(&mut notes, base + octave * 12 + *interval as i32);
        }
    }

    if params.num_octaves > 0 {
        // Top root, then extra notes continuing up the scale past it. The
        // unison degree is skipped so the top root is never doubled.
        let top = base + params.num_octaves as i32 * 12;
        push_pitch(&mut notes, top);

        for i in 0..params.extra_notes {
            let interval = params.intervals[(i + 1) % len] as i32;
            let octave_offset = ((i + 1) / len) as i32 * 12;
            push_pitch(&mut notes, top + interval + octave_offset);
        }
    } else {
        // With no ascending span the scale never reached the upper root, so
        // extra notes start one octave above it.
        for i in 0..params.extra_notes {
            let interval = params.intervals[i % len] as i32;
            let octave_offset = (i / len + 1) as i32 * 12;
            push_pitch(&mut notes, base + interval + octave_offset);
        }
    }

    // Mirror back down, dropping the top note (just played) and the starting
    // root (played again by the loop wrap).
    let descending: Vec<SequenceEntry> = notes
        .iter()
        .rev()
        .skip(1)
        .take(notes.len().saturating_sub(2))
        .copied()
        .collect();
    notes.extend(descending);

    // Close on the root so the loop lands cleanly.
    if let Some(first) = notes.first().copied() {
        notes.push(first);
    }

    for _ in 0..params.extra_rests {
        notes.push(SequenceEntry::Rest);
    }

    notes
}
