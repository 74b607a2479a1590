//! Exercise parameters
//!
//! The full parameter set describing one practice exercise. These pure data
//! values carry no playback state; the sequence generator reads them as an
//! immutable snapshot and the playback layer owns the session state.

use crate::types::{scale, Note, Subdivision};

/// Tempo range in beats per minute
pub const TEMPO_MIN: f32 = 40.0;
pub const TEMPO_MAX: f32 = 240.0;

/// Root octave range (MIDI octave convention, -1 maps to pitch 0)
pub const ROOT_OCTAVE_MIN: i8 = -1;
pub const ROOT_OCTAVE_MAX: i8 = 9;

/// Note sustain range in seconds
pub const NOTE_DURATION_MIN: f32 = 0.1;
pub const NOTE_DURATION_MAX: f32 = 10.0;

/// Maximum number of additional octaves to ascend
pub const NUM_OCTAVES_MAX: u8 = 5;

/// Maximum trailing rests
pub const EXTRA_RESTS_MAX: usize = 12;

/// Intro count-in range in beats
pub const INTRO_BEATS_MIN: u8 = 2;
pub const INTRO_BEATS_MAX: u8 = 4;

/// Parameters describing one note exercise
///
/// Extra notes are bounded by the interval sequence length; everything else
/// has the fixed ranges above. `sanitized` clamps each field independently
/// so a partially out-of-range set never poisons the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseParameters {
    /// Root pitch (class + accidental spelling)
    pub root: Note,
    /// Octave of the root note
    pub root_octave: i8,
    /// Semitone offsets from the root, in playing order (len >= 1)
    pub intervals: Vec<u8>,
    /// Additional octaves to ascend past the first
    pub num_octaves: u8,
    /// Notes appended past the top root
    pub extra_notes: usize,
    /// Rest slots appended at the tail
    pub extra_rests: usize,
    /// Tempo in beats per minute
    pub tempo: f32,
    /// Note sustain in seconds
    pub note_duration: f32,
    /// Note spacing pattern
    pub pattern: Subdivision,
    /// Count-in length in beats
    pub intro_beats: u8,
}

impl Default for ExerciseParameters {
    fn default() -> Self {
        ExerciseParameters {
            root: Note::default(),
            root_octave: 4,
            intervals: scale::IONIAN.to_vec(),
            num_octaves: 1,
            extra_notes: 0,
            extra_rests: 0,
            tempo: 80.0,
            note_duration: 1.0,
            pattern: Subdivision::Quarter,
            intro_beats: 4,
        }
    }
}

impl ExerciseParameters {
    /// Clamp every field to its documented range
    ///
    /// An empty interval sequence falls back to the default scale, and the
    /// extra-note count is re-bounded by the (possibly new) sequence length.
    pub fn sanitized(mut self) -> Self {
        if self.intervals.is_empty() {
            self.intervals = scale::IONIAN.to_vec();
        }
        self.root_octave = self.root_octave.clamp(ROOT_OCTAVE_MIN, ROOT_OCTAVE_MAX);
        self.num_octaves = self.num_octaves.min(NUM_OCTAVES_MAX);
        self.extra_notes = self.extra_notes.min(self.intervals.len());
        self.extra_rests = self.extra_rests.min(EXTRA_RESTS_MAX);
        self.tempo = self.tempo.clamp(TEMPO_MIN, TEMPO_MAX);
        self.note_duration = self.note_duration.clamp(NOTE_DURATION_MIN, NOTE_DURATION_MAX);
        self.intro_beats = self.intro_beats.clamp(INTRO_BEATS_MIN, INTRO_BEATS_MAX);
        self
    }

    /// Absolute pitch number of the root at its configured octave
    pub fn base_note(&self) -> i32 {
        self.root.midi(self.root_octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let params = ExerciseParameters::default();
        assert_eq!(params.root.pitch_class(), 0);
        assert_eq!(params.root_octave, 4);
        assert_eq!(params.intervals, vec![0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(params.num_octaves, 1);
        assert_eq!(params.tempo, 80.0);
        assert_eq!(params.pattern, Subdivision::Quarter);
        assert_eq!(params.intro_beats, 4);
        assert_eq!(params.base_note(), 60);
    }

    #[test]
    fn test_sanitized_clamps_each_field() {
        let params = ExerciseParameters {
            root_octave: 12,
            num_octaves: 9,
            extra_rests: 100,
            tempo: 500.0,
            note_duration: 0.0,
            intro_beats: 9,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(params.root_octave, ROOT_OCTAVE_MAX);
        assert_eq!(params.num_octaves, NUM_OCTAVES_MAX);
        assert_eq!(params.extra_rests, EXTRA_RESTS_MAX);
        assert_eq!(params.tempo, TEMPO_MAX);
        assert_eq!(params.note_duration, NOTE_DURATION_MIN);
        assert_eq!(params.intro_beats, INTRO_BEATS_MAX);
    }

    #[test]
    fn test_sanitized_bounds_extra_notes_by_sequence_length() {
        let params = ExerciseParameters {
            intervals: vec![0, 4, 7],
            extra_notes: 10,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(params.extra_notes, 3);
    }

    #[test]
    fn test_sanitized_restores_empty_intervals() {
        let params = ExerciseParameters {
            intervals: vec![],
            ..Default::default()
        }
        .sanitized();
        assert_eq!(params.intervals, scale::IONIAN.to_vec());
    }
}
