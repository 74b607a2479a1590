//! Outbound note events
//!
//! The single signal that crosses from the scheduler into whatever audio
//! engine consumes it. One event per scheduled non-rest slot, delivered
//! exactly once; the consumer is expected to enqueue it for playback at
//! `now + delay`, independent of the scheduler's own frame cadence.

/// Default instrument voice for emitted events
pub const DEFAULT_VOICE: &str = "guitar";

/// A scheduled "play this pitch" event
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    /// Absolute pitch number (MIDI)
    pub midi_note: u8,
    /// Named instrument voice the consumer should render with
    pub instrument: String,
    /// Sustain duration in seconds
    pub duration: f32,
    /// Scheduling delay in seconds relative to "now" at emission time
    pub delay: f64,
}

impl NoteEvent {
    pub fn new(midi_note: u8, instrument: &str, duration: f32, delay: f64) -> Self {
        Self {
            midi_note,
            instrument: instrument.to_string(),
            duration,
            delay,
        }
    }
}
