//! # Etude
//!
//! Etude is a practice-loop note exerciser. Given a root pitch, a scale, and
//! a handful of shape parameters it deterministically builds a finite
//! sequence of pitches-and-rests, then plays that sequence on a lookahead
//! timing loop at a configurable tempo and subdivision pattern, with pause,
//! resume, an intro count-in, and indefinite looping.
//!
//! The crate ends at the [`playback::NoteEvent`] boundary: each scheduled
//! pitch is emitted exactly once with an explicit delay, and an external
//! audio engine is expected to render it at `now + delay`.
//!
//! ## Modules
//!
//! - `playback`: The lookahead scheduler state machine, the threaded engine
//!   that drives it at frame rate, and the outbound event type.
//! - `commands`: Registry of transport and parameter commands for the REPL.
//! - `repl`: Interactive operator surface.
//! - `settings`: Debounced JSON persistence of the exercise parameters.
//!
//! Core types (parameters, sequence generator, duration table) live in the
//! `etude-core` crate.

pub mod commands;
pub mod playback;
pub mod repl;
pub mod settings;

// Re-export commonly used types and functions for convenience
pub use crate::playback::{LooperEngine, NoteEvent, Scheduler};
pub use crate::settings::SettingsStore;
pub use etude_core::types::{generate, ExerciseParameters, Note, SequenceEntry, Subdivision};
