//! # Etude Core
//!
//! Pure core library for the etude note exerciser. Provides the exercise
//! parameter types, the deterministic sequence generator, and the
//! tempo-derived subdivision duration table - no I/O, no threads, no audio
//! dependencies.
//!
//! ## Example
//!
//! ```
//! use etude_core::types::{generate, ExerciseParameters};
//!
//! let params = ExerciseParameters::default();
//! let sequence = generate(&params);
//! assert_eq!(sequence.len(), 15); // C major, one octave, up and back down
//! ```

pub mod types;

// Re-export commonly used types
pub use types::{generate, DurationTable, ExerciseParameters, Note, SequenceEntry, Subdivision};
