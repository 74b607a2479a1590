//! Subdivision patterns and their tempo-derived durations
//!
//! The exerciser spaces notes by one of four fixed subdivisions of the beat.
//! Durations are recomputed eagerly whenever the tempo changes and read by
//! the playback scheduler on every step.

/// The four supported note-spacing patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subdivision {
    #[default]
    Quarter,
    Eighth,
    Triplet,
    Sixteenth,
}

impl Subdivision {
    /// Parse a subdivision from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Subdivision> {
        match s.to_lowercase().as_str() {
            "quarter" | "crotchet" => Some(Subdivision::Quarter),
            "eighth" | "quaver" => Some(Subdivision::Eighth),
            "triplet" => Some(Subdivision::Triplet),
            "sixteenth" | "semiquaver" => Some(Subdivision::Sixteenth),
            _ => None,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Subdivision::Quarter => "quarter",
            Subdivision::Eighth => "eighth",
            Subdivision::Triplet => "triplet",
            Subdivision::Sixteenth => "sixteenth",
        }
    }

    /// All subdivisions, in notated order
    pub fn all() -> [Subdivision; 4] {
        [
            Subdivision::Quarter,
            Subdivision::Eighth,
            Subdivision::Triplet,
            Subdivision::Sixteenth,
        ]
    }
}

/// Millisecond durations for each subdivision at a given tempo
///
/// Invariant: eighth = quarter/2, triplet = quarter/3, sixteenth = quarter/4,
/// where quarter = 60000/tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationTable {
    pub quarter: f64,
    pub eighth: f64,
    pub triplet: f64,
    pub sixteenth: f64,
}

impl DurationTable {
    /// Compute the table for a tempo in beats per minute
    pub fn from_tempo(bpm: f32) -> Self {
        let quarter = 60000.0 / bpm as f64;
        DurationTable {
            quarter,
            eighth: quarter / 2.0,
            triplet: quarter / 3.0,
            sixteenth: quarter / 4.0,
        }
    }

    /// Duration in milliseconds for one subdivision step
    pub fn get(&self, subdivision: Subdivision) -> f64 {
        match subdivision {
            Subdivision::Quarter => self.quarter,
            Subdivision::Eighth => self.eighth,
            Subdivision::Triplet => self.triplet,
            Subdivision::Sixteenth => self.sixteenth,
        }
    }
}
