use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

/// Represents a root note using chromatic representation (0-11)
/// 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note {
    pitch_class: u8, // 0-11 chromatic representation
    accidental_preference: AccidentalPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum AccidentalPreference {
    Sharp,
    Flat,
    Natural,
}

impl Note {
    /// Create a new note from chromatic pitch class (0-11)
    pub fn new(pitch_class: u8) -> Result<Self> {
        if pitch_class > 11 {
            return Err(anyhow!("Pitch class must be 0-11, got {}", pitch_class));
        }

        Ok(Note {
            pitch_class,
            accidental_preference: AccidentalPreference::Natural,
        })
    }

    /// Create a note with specific accidental preference
    pub fn with_accidental_preference(pitch_class: u8, sharp: bool) -> Result<Self> {
        if pitch_class > 11 {
            return Err(anyhow!("Pitch class must be 0-11, got {}", pitch_class));
        }

        let preference = if Self::is_natural_note(pitch_class) {
            AccidentalPreference::Natural
        } else if sharp {
            AccidentalPreference::Sharp
        } else {
            AccidentalPreference::Flat
        };

        Ok(Note {
            pitch_class,
            accidental_preference: preference,
        })
    }

    /// Get the chromatic pitch class (0-11)
    pub fn pitch_class(&self) -> u8 {
        self.pitch_class
    }

    /// Absolute pitch number for this note at the given octave.
    ///
    /// Uses the MIDI convention where octave -1 maps to pitch 0, so C at
    /// octave 4 is note 60.
    pub fn midi(&self, octave: i8) -> i32 {
        (octave as i32 + 1) * 12 + self.pitch_class as i32
    }

    /// Check if a pitch class corresponds to a natural note (white key)
    fn is_natural_note(pitch_class: u8) -> bool {
        matches!(pitch_class, 0 | 2 | 4 | 5 | 7 | 9 | 11) // C, D, E, F, G, A, B
    }

    /// Get the base note name for display purposes
    fn base_note_name(pitch_class: u8) -> &'static str {
        match pitch_class {
            0 => "C",
            2 => "D",
            4 => "E",
            5 => "F",
            7 => "G",
            9 => "A",
            11 => "B",
            _ => "", // Will be handled by accidental logic
        }
    }

    /// Get sharp representation for accidental notes
    fn sharp_name(pitch_class: u8) -> &'static str {
        match pitch_class {
            1 => "C#",
            3 => "D#",
            6 => "F#",
            8 => "G#",
            10 => "A#",
            _ => "",
        }
    }

    /// Get flat representation for accidental notes
    fn flat_name(pitch_class: u8) -> &'static str {
        match pitch_class {
            1 => "Db",
            3 => "Eb",
            6 => "Gb",
            8 => "Ab",
            10 => "Bb",
            _ => "",
        }
    }
}

impl FromStr for Note {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_uppercase();

        let (pitch_class, accidental_preference) = match s.as_str() {
            // Natural notes
            "C" => (0, AccidentalPreference::Natural),
            "D" => (2, AccidentalPreference::Natural),
            "E" => (4, AccidentalPreference::Natural),
            "F" => (5, AccidentalPreference::Natural),
            "G" => (7, AccidentalPreference::Natural),
            "A" => (9, AccidentalPreference::Natural),
            "B" => (11, AccidentalPreference::Natural),

            // Sharp notes
            "C#" | "CS" => (1, AccidentalPreference::Sharp),
            "D#" | "DS" => (3, AccidentalPreference::Sharp),
            "F#" | "FS" => (6, AccidentalPreference::Sharp),
            "G#" | "GS" => (8, AccidentalPreference::Sharp),
            "A#" | "AS" => (10, AccidentalPreference::Sharp),

            // Flat notes
            "DB" => (1, AccidentalPreference::Flat),
            "EB" => (3, AccidentalPreference::Flat),
            "GB" => (6, AccidentalPreference::Flat),
            "AB" => (8, AccidentalPreference::Flat),
            "BB" => (10, AccidentalPreference::Flat),

            _ => return Err(anyhow!("Invalid note name: {}", s)),
        };

        Ok(Note {
            pitch_class,
            accidental_preference,
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.accidental_preference {
            AccidentalPreference::Flat if !Self::is_natural_note(self.pitch_class) => {
                Self::flat_name(self.pitch_class)
            }
            _ => {
                if Self::is_natural_note(self.pitch_class) {
                    Self::base_note_name(self.pitch_class)
                } else {
                    // Non-natural notes default to sharp spelling
                    Self::sharp_name(self.pitch_class)
                }
            }
        };

        if name.is_empty() {
            write!(f, "PC{}", self.pitch_class)
        } else {
            write!(f, "{}", name)
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Note {
            pitch_class: 0,
            accidental_preference: AccidentalPreference::Natural,
        }
    }
}
