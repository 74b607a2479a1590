//! Named scale catalog
//!
//! Maps common scale names to their interval sequences (semitone offsets
//! from the root). Custom interval lists are also accepted everywhere a
//! scale is taken, so this catalog is a convenience, not a constraint.

/// The major scale, also the default exercise sequence
pub const IONIAN: &[u8] = &[0, 2, 4, 5, 7, 9, 11];

/// Look up a scale by name (case-insensitive)
pub fn by_name(name: &str) -> Option<&'static [u8]> {
    let scale: &'static [u8] = match name.to_lowercase().as_str() {
        "ionian" | "major" => IONIAN,
        "dorian" => &[0, 2, 3, 5, 7, 9, 10],
        "phrygian" => &[0, 1, 3, 5, 7, 8, 10],
        "lydian" => &[0, 2, 4, 6, 7, 9, 11],
        "mixolydian" => &[0, 2, 4, 5, 7, 9, 10],
        "aeolian" | "minor" => &[0, 2, 3, 5, 7, 8, 10],
        "harmonic-minor" | "harmonic_minor" => &[0, 2, 3, 5, 7, 8, 11],
        "major-pentatonic" | "major_pentatonic" => &[0, 2, 4, 7, 9],
        "minor-pentatonic" | "minor_pentatonic" => &[0, 3, 5, 7, 10],
        "blues" => &[0, 3, 5, 6, 7, 10],
        "chromatic" => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        _ => return None,
    };
    Some(scale)
}

/// All catalog names, for help output
pub fn names() -> &'static [&'static str] {
    &[
        "ionian/major",
        "dorian",
        "phrygian",
        "lydian",
        "mixolydian",
        "aeolian/minor",
        "harmonic-minor",
        "major-pentatonic",
        "minor-pentatonic",
        "blues",
        "chromatic",
    ]
}
