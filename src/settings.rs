//! Settings persistence
//!
//! Stores the exercise parameters as a flat JSON record. Loading substitutes
//! the documented default for every missing or malformed field independently,
//! so a stale or hand-edited file never blocks startup. Saves are debounced:
//! parameter snapshots are coalesced until the stream has been quiet for
//! 300ms before touching the disk.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use etude_core::types::{ExerciseParameters, Note, Subdivision};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Quiet window before a pending snapshot is written
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Flat on-disk record of the exercise parameters
///
/// Every field is optional so each one can fall back on its own; unknown
/// fields in the file are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSettings {
    root_note: Option<String>,
    root_octave: Option<i8>,
    intervals: Option<Vec<u8>>,
    num_octaves: Option<u8>,
    extra_notes: Option<usize>,
    extra_rests: Option<usize>,
    tempo: Option<f32>,
    note_duration: Option<f32>,
    pattern: Option<String>,
    intro_beats: Option<u8>,
}

impl PersistedSettings {
    fn from_params(params: &ExerciseParameters) -> Self {
        PersistedSettings {
            root_note: Some(params.root.to_string()),
            root_octave: Some(params.root_octave),
            intervals: Some(params.intervals.clone()),
            num_octaves: Some(params.num_octaves),
            extra_notes: Some(params.extra_notes),
            extra_rests: Some(params.extra_rests),
            tempo: Some(params.tempo),
            note_duration: Some(params.note_duration),
            pattern: Some(params.pattern.name().to_string()),
            intro_beats: Some(params.intro_beats),
        }
    }

    /// Apply defaults for anything missing, then clamp to the legal ranges
    fn into_params(self) -> ExerciseParameters {
        let defaults = ExerciseParameters::default();
        let params = ExerciseParameters {
            root: self
                .root_note
                .and_then(|name| name.parse::<Note>().ok())
                .unwrap_or(defaults.root),
            root_octave: self.root_octave.unwrap_or(defaults.root_octave),
            intervals: self.intervals.unwrap_or(defaults.intervals),
            num_octaves: self.num_octaves.unwrap_or(defaults.num_octaves),
            extra_notes: self.extra_notes.unwrap_or(defaults.extra_notes),
            extra_rests: self.extra_rests.unwrap_or(defaults.extra_rests),
            tempo: self.tempo.unwrap_or(defaults.tempo),
            note_duration: self.note_duration.unwrap_or(defaults.note_duration),
            pattern: self
                .pattern
                .and_then(|name| Subdivision::from_str(&name))
                .unwrap_or(defaults.pattern),
            intro_beats: self.intro_beats.unwrap_or(defaults.intro_beats),
        };
        params.sanitized()
    }
}

/// File-backed settings store
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    /// Store under the user's config directory, falling back to the
    /// working directory when none exists
    pub fn default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        SettingsStore::new(base.join("etude").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load parameters, substituting defaults field by field
    ///
    /// A missing file, unreadable file, or unparseable record all degrade to
    /// the full defaults; a readable record with bad fields only loses those
    /// fields.
    pub fn load(&self) -> ExerciseParameters {
        let record = fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str::<PersistedSettings>(&text).ok())
            .unwrap_or_default();
        record.into_params()
    }

    /// Write a parameter snapshot immediately
    pub fn save(&self, params: &ExerciseParameters) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating settings dir {}", parent.display()))?;
        }
        let record = PersistedSettings::from_params(params);
        let text = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, text)
            .with_context(|| format!("writing settings to {}", self.path.display()))
    }

    /// Spawn the debounced writer thread
    ///
    /// Consumes parameter snapshots (see `LooperEngine::watch_params`) and
    /// writes the latest one once the stream has been quiet for the debounce
    /// window. Write failures are reported and never fatal.
    pub fn spawn_debounced(self, rx: Receiver<ExerciseParameters>) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut pending: Option<ExerciseParameters> = None;
            loop {
                let wait = if pending.is_some() {
                    rx.recv_timeout(SAVE_DEBOUNCE)
                } else {
                    rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                };
                match wait {
                    Ok(params) => pending = Some(params),
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(params) = pending.take() {
                            if let Err(e) = self.save(&params) {
                                eprintln!("etude: failed to save settings: {}", e);
                            }
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        // Flush whatever is still pending on shutdown
                        if let Some(params) = pending.take() {
                            if let Err(e) = self.save(&params) {
                                eprintln!("etude: failed to save settings: {}", e);
                            }
                        }
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load(), ExerciseParameters::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (_dir, store) = temp_store();
        let params = ExerciseParameters {
            root: "F#".parse().unwrap(),
            root_octave: 3,
            intervals: vec![0, 3, 5, 7, 10],
            num_octaves: 2,
            extra_rests: 4,
            tempo: 132.0,
            pattern: Subdivision::Triplet,
            intro_beats: 3,
            ..Default::default()
        };

        store.save(&params).unwrap();
        assert_eq!(store.load(), params);
    }

    #[test]
    fn test_each_bad_field_falls_back_independently() {
        let (_dir, store) = temp_store();
        fs::write(
            store.path(),
            r#"{"tempo": 132.0, "root_note": "H", "pattern": "polka", "intro_beats": 99}"#,
        )
        .unwrap();

        let params = store.load();
        assert_eq!(params.tempo, 132.0); // the good field survives
        assert_eq!(params.root.pitch_class(), 0); // bad name falls back to C
        assert_eq!(params.pattern, Subdivision::Quarter);
        assert_eq!(params.intro_beats, 4); // clamped into range
    }

    #[test]
    fn test_garbage_file_loads_defaults() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "not json at all").unwrap();
        assert_eq!(store.load(), ExerciseParameters::default());
    }

    #[test]
    fn test_debounced_writer_coalesces_snapshots() {
        let (_dir, store) = temp_store();
        let path = store.path().to_path_buf();
        let (tx, rx) = unbounded();
        let handle = store.spawn_debounced(rx);

        for tempo in [90.0, 100.0, 110.0] {
            tx.send(ExerciseParameters {
                tempo,
                ..Default::default()
            })
            .unwrap();
        }
        drop(tx); // disconnect flushes the latest snapshot
        handle.join().unwrap();

        let written = SettingsStore::new(path).load();
        assert_eq!(written.tempo, 110.0);
    }
}
