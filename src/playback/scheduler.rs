//! Lookahead playback scheduler
//!
//! Walks a generated exercise sequence in time, emitting one [`NoteEvent`]
//! per non-rest slot. The frame callback that drives it is not a reliable
//! audio clock, so each step pre-schedules everything inside a 100ms horizon
//! with explicit delays; precise timing is enforced by whatever consumes the
//! events, and transient frame jitter cannot produce audible gaps.
//!
//! Every operation takes the current time in milliseconds as an argument, so
//! tests drive the scheduler on a virtual timeline without wall-clock waits.

use crate::playback::event::{NoteEvent, DEFAULT_VOICE};
use anyhow::{bail, Result};
use etude_core::types::exercise::{
    EXTRA_RESTS_MAX, INTRO_BEATS_MAX, INTRO_BEATS_MIN, NOTE_DURATION_MAX, NOTE_DURATION_MIN,
    NUM_OCTAVES_MAX, ROOT_OCTAVE_MAX, ROOT_OCTAVE_MIN, TEMPO_MAX, TEMPO_MIN,
};
use etude_core::types::{generate, DurationTable, ExerciseParameters, Note, SequenceEntry, Subdivision};

/// How far ahead of "now" each step pre-schedules events, in milliseconds
pub const LOOKAHEAD_MS: f64 = 100.0;

/// The playback state machine
///
/// Owns the exercise parameters, the generated sequence, and the transient
/// session state (cursor, schedule anchor, transport flags). All mutation
/// goes through the operations below; the engine thread is the only caller
/// at runtime.
pub struct Scheduler {
    params: ExerciseParameters,
    sequence: Vec<SequenceEntry>,
    durations: DurationTable,
    voice: String,

    // Session state, reset on stop
    cursor: usize,
    next_note_time: f64,
    looping: bool,
    paused: bool,
    armed: bool,
    intro_active: bool,
    intro_end: f64,
}

impl Scheduler {
    pub fn new(params: ExerciseParameters) -> Self {
        let params = params.sanitized();
        let durations = DurationTable::from_tempo(params.tempo);
        let sequence = generate(&params);
        Scheduler {
            params,
            sequence,
            durations,
            voice: DEFAULT_VOICE.to_string(),
            cursor: 0,
            next_note_time: 0.0,
            looping: false,
            paused: false,
            armed: false,
            intro_active: false,
            intro_end: 0.0,
        }
    }

    pub fn params(&self) -> &ExerciseParameters {
        &self.params
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether a frame callback is currently armed (any Playing state)
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Presentation-only: true while the intro count-in is sounding
    pub fn is_intro_active(&self) -> bool {
        self.intro_active
    }

    pub fn set_voice(&mut self, voice: impl Into<String>) {
        self.voice = voice.into();
    }

    // --- parameter updates -------------------------------------------------
    //
    // Pitch-affecting changes regenerate the sequence wholesale and reset the
    // cursor; tempo swaps the duration table in place; the rest just store
    // and apply on the next scheduled step.

    pub fn set_tempo(&mut self, bpm: f32) {
        self.params.tempo = bpm.clamp(TEMPO_MIN, TEMPO_MAX);
        self.durations = DurationTable::from_tempo(self.params.tempo);
    }

    pub fn set_root(&mut self, root: Note) {
        self.params.root = root;
        self.regenerate();
    }

    pub fn set_root_octave(&mut self, octave: i8) {
        self.params.root_octave = octave.clamp(ROOT_OCTAVE_MIN, ROOT_OCTAVE_MAX);
        self.regenerate();
    }

    pub fn set_intervals(&mut self, intervals: Vec<u8>) {
        if intervals.is_empty() {
            return;
        }
        self.params.extra_notes = self.params.extra_notes.min(intervals.len());
        self.params.intervals = intervals;
        self.regenerate();
    }

    pub fn set_num_octaves(&mut self, num_octaves: u8) {
        self.params.num_octaves = num_octaves.min(NUM_OCTAVES_MAX);
        self.regenerate();
    }

    pub fn set_extra_notes(&mut self, extra_notes: usize) {
        self.params.extra_notes = extra_notes.min(self.params.intervals.len());
        self.regenerate();
    }

    pub fn set_extra_rests(&mut self, extra_rests: usize) {
        self.params.extra_rests = extra_rests.min(EXTRA_RESTS_MAX);
        self.regenerate();
    }

    pub fn set_note_duration(&mut self, seconds: f32) {
        self.params.note_duration = seconds.clamp(NOTE_DURATION_MIN, NOTE_DURATION_MAX);
    }

    pub fn set_pattern(&mut self, pattern: Subdivision) {
        self.params.pattern = pattern;
    }

    pub fn set_intro_beats(&mut self, beats: u8) {
        self.params.intro_beats = beats.clamp(INTRO_BEATS_MIN, INTRO_BEATS_MAX);
    }

    fn regenerate(&mut self) {
        self.sequence = generate(&self.params);
        self.cursor = 0;
    }

    // --- transport ---------------------------------------------------------

    /// Start looping from the top, or stop any playing state
    ///
    /// Returns whether the scheduler is looping afterwards. Starting against
    /// an empty sequence is refused with an error and leaves the state at
    /// Stopped.
    pub fn toggle_loop(&mut self, now_ms: f64) -> Result<bool> {
        if self.armed {
            self.stop();
            Ok(false)
        } else {
            self.start_looping(now_ms)?;
            Ok(true)
        }
    }

    fn start_looping(&mut self, now_ms: f64) -> Result<()> {
        self.stop();
        if self.sequence.is_empty() {
            bail!("no exercise notes generated to play");
        }
        self.looping = true;
        self.cursor = 0;
        self.next_note_time = now_ms;
        self.armed = true;
        Ok(())
    }

    /// Flip the paused state
    ///
    /// A no-op when stopped at the top of the sequence (nothing to pause).
    /// Resuming re-anchors the schedule at `now` so paused time never turns
    /// into a burst of overdue notes, and a resume against a stopped session
    /// plays the remainder once from the current cursor.
    pub fn toggle_pause(&mut self, now_ms: f64) -> bool {
        if !self.armed && self.cursor == 0 {
            return false;
        }
        self.paused = !self.paused;
        if !self.paused {
            self.next_note_time = now_ms;
            if !self.armed {
                self.looping = false;
                self.armed = true;
            }
        }
        self.paused
    }

    /// Restart from the top with a count-in, then loop
    ///
    /// The count-in repeats the first pitch `intro_beats` times at quarter
    /// note spacing - always quarter, whatever the subdivision pattern - and
    /// the sequence proper starts when the count-in ends. The returned events
    /// are the count-in; the caller emits them immediately.
    pub fn play_with_intro(&mut self, now_ms: f64) -> Result<Vec<NoteEvent>> {
        self.stop();
        if self.sequence.is_empty() {
            bail!("no exercise notes generated to play");
        }
        let SequenceEntry::Pitch(root) = self.sequence[0] else {
            bail!("exercise does not start on a pitch");
        };

        let quarter = self.durations.quarter;
        let mut events = Vec::with_capacity(self.params.intro_beats as usize);
        for i in 0..self.params.intro_beats {
            events.push(NoteEvent::new(
                root,
                &self.voice,
                self.params.note_duration,
                i as f64 * quarter / 1000.0,
            ));
        }

        let intro_ms = self.params.intro_beats as f64 * quarter;
        self.next_note_time = now_ms + intro_ms;
        self.looping = true; // Always loop after an intro
        self.cursor = 0;
        self.armed = true;
        self.intro_active = true;
        self.intro_end = now_ms + intro_ms;
        Ok(events)
    }

    /// Stop playback and reset the session
    pub fn stop(&mut self) {
        self.looping = false;
        self.paused = false;
        self.intro_active = false;
        self.armed = false;
        self.cursor = 0;
    }

    /// One frame callback: schedule everything inside the lookahead window
    ///
    /// Emitted events are in cursor order with non-decreasing delays. While
    /// paused this does no work and advances no clocks; the frame stays
    /// armed so a later resume is picked up.
    pub fn step(&mut self, now_ms: f64) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        if !self.armed || self.paused {
            return events;
        }

        let horizon = now_ms + LOOKAHEAD_MS;
        while self.next_note_time < horizon {
            let delay = ((self.next_note_time - now_ms) / 1000.0).max(0.0);
            if let Some(SequenceEntry::Pitch(pitch)) = self.sequence.get(self.cursor) {
                events.push(NoteEvent::new(
                    *pitch,
                    &self.voice,
                    self.params.note_duration,
                    delay,
                ));
            }
            self.cursor += 1;
            if self.cursor >= self.sequence.len() {
                if self.looping {
                    self.cursor = self.loop_restart_index();
                } else {
                    break;
                }
            }
            self.next_note_time += self.durations.get(self.params.pattern);
        }

        if self.intro_active && now_ms >= self.intro_end {
            self.intro_active = false;
        }

        if !self.looping && self.cursor >= self.sequence.len() {
            self.stop();
        }
        events
    }

    /// Where a loop pass restarts after the closing root
    ///
    /// Trailing rests already separate the closing root from the next pass,
    /// so restart at the top; without them, skip to index 1 so the root does
    /// not sound twice in a row.
    fn loop_restart_index(&self) -> usize {
        if self.params.extra_rests > 0 {
            0
        } else if self.sequence.len() > 1 {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// C major, one octave, 120 BPM quarter notes (500ms per slot)
    fn scheduler_at_120() -> Scheduler {
        let params = ExerciseParameters {
            tempo: 120.0,
            ..Default::default()
        };
        Scheduler::new(params)
    }

    /// Drive frames over [start, end) every `frame_ms`, collecting events
    fn drive(s: &mut Scheduler, start: f64, end: f64, frame_ms: f64) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        let mut now = start;
        while now < end {
            events.extend(s.step(now));
            now += frame_ms;
        }
        events
    }

    #[test]
    fn test_toggle_loop_starts_and_stops() {
        let mut s = scheduler_at_120();
        assert!(s.toggle_loop(0.0).unwrap());
        assert!(s.is_armed());
        assert!(s.is_looping());

        assert!(!s.toggle_loop(50.0).unwrap());
        assert!(!s.is_armed());
        assert!(!s.is_looping());
    }

    #[test]
    fn test_first_step_emits_first_pitch_immediately() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        let events = s.step(0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].midi_note, 60);
        assert_eq!(events[0].delay, 0.0);
        assert_eq!(events[0].instrument, DEFAULT_VOICE);
        assert_eq!(events[0].duration, 1.0);
    }

    #[test]
    fn test_step_schedules_within_lookahead_only() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        s.step(0.0); // consumes slot 0, next note at 500ms

        // 350ms: 500 is outside the 100ms horizon
        assert!(s.step(350.0).is_empty());

        // 450ms: 500 is inside the horizon, emitted with a 50ms delay
        let events = s.step(450.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].midi_note, 62);
        assert!((events[0].delay - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_late_frame_clamps_delay_to_zero() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        s.step(0.0);

        // Frame arrives 200ms after the slot was due
        let events = s.step(700.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].midi_note, 62);
        assert_eq!(events[0].delay, 0.0);
    }

    #[test]
    fn test_delays_non_decreasing_and_cursor_ordered_within_step() {
        // 240 BPM sixteenths: 62.5ms per slot, two slots inside one horizon
        let params = ExerciseParameters {
            tempo: 240.0,
            pattern: Subdivision::Sixteenth,
            ..Default::default()
        };
        let mut s = Scheduler::new(params);
        s.toggle_loop(0.0).unwrap();

        let events = s.step(0.0);
        assert!(events.len() >= 2);
        assert_eq!(events[0].midi_note, 60);
        assert_eq!(events[1].midi_note, 62);
        for pair in events.windows(2) {
            assert!(pair[0].delay <= pair[1].delay);
        }
    }

    #[test]
    fn test_rests_consume_slots_silently() {
        let params = ExerciseParameters {
            tempo: 120.0,
            extra_rests: 2,
            ..Default::default()
        };
        let mut s = Scheduler::new(params);
        s.toggle_loop(0.0).unwrap();

        // 17 slots at 500ms each; drive past two loop iterations
        let events = drive(&mut s, 0.0, 17_000.0, 50.0);
        // First pass: 15 pitches, then two silent slots, then the wrap
        assert_eq!(events[14].midi_note, 60); // closing root
        assert_eq!(events[15].midi_note, 60); // restart at index 0 after rests
        assert_eq!(events[16].midi_note, 62);
    }

    #[test]
    fn test_loop_without_rests_restarts_at_index_one() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();

        let events = drive(&mut s, 0.0, 9_000.0, 50.0);
        // 15 slots per pass; the closing root is not repeated on wrap
        assert_eq!(events[14].midi_note, 60);
        assert_eq!(events[15].midi_note, 62);
    }

    #[test]
    fn test_pause_emits_nothing_and_loses_no_time() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        s.step(0.0);

        assert!(s.toggle_pause(100.0));
        assert!(s.is_paused());
        assert!(s.is_armed()); // frame stays armed to catch the resume
        assert!(s.step(600.0).is_empty());
        assert!(s.step(2_000.0).is_empty());

        // Resume re-anchors: the next pitch plays now, not as a burst of
        // overdue slots
        assert!(!s.toggle_pause(5_000.0));
        let events = s.step(5_000.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].midi_note, 62);
        assert_eq!(events[0].delay, 0.0);
    }

    #[test]
    fn test_pause_resume_with_no_elapsed_time_skips_nothing() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        s.step(0.0);

        s.toggle_pause(500.0);
        s.toggle_pause(500.0);
        let events = s.step(500.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].midi_note, 62); // neither skipped nor repeated
    }

    #[test]
    fn test_pause_when_never_started_is_a_no_op() {
        let mut s = scheduler_at_120();
        assert!(!s.toggle_pause(0.0));
        assert!(!s.is_paused());
        assert!(!s.is_armed());
        assert!(s.step(0.0).is_empty());
    }

    #[test]
    fn test_resume_from_stopped_plays_remainder_once() {
        let mut s = scheduler_at_120();
        // A session stopped mid-exercise: cursor parked past the start
        s.cursor = 13;
        s.armed = false;
        s.looping = false;

        assert!(s.toggle_pause(0.0)); // pauses the parked session
        assert!(!s.toggle_pause(1_000.0)); // resume begins Playing-Once
        assert!(s.is_armed());
        assert!(!s.is_looping());

        let events = drive(&mut s, 1_000.0, 3_000.0, 50.0);
        let notes: Vec<u8> = events.iter().map(|e| e.midi_note).collect();
        assert_eq!(notes, vec![62, 60]); // slots 13 and 14, then done
        assert!(!s.is_armed()); // ran off the end and stopped
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn test_play_once_stops_at_sequence_end() {
        let mut s = scheduler_at_120();
        s.looping = false;
        s.armed = true;
        s.cursor = 0;
        s.next_note_time = 0.0;

        let events = drive(&mut s, 0.0, 10_000.0, 50.0);
        assert_eq!(events.len(), 15); // one full pass, no wrap
        assert!(!s.is_armed());
    }

    #[test]
    fn test_intro_schedules_count_in_on_quarter_beats() {
        let mut s = scheduler_at_120();
        let events = s.play_with_intro(1_000.0).unwrap();

        assert_eq!(events.len(), 4);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.midi_note, 60);
            assert!((event.delay - i as f64 * 0.5).abs() < 1e-9);
        }
        assert!(s.is_looping());
        assert!(s.is_intro_active());
    }

    #[test]
    fn test_intro_spacing_ignores_subdivision_pattern() {
        let params = ExerciseParameters {
            tempo: 120.0,
            pattern: Subdivision::Sixteenth,
            ..Default::default()
        };
        let mut s = Scheduler::new(params);
        let events = s.play_with_intro(0.0).unwrap();

        // Count-in stays quarter spaced (500ms), not sixteenth spaced
        assert!((events[1].delay - 0.5).abs() < 1e-9);

        // The sequence proper starts after the full count-in (2000ms)...
        assert!(s.step(0.0).is_empty());
        let first = s.step(1_950.0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].midi_note, 60);
        assert!((first[0].delay - 0.05).abs() < 1e-9);

        // ...and then advances by the sixteenth duration (next slot at 2125ms)
        let second = s.step(2_100.0);
        assert_eq!(second[0].midi_note, 62);
        assert!((second[0].delay - 0.025).abs() < 1e-9);
    }

    #[test]
    fn test_intro_flag_clears_after_count_in_elapses() {
        let mut s = scheduler_at_120();
        s.play_with_intro(0.0).unwrap();

        s.step(1_999.0);
        assert!(s.is_intro_active());
        s.step(2_000.0);
        assert!(!s.is_intro_active());
    }

    #[test]
    fn test_intro_beats_of_two() {
        let params = ExerciseParameters {
            tempo: 120.0,
            intro_beats: 2,
            ..Default::default()
        };
        let mut s = Scheduler::new(params);
        let events = s.play_with_intro(0.0).unwrap();
        assert_eq!(events.len(), 2);

        // Main sequence starts one second in
        let first = s.step(950.0);
        assert_eq!(first[0].midi_note, 60);
        assert!((first[0].delay - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_transport_against_empty_sequence_is_refused() {
        let mut s = scheduler_at_120();
        s.sequence.clear();

        assert!(s.toggle_loop(0.0).is_err());
        assert!(!s.is_armed());
        assert!(s.play_with_intro(0.0).is_err());
        assert!(!s.is_armed());
    }

    #[test]
    fn test_set_tempo_swaps_durations_without_resetting_cursor() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        s.step(0.0);
        assert_eq!(s.cursor, 1);

        s.set_tempo(60.0);
        assert_eq!(s.cursor, 1);
        assert_eq!(s.durations.quarter, 1000.0);

        // Out-of-range tempos clamp
        s.set_tempo(1000.0);
        assert_eq!(s.params.tempo, TEMPO_MAX);
    }

    #[test]
    fn test_pitch_parameter_change_regenerates_and_resets() {
        let mut s = scheduler_at_120();
        s.toggle_loop(0.0).unwrap();
        s.step(0.0);
        assert_eq!(s.cursor, 1);

        s.set_root("D".parse().unwrap());
        assert_eq!(s.cursor, 0);
        assert_eq!(s.sequence[0], SequenceEntry::Pitch(62));
    }

    #[test]
    fn test_set_intervals_reclamps_extra_notes() {
        let mut s = scheduler_at_120();
        s.set_extra_notes(7);
        assert_eq!(s.params.extra_notes, 7);

        s.set_intervals(vec![0, 4, 7]);
        assert_eq!(s.params.extra_notes, 3);
        assert_eq!(s.params.intervals, vec![0, 4, 7]);

        // Empty interval sets are ignored
        s.set_intervals(vec![]);
        assert_eq!(s.params.intervals, vec![0, 4, 7]);
    }

    #[test]
    fn test_stop_resets_session_state() {
        let mut s = scheduler_at_120();
        s.play_with_intro(0.0).unwrap();
        s.step(2_000.0);

        s.stop();
        assert!(!s.is_armed());
        assert!(!s.is_looping());
        assert!(!s.is_paused());
        assert!(!s.is_intro_active());
        assert_eq!(s.cursor, 0);
    }
}
