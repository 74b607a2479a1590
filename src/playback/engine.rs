//! Threaded playback engine
//!
//! Wraps the [`Scheduler`] state machine in a dedicated thread that stands in
//! for a display-refresh callback source: while a session is armed the loop
//! wakes roughly every frame and runs one scheduling step; while idle it
//! blocks on the command channel. The public handle communicates only
//! through channels and atomics, so all session state stays owned by the
//! engine thread.

use crate::playback::event::NoteEvent;
use crate::playback::scheduler::Scheduler;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use etude_core::types::{ExerciseParameters, Note, Subdivision};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Frame pacing while a session is armed (roughly display refresh rate)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Commands that can be sent to the engine thread
#[derive(Debug)]
enum EngineCommand {
    ToggleLoop,
    TogglePause,
    PlayWithIntro,
    SetTempo(f32),
    SetRoot(Note),
    SetRootOctave(i8),
    SetIntervals(Vec<u8>),
    SetNumOctaves(u8),
    SetExtraNotes(usize),
    SetExtraRests(usize),
    SetNoteDuration(f32),
    SetPattern(Subdivision),
    SetIntroBeats(u8),
    AddSubscriber(Sender<NoteEvent>),
    WatchParams(Sender<ExerciseParameters>),
    Shutdown,
}

/// Handle for driving the engine thread
///
/// Transport and parameter calls are fire-and-forget; observable state is
/// mirrored into atomics and a shared parameter snapshot.
pub struct LooperEngine {
    command_tx: Sender<EngineCommand>,
    params: Arc<RwLock<ExerciseParameters>>,
    playing: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    intro_active: Arc<AtomicBool>,
    sequence_len: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl LooperEngine {
    /// Spawn the engine thread around an initial parameter set
    pub fn new(params: ExerciseParameters) -> Self {
        let scheduler = Scheduler::new(params);
        let shared_params = Arc::new(RwLock::new(scheduler.params().clone()));
        let playing = Arc::new(AtomicBool::new(false));
        let paused = Arc::new(AtomicBool::new(false));
        let intro_active = Arc::new(AtomicBool::new(false));
        let sequence_len = Arc::new(AtomicUsize::new(scheduler.sequence_len()));

        let (command_tx, command_rx) = unbounded();

        let engine_loop = EngineLoop {
            scheduler,
            command_rx,
            subscribers: Vec::new(),
            param_watchers: Vec::new(),
            params: shared_params.clone(),
            playing: playing.clone(),
            paused: paused.clone(),
            intro_active: intro_active.clone(),
            sequence_len: sequence_len.clone(),
            origin: Instant::now(),
        };

        let thread = thread::spawn(move || engine_loop.run());

        LooperEngine {
            command_tx,
            params: shared_params,
            playing,
            paused,
            intro_active,
            sequence_len,
            thread: Some(thread),
        }
    }

    /// Create a new subscriber that will receive scheduled note events
    ///
    /// Multiple subscribers can be created - all receive the same events
    pub fn subscribe(&self) -> Receiver<NoteEvent> {
        let (tx, rx) = unbounded();
        let _ = self.command_tx.send(EngineCommand::AddSubscriber(tx));
        rx
    }

    /// Receive a parameter snapshot after every mutation (for persistence)
    pub fn watch_params(&self) -> Receiver<ExerciseParameters> {
        let (tx, rx) = unbounded();
        let _ = self.command_tx.send(EngineCommand::WatchParams(tx));
        rx
    }

    // --- transport ---------------------------------------------------------

    pub fn toggle_loop(&self) {
        let _ = self.command_tx.send(EngineCommand::ToggleLoop);
    }

    pub fn toggle_pause(&self) {
        let _ = self.command_tx.send(EngineCommand::TogglePause);
    }

    pub fn play_with_intro(&self) {
        let _ = self.command_tx.send(EngineCommand::PlayWithIntro);
    }

    // --- parameters --------------------------------------------------------

    pub fn set_tempo(&self, bpm: f32) {
        let _ = self.command_tx.send(EngineCommand::SetTempo(bpm));
    }

    pub fn set_root(&self, root: Note) {
        let _ = self.command_tx.send(EngineCommand::SetRoot(root));
    }

    pub fn set_root_octave(&self, octave: i8) {
        let _ = self.command_tx.send(EngineCommand::SetRootOctave(octave));
    }

    pub fn set_intervals(&self, intervals: Vec<u8>) {
        let _ = self.command_tx.send(EngineCommand::SetIntervals(intervals));
    }

    pub fn set_num_octaves(&self, num_octaves: u8) {
        let _ = self.command_tx.send(EngineCommand::SetNumOctaves(num_octaves));
    }

    pub fn set_extra_notes(&self, extra_notes: usize) {
        let _ = self.command_tx.send(EngineCommand::SetExtraNotes(extra_notes));
    }

    pub fn set_extra_rests(&self, extra_rests: usize) {
        let _ = self.command_tx.send(EngineCommand::SetExtraRests(extra_rests));
    }

    pub fn set_note_duration(&self, seconds: f32) {
        let _ = self.command_tx.send(EngineCommand::SetNoteDuration(seconds));
    }

    pub fn set_pattern(&self, pattern: Subdivision) {
        let _ = self.command_tx.send(EngineCommand::SetPattern(pattern));
    }

    pub fn set_intro_beats(&self, beats: u8) {
        let _ = self.command_tx.send(EngineCommand::SetIntroBeats(beats));
    }

    // --- observable state --------------------------------------------------

    /// Snapshot of the current exercise parameters
    pub fn params(&self) -> ExerciseParameters {
        self.params.read().expect("params lock poisoned").clone()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn is_intro_active(&self) -> bool {
        self.intro_active.load(Ordering::Relaxed)
    }

    /// Length of the currently generated sequence
    pub fn sequence_len(&self) -> usize {
        self.sequence_len.load(Ordering::Relaxed)
    }
}

impl Drop for LooperEngine {
    fn drop(&mut self) {
        let _ = self.command_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Internal engine loop that runs in a dedicated thread
struct EngineLoop {
    scheduler: Scheduler,
    command_rx: Receiver<EngineCommand>,
    subscribers: Vec<Sender<NoteEvent>>,
    param_watchers: Vec<Sender<ExerciseParameters>>,
    params: Arc<RwLock<ExerciseParameters>>,
    playing: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    intro_active: Arc<AtomicBool>,
    sequence_len: Arc<AtomicUsize>,
    origin: Instant,
}

impl EngineLoop {
    fn run(mut self) {
        loop {
            if self.scheduler.is_armed() {
                // Frame-driven mode: commands interrupt immediately, frame
                // timeouts run one scheduling step
                match self.command_rx.recv_timeout(FRAME_INTERVAL) {
                    Ok(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        let now = self.now_ms();
                        let events = self.scheduler.step(now);
                        self.broadcast(events);
                        self.sync_flags();
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                // Idle: block until something to do
                match self.command_rx.recv() {
                    Ok(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    Err(_) => break, // Channel closed
                }
            }
        }

        self.playing.store(false, Ordering::Relaxed);
    }

    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Handle a command, returns true if the engine should shut down
    fn handle_command(&mut self, cmd: EngineCommand) -> bool {
        let now = self.now_ms();
        match cmd {
            EngineCommand::ToggleLoop => {
                if let Err(e) = self.scheduler.toggle_loop(now) {
                    eprintln!("etude: {}", e);
                }
            }
            EngineCommand::TogglePause => {
                self.scheduler.toggle_pause(now);
            }
            EngineCommand::PlayWithIntro => match self.scheduler.play_with_intro(now) {
                Ok(events) => self.broadcast(events),
                Err(e) => eprintln!("etude: {}", e),
            },
            EngineCommand::SetTempo(bpm) => {
                self.scheduler.set_tempo(bpm);
                self.publish_params();
            }
            EngineCommand::SetRoot(root) => {
                self.scheduler.set_root(root);
                self.publish_params();
            }
            EngineCommand::SetRootOctave(octave) => {
                self.scheduler.set_root_octave(octave);
                self.publish_params();
            }
            EngineCommand::SetIntervals(intervals) => {
                self.scheduler.set_intervals(intervals);
                self.publish_params();
            }
            EngineCommand::SetNumOctaves(n) => {
                self.scheduler.set_num_octaves(n);
                self.publish_params();
            }
            EngineCommand::SetExtraNotes(n) => {
                self.scheduler.set_extra_notes(n);
                self.publish_params();
            }
            EngineCommand::SetExtraRests(n) => {
                self.scheduler.set_extra_rests(n);
                self.publish_params();
            }
            EngineCommand::SetNoteDuration(seconds) => {
                self.scheduler.set_note_duration(seconds);
                self.publish_params();
            }
            EngineCommand::SetPattern(pattern) => {
                self.scheduler.set_pattern(pattern);
                self.publish_params();
            }
            EngineCommand::SetIntroBeats(beats) => {
                self.scheduler.set_intro_beats(beats);
                self.publish_params();
            }
            EngineCommand::AddSubscriber(tx) => {
                self.subscribers.push(tx);
            }
            EngineCommand::WatchParams(tx) => {
                self.param_watchers.push(tx);
            }
            EngineCommand::Shutdown => {
                return true;
            }
        }
        self.sync_flags();
        false
    }

    /// Broadcast events to all subscribers, removing disconnected ones
    fn broadcast(&mut self, events: Vec<NoteEvent>) {
        for event in events {
            self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    /// Push the current parameter snapshot to the handle and any watchers
    fn publish_params(&mut self) {
        let snapshot = self.scheduler.params().clone();
        if let Ok(mut shared) = self.params.write() {
            *shared = snapshot.clone();
        }
        self.param_watchers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    fn sync_flags(&self) {
        self.playing.store(self.scheduler.is_armed(), Ordering::Relaxed);
        self.paused.store(self.scheduler.is_paused(), Ordering::Relaxed);
        self.intro_active
            .store(self.scheduler.is_intro_active(), Ordering::Relaxed);
        self.sequence_len
            .store(self.scheduler.sequence_len(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_until(deadline_ms: u64, mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_engine_creation() {
        let engine = LooperEngine::new(ExerciseParameters::default());
        assert!(!engine.is_playing());
        assert_eq!(engine.sequence_len(), 15);
        assert_eq!(engine.params().tempo, 80.0);
    }

    #[test]
    fn test_toggle_loop_emits_the_first_note() {
        let engine = LooperEngine::new(ExerciseParameters::default());
        let events = engine.subscribe();

        engine.toggle_loop();
        let first = events
            .recv_timeout(Duration::from_secs(1))
            .expect("no event within a second of starting the loop");
        assert_eq!(first.midi_note, 60);
        assert!(wait_until(1_000, || engine.is_playing()));

        engine.toggle_loop();
        assert!(wait_until(1_000, || !engine.is_playing()));
    }

    #[test]
    fn test_parameter_updates_are_applied_and_published() {
        let engine = LooperEngine::new(ExerciseParameters::default());
        let watcher = engine.watch_params();

        engine.set_tempo(120.0);
        let snapshot = watcher
            .recv_timeout(Duration::from_secs(1))
            .expect("no parameter snapshot");
        assert_eq!(snapshot.tempo, 120.0);
        assert!(wait_until(1_000, || engine.params().tempo == 120.0));

        engine.set_extra_rests(2);
        assert!(wait_until(1_000, || engine.sequence_len() == 17));
    }

    #[test]
    fn test_intro_emits_count_in_immediately() {
        let engine = LooperEngine::new(ExerciseParameters::default());
        let events = engine.subscribe();

        engine.play_with_intro();
        // All four count-in events are emitted in one batch
        for _ in 0..4 {
            let event = events
                .recv_timeout(Duration::from_secs(1))
                .expect("missing count-in event");
            assert_eq!(event.midi_note, 60);
        }
        assert!(wait_until(1_000, || engine.is_playing()));
    }

    #[test]
    fn test_pause_command_does_not_panic_when_stopped() {
        let engine = LooperEngine::new(ExerciseParameters::default());
        engine.toggle_pause();
        thread::sleep(Duration::from_millis(50));
        assert!(!engine.is_paused());
        assert!(!engine.is_playing());
    }
}
