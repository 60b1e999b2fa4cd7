//! The FM player: a feed thread driving a synthesizer into an audio sink.
//!
//! Control flows one way. Callers stage changes from any thread; the feed
//! thread drains them between periods and is the only thread that ever
//! touches the synthesizer. Voice and operator edits go through a
//! reader/writer-locked batch so a multi-field change lands atomically;
//! the note and the note command are single-word atomics the feed thread
//! consumes opportunistically.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fg_audio::{AudioError, AudioSink, CpalSink};
use fg_engine::{FmSynth, Frame, OperatorEdit};
use fg_ir::{Note, VoiceConfig, WaveType, OPERATOR_COUNT};
use log::{debug, warn};

/// How long the feed thread waits for sink readiness before going back
/// to check for staged updates.
const SINK_WAIT: Duration = Duration::from_millis(100);

/// Upper bound on the period buffer; sinks advertising more get fed in
/// chunks of this size.
const MAX_PERIOD: usize = 4096;

/// Note command encoding for the control atomic.
const CONTROL_NONE: u8 = 0;
const CONTROL_ON: u8 = 1;
const CONTROL_OFF: u8 = 2;
const CONTROL_STOCCATO: u8 = 3;

/// A gate command for the active note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteCommand {
    /// Trigger the envelopes and sustain until `Off`.
    On,
    /// Release the envelopes.
    Off,
    /// Trigger and immediately release; the envelopes run their full
    /// course without sustaining.
    Stoccato,
}

impl NoteCommand {
    fn encode(self) -> u8 {
        match self {
            NoteCommand::On => CONTROL_ON,
            NoteCommand::Off => CONTROL_OFF,
            NoteCommand::Stoccato => CONTROL_STOCCATO,
        }
    }
}

/// Error type for player operations.
#[derive(Debug)]
pub enum PlayerError {
    /// The audio sink could not be opened or started
    SinkUnavailable(AudioError),
    /// The feed thread has terminated; the player accepts no more calls
    Closed,
    /// Operator or modulation source index out of range
    OperatorOutOfRange(usize),
}

impl std::fmt::Display for PlayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerError::SinkUnavailable(err) => write!(f, "Audio sink unavailable: {}", err),
            PlayerError::Closed => write!(f, "Player is closed"),
            PlayerError::OperatorOutOfRange(index) => {
                write!(f, "Operator index {} out of range", index)
            }
        }
    }
}

impl std::error::Error for PlayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlayerError::SinkUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

/// The seam the sequencer drives the player through. Implemented by
/// [`FmPlayer`]; tests substitute recorders.
pub trait NoteSink: Send + Sync {
    /// Swap the voice (`Some`) or re-apply the current one (`None`).
    fn set_voice(&self, voice: Option<VoiceConfig>) -> Result<(), PlayerError>;
    /// Set the active note without gating.
    fn set_note(&self, note: Note) -> Result<(), PlayerError>;
    /// Issue a gate command for the active note.
    fn control_note(&self, command: NoteCommand) -> Result<(), PlayerError>;
}

/// Staged voice change, drained in one batch by the feed thread.
#[derive(Clone, Debug, Default)]
enum VoiceChange {
    #[default]
    None,
    /// Re-apply the active configuration, resetting envelope state.
    Reapply,
    /// Swap in a whole new voice.
    Swap(VoiceConfig),
}

/// Pending updates staged by callers. One dirty bit per operator plus
/// one for the voice; the feed thread takes the whole batch at once.
#[derive(Default)]
struct PendingUpdate {
    voice: VoiceChange,
    edits: [OperatorEdit; OPERATOR_COUNT],
    dirty: u8,
}

const DIRTY_VOICE: u8 = 1 << OPERATOR_COUNT;

/// State shared between caller threads and the feed thread.
struct PlayerShared {
    updates: RwLock<PendingUpdate>,
    note: AtomicI32,
    note_pending: AtomicBool,
    control: AtomicU8,
    running: AtomicBool,
    closed: AtomicBool,
}

/// Owned handle to the feed thread.
///
/// All setters are callable from any thread and return
/// [`PlayerError::Closed`] once the feed thread has terminated, whether
/// by [`close`](FmPlayer::close) or by an unrecoverable sink fault.
pub struct FmPlayer {
    shared: Arc<PlayerShared>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl FmPlayer {
    /// Open the default audio device and start the feed thread with the
    /// given voice. The device and its stream are constructed on the
    /// feed thread itself and never leave it.
    pub fn initialize(config: VoiceConfig) -> Result<Self, PlayerError> {
        let sample_rate = config.sample_rate;
        Self::with_sink_factory(config, move || CpalSink::open(sample_rate))
    }

    /// Start the feed thread over a caller-provided sink.
    pub fn with_sink<S>(config: VoiceConfig, sink: S) -> Result<Self, PlayerError>
    where
        S: AudioSink + Send + 'static,
    {
        Self::with_sink_factory(config, move || Ok(sink))
    }

    /// Start the feed thread over a sink built by `open`, which runs on
    /// the feed thread. The sink itself need not be `Send` — backends
    /// whose streams are pinned to their thread (cpal) work here.
    /// Construction and start failures are reported back synchronously
    /// as `SinkUnavailable`.
    pub fn with_sink_factory<S, F>(config: VoiceConfig, open: F) -> Result<Self, PlayerError>
    where
        S: AudioSink,
        F: FnOnce() -> Result<S, AudioError> + Send + 'static,
    {
        let shared = Arc::new(PlayerShared {
            updates: RwLock::new(PendingUpdate::default()),
            note: AtomicI32::new(0),
            note_pending: AtomicBool::new(false),
            control: AtomicU8::new(CONTROL_NONE),
            running: AtomicBool::new(true),
            closed: AtomicBool::new(false),
        });
        let thread_shared = shared.clone();
        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let sink = match open().and_then(|mut sink| sink.start().map(|()| sink)) {
                Ok(sink) => sink,
                Err(err) => {
                    thread_shared.closed.store(true, Ordering::Release);
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));
            feed_thread(config, sink, thread_shared);
        });
        let player = Self {
            shared,
            thread: Mutex::new(Some(handle)),
        };
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(player),
            Ok(Err(err)) => {
                player.close();
                Err(PlayerError::SinkUnavailable(err))
            }
            Err(_) => {
                player.close();
                Err(PlayerError::SinkUnavailable(AudioError::Playback(
                    "feed thread died during startup".into(),
                )))
            }
        }
    }

    fn ensure_open(&self) -> Result<(), PlayerError> {
        if self.shared.closed.load(Ordering::Acquire) {
            Err(PlayerError::Closed)
        } else {
            Ok(())
        }
    }

    fn stage_edit<F>(&self, index: usize, stage: F) -> Result<(), PlayerError>
    where
        F: FnOnce(&mut OperatorEdit),
    {
        self.ensure_open()?;
        if index >= OPERATOR_COUNT {
            return Err(PlayerError::OperatorOutOfRange(index));
        }
        let mut updates = self
            .shared
            .updates
            .write()
            .unwrap_or_else(|e| e.into_inner());
        stage(&mut updates.edits[index]);
        updates.dirty |= 1 << index;
        Ok(())
    }

    /// Stage a full voice swap, or a re-apply of the active voice.
    pub fn set_voice(&self, voice: Option<VoiceConfig>) -> Result<(), PlayerError> {
        self.ensure_open()?;
        let mut updates = self
            .shared
            .updates
            .write()
            .unwrap_or_else(|e| e.into_inner());
        updates.voice = match voice {
            Some(config) => VoiceChange::Swap(config),
            None => VoiceChange::Reapply,
        };
        updates.dirty |= DIRTY_VOICE;
        Ok(())
    }

    /// Stage a wave type change for one operator.
    pub fn set_operator_wave_type(&self, index: usize, wave: WaveType) -> Result<(), PlayerError> {
        self.stage_edit(index, |edit| edit.wave = Some(wave))
    }

    /// Stage a frequency ratio change for one operator.
    pub fn set_operator_ratio(&self, index: usize, ratio: f32) -> Result<(), PlayerError> {
        self.stage_edit(index, |edit| edit.frequency_ratio = Some(ratio))
    }

    /// Stage a mix level change for one operator.
    pub fn set_operator_mix_level(&self, index: usize, level: f32) -> Result<(), PlayerError> {
        self.stage_edit(index, |edit| edit.mix_level = Some(level))
    }

    /// Stage a modulation weight from `source` into operator `index`.
    pub fn set_operator_modulation(
        &self,
        index: usize,
        source: usize,
        weight: f32,
    ) -> Result<(), PlayerError> {
        if source >= OPERATOR_COUNT {
            return Err(PlayerError::OperatorOutOfRange(source));
        }
        self.stage_edit(index, |edit| edit.modulation[source] = Some(weight))
    }

    /// Stage a fixed-pitch note for one operator; `None` returns it to
    /// ratio tuning.
    pub fn set_operator_fixed_note(
        &self,
        index: usize,
        note: Option<Note>,
    ) -> Result<(), PlayerError> {
        self.stage_edit(index, |edit| edit.fixed_note = Some(note))
    }

    /// Set the active note. Takes effect before the next rendered
    /// period; does not gate.
    pub fn set_note(&self, note: Note) -> Result<(), PlayerError> {
        self.ensure_open()?;
        self.shared.note.store(note, Ordering::Release);
        self.shared.note_pending.store(true, Ordering::Release);
        Ok(())
    }

    /// Issue a gate command. A command staged before the previous one is
    /// consumed replaces it.
    pub fn control_note(&self, command: NoteCommand) -> Result<(), PlayerError> {
        self.ensure_open()?;
        self.shared.control.store(command.encode(), Ordering::Release);
        Ok(())
    }

    /// Whether the feed thread has terminated.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Ask the feed thread to stop and wait for it. Idempotent.
    pub fn close(&self) {
        self.shared.running.store(false, Ordering::Release);
        let handle = {
            let mut slot = self.thread.lock().unwrap_or_else(|e| e.into_inner());
            slot.take()
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("feed thread panicked");
            }
        }
        self.shared.closed.store(true, Ordering::Release);
    }
}

impl Drop for FmPlayer {
    fn drop(&mut self) {
        self.close();
    }
}

impl NoteSink for FmPlayer {
    fn set_voice(&self, voice: Option<VoiceConfig>) -> Result<(), PlayerError> {
        FmPlayer::set_voice(self, voice)
    }

    fn set_note(&self, note: Note) -> Result<(), PlayerError> {
        FmPlayer::set_note(self, note)
    }

    fn control_note(&self, command: NoteCommand) -> Result<(), PlayerError> {
        FmPlayer::control_note(self, command)
    }
}

/// Take the staged batch under one lock acquisition and apply it to the
/// synth with the lock released, never across rendering.
fn drain_updates(shared: &PlayerShared, synth: &mut FmSynth, applied: &mut VoiceConfig) {
    let staged = {
        let mut updates = shared.updates.write().unwrap_or_else(|e| e.into_inner());
        if updates.dirty == 0 {
            return;
        }
        std::mem::take(&mut *updates)
    };
    match staged.voice {
        VoiceChange::Swap(config) => {
            synth.configure(&config);
            *applied = config;
        }
        VoiceChange::Reapply => synth.configure(applied),
        VoiceChange::None => {}
    }
    for (index, edit) in staged.edits.iter().enumerate() {
        if !edit.is_empty() {
            synth.apply_edit(index, edit);
        }
    }
}

/// Push a full period into the sink, waiting for room as needed.
fn write_all<S: AudioSink>(sink: &mut S, mut frames: &[Frame]) -> Result<(), AudioError> {
    while !frames.is_empty() {
        let consumed = sink.write(frames)?;
        frames = &frames[consumed..];
        if !frames.is_empty() {
            sink.wait_period(SINK_WAIT)?;
        }
    }
    Ok(())
}

fn feed_thread<S: AudioSink>(config: VoiceConfig, mut sink: S, shared: Arc<PlayerShared>) {
    let mut synth = FmSynth::new(&config);
    let mut applied = config;
    let mut buffer = [Frame::silence(); MAX_PERIOD];
    let period = sink.period_frames().clamp(1, MAX_PERIOD);
    let mut recovered = false;
    debug!("feed thread running, {} frames per period", period);

    while shared.running.load(Ordering::Acquire) {
        drain_updates(&shared, &mut synth, &mut applied);
        if shared.note_pending.swap(false, Ordering::AcqRel) {
            synth.set_note(shared.note.load(Ordering::Acquire));
        }
        match shared.control.swap(CONTROL_NONE, Ordering::AcqRel) {
            CONTROL_ON => synth.note_on(),
            CONTROL_OFF => synth.note_off(),
            CONTROL_STOCCATO => {
                synth.note_on();
                synth.note_off();
            }
            _ => {}
        }

        let ready = match sink.wait_period(SINK_WAIT) {
            Ok(ready) => ready,
            Err(err) => {
                if !handle_fault(&mut sink, &mut recovered, err) {
                    break;
                }
                continue;
            }
        };
        if !ready {
            // Timed out; go back around and pick up staged updates.
            continue;
        }

        let frames = &mut buffer[..period];
        synth.render(frames);
        match write_all(&mut sink, frames) {
            Ok(()) => recovered = false,
            Err(err) => {
                if !handle_fault(&mut sink, &mut recovered, err) {
                    break;
                }
            }
        }
    }

    shared.closed.store(true, Ordering::Release);
    if let Err(err) = sink.stop() {
        debug!("sink stop on shutdown: {}", err);
    }
    debug!("feed thread stopped");
}

/// One in-place recovery per fault streak; a second consecutive fault
/// terminates the thread. Returns whether the thread should continue.
fn handle_fault<S: AudioSink>(sink: &mut S, recovered: &mut bool, err: AudioError) -> bool {
    if *recovered {
        warn!("audio sink faulted again after recovery, stopping: {}", err);
        return false;
    }
    warn!("audio sink faulted, attempting recovery: {}", err);
    match sink.recover() {
        Ok(()) => {
            *recovered = true;
            true
        }
        Err(recover_err) => {
            warn!("audio sink recovery failed, stopping: {}", recover_err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_encoding_round_trips_through_the_atomic() {
        let control = AtomicU8::new(CONTROL_NONE);
        control.store(NoteCommand::Stoccato.encode(), Ordering::Release);
        assert_eq!(control.swap(CONTROL_NONE, Ordering::AcqRel), CONTROL_STOCCATO);
        assert_eq!(control.load(Ordering::Acquire), CONTROL_NONE);
    }

    #[test]
    fn pending_update_take_resets_the_batch() {
        let mut pending = PendingUpdate::default();
        pending.edits[2].mix_level = Some(0.5);
        pending.dirty = (1 << 2) | DIRTY_VOICE;
        pending.voice = VoiceChange::Reapply;
        let taken = std::mem::take(&mut pending);
        assert_eq!(taken.dirty, (1 << 2) | DIRTY_VOICE);
        assert!(matches!(taken.voice, VoiceChange::Reapply));
        assert_eq!(pending.dirty, 0);
        assert!(matches!(pending.voice, VoiceChange::None));
        assert!(pending.edits[2].is_empty());
    }
}
