//! The grid sequencer: a timing thread walking 32 slots.
//!
//! The thread sleeps one step length between slots while running, and
//! parks on a condition variable while stopped — no polling in either
//! state. Slot contents live in a [`SlotBank`] shared between the caller,
//! the timing thread, and the loop callback, so any of them can
//! repopulate the grid mid-cycle.

use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use fg_ir::{ns_per_step, Note, NoteControl, Slot, VoiceConfig, BPM_MAX, BPM_MIN, SLOT_COUNT};
use log::{debug, warn};

use crate::player::{NoteCommand, NoteSink};

/// Error type for sequencer operations.
#[derive(Debug, PartialEq, Eq)]
pub enum SequencerError {
    /// Tempo outside the accepted range
    TempoOutOfRange(i32),
    /// Slot index outside the grid
    SlotOutOfRange(usize),
}

impl std::fmt::Display for SequencerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequencerError::TempoOutOfRange(bpm) => {
                write!(f, "Tempo {} bpm outside {}..={}", bpm, BPM_MIN, BPM_MAX)
            }
            SequencerError::SlotOutOfRange(index) => {
                write!(f, "Slot index {} outside 0..{}", index, SLOT_COUNT)
            }
        }
    }
}

impl std::error::Error for SequencerError {}

/// Invoked by the timing thread at the top of each 32-step cycle, before
/// slot 0 is read, with the bank so it can repopulate the grid.
pub type LoopCallback = Box<dyn FnMut(&SlotBank) + Send>;

/// Shared, lock-guarded slot grid.
///
/// Clones are handles to the same grid. Writers replace a whole slot
/// under the lock, so a reader never observes a control paired with
/// another write's note.
#[derive(Clone)]
pub struct SlotBank {
    slots: Arc<RwLock<[Slot; SLOT_COUNT]>>,
}

impl SlotBank {
    /// An empty grid.
    pub fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(std::array::from_fn(|_| Slot::empty()))),
        }
    }

    /// Replace one slot.
    pub fn fill(
        &self,
        index: usize,
        control: NoteControl,
        note: Option<Note>,
        voice: Option<VoiceConfig>,
    ) -> Result<(), SequencerError> {
        if index >= SLOT_COUNT {
            return Err(SequencerError::SlotOutOfRange(index));
        }
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots[index] = Slot {
            control,
            note,
            voice,
        };
        Ok(())
    }

    /// Empty every slot. Does not touch the run state.
    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        for slot in slots.iter_mut() {
            *slot = Slot::empty();
        }
    }

    /// Copy of one slot.
    pub fn get(&self, index: usize) -> Result<Slot, SequencerError> {
        if index >= SLOT_COUNT {
            return Err(SequencerError::SlotOutOfRange(index));
        }
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        Ok(slots[index].clone())
    }
}

impl Default for SlotBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing thread state, driven through the condition variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SeqState {
    /// Walking the grid.
    Run,
    /// Parked; one note-off was issued on entry.
    Stop,
    /// Return to slot 0, then run.
    Reset,
    /// Shut down.
    End,
}

struct SeqShared {
    state: Mutex<SeqState>,
    signal: Condvar,
    step_ns: AtomicU64,
}

impl SeqShared {
    fn transition(&self, next: SeqState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != SeqState::End {
            *state = next;
        }
        self.signal.notify_all();
    }
}

/// Owned handle to the timing thread.
///
/// Starts stopped; [`start`](Sequencer::start) begins the cycle at slot
/// 0 immediately.
pub struct Sequencer {
    shared: Arc<SeqShared>,
    bank: SlotBank,
    bpm: AtomicU16,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Sequencer {
    /// Spawn the timing thread over a note sink.
    pub fn initialize(
        player: Arc<dyn NoteSink>,
        bpm: u16,
        callback: Option<LoopCallback>,
    ) -> Result<Self, SequencerError> {
        check_bpm(bpm as i32)?;
        let shared = Arc::new(SeqShared {
            state: Mutex::new(SeqState::Stop),
            signal: Condvar::new(),
            step_ns: AtomicU64::new(ns_per_step(bpm)),
        });
        let bank = SlotBank::new();
        let thread = {
            let shared = shared.clone();
            let bank = bank.clone();
            thread::spawn(move || sequencer_thread(shared, bank, player, callback))
        };
        Ok(Self {
            shared,
            bank,
            bpm: AtomicU16::new(bpm),
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Handle to the shared grid.
    pub fn slots(&self) -> SlotBank {
        self.bank.clone()
    }

    /// Replace one slot.
    pub fn fill_slot(
        &self,
        index: usize,
        control: NoteControl,
        note: Option<Note>,
        voice: Option<VoiceConfig>,
    ) -> Result<(), SequencerError> {
        self.bank.fill(index, control, note, voice)
    }

    /// Empty every slot without changing the run state.
    pub fn clear(&self) {
        self.bank.clear();
    }

    /// Copy of one slot.
    pub fn slot(&self, index: usize) -> Result<Slot, SequencerError> {
        self.bank.get(index)
    }

    /// Map a musical position (quarter, eighth, sixteenth) to a grid
    /// index.
    pub fn slot_index(quarter: usize, eighth: usize, sixteenth: usize) -> usize {
        fg_ir::slot_index(quarter, eighth, sixteenth)
    }

    /// Begin (or resume) walking the grid.
    pub fn start(&self) {
        self.shared.transition(SeqState::Run);
    }

    /// Park the timing thread. One note-off is issued so nothing is left
    /// sustaining.
    pub fn stop(&self) {
        self.shared.transition(SeqState::Stop);
    }

    /// Return to slot 0 and run.
    pub fn reset(&self) {
        self.shared.transition(SeqState::Reset);
    }

    /// Set the tempo. Takes effect from the next step.
    pub fn set_bpm(&self, bpm: u16) -> Result<(), SequencerError> {
        check_bpm(bpm as i32)?;
        self.bpm.store(bpm, Ordering::Relaxed);
        self.shared.step_ns.store(ns_per_step(bpm), Ordering::Relaxed);
        Ok(())
    }

    /// Nudge the tempo by a signed delta. A delta that would leave the
    /// range is rejected and the tempo is unchanged.
    pub fn adjust_bpm(&self, delta: i16) -> Result<u16, SequencerError> {
        let current = self.bpm.load(Ordering::Relaxed);
        let target = current as i32 + delta as i32;
        check_bpm(target)?;
        let bpm = target as u16;
        self.bpm.store(bpm, Ordering::Relaxed);
        self.shared.step_ns.store(ns_per_step(bpm), Ordering::Relaxed);
        Ok(bpm)
    }

    /// The current tempo.
    pub fn bpm(&self) -> u16 {
        self.bpm.load(Ordering::Relaxed)
    }

    /// Shut the timing thread down and wait for it. Idempotent.
    pub fn destroy(&self) {
        {
            let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
            *state = SeqState::End;
            self.shared.signal.notify_all();
        }
        let handle = {
            let mut slot = self.thread.lock().unwrap_or_else(|e| e.into_inner());
            slot.take()
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("sequencer thread panicked");
            }
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn check_bpm(bpm: i32) -> Result<(), SequencerError> {
    if bpm < BPM_MIN as i32 || bpm > BPM_MAX as i32 {
        return Err(SequencerError::TempoOutOfRange(bpm));
    }
    Ok(())
}

fn sequencer_thread(
    shared: Arc<SeqShared>,
    bank: SlotBank,
    player: Arc<dyn NoteSink>,
    mut callback: Option<LoopCallback>,
) {
    let mut position: usize = 0;
    debug!("sequencer thread running");
    loop {
        let state = *shared.state.lock().unwrap_or_else(|e| e.into_inner());
        match state {
            SeqState::End => break,
            SeqState::Reset => {
                position = 0;
                shared.transition(SeqState::Run);
            }
            SeqState::Stop => {
                // Silence whatever is sustaining, then park until the
                // state changes.
                if let Err(err) = player.control_note(NoteCommand::Off) {
                    debug!("player rejected stop note-off: {}", err);
                }
                let mut guard = shared.state.lock().unwrap_or_else(|e| e.into_inner());
                while *guard == SeqState::Stop {
                    guard = shared
                        .signal
                        .wait(guard)
                        .unwrap_or_else(|e| e.into_inner());
                }
            }
            SeqState::Run => {
                let step_started = Instant::now();
                if position == 0 {
                    if let Some(cb) = callback.as_mut() {
                        cb(&bank);
                    }
                }
                // Read after the callback so a repopulated slot 0 takes
                // effect this cycle.
                let slot = {
                    let slots = bank.slots.read().unwrap_or_else(|e| e.into_inner());
                    slots[position].clone()
                };
                execute_slot(player.as_ref(), &slot);
                position = (position + 1) % SLOT_COUNT;

                let step = Duration::from_nanos(shared.step_ns.load(Ordering::Relaxed));
                let elapsed = step_started.elapsed();
                if elapsed < step {
                    thread::sleep(step - elapsed);
                }
            }
        }
    }
    debug!("sequencer thread stopped");
}

/// Issue one slot's contents in order: voice, then note, then command.
fn execute_slot(player: &dyn NoteSink, slot: &Slot) {
    if slot.voice.is_some() {
        if let Err(err) = player.set_voice(slot.voice.clone()) {
            debug!("player rejected voice: {}", err);
        }
    }
    if let Some(note) = slot.note {
        if let Err(err) = player.set_note(note) {
            debug!("player rejected note: {}", err);
        }
    }
    let command = match slot.control {
        NoteControl::None => return,
        NoteControl::NoteOn => NoteCommand::On,
        NoteControl::NoteOff => NoteCommand::Off,
        NoteControl::Stoccato => NoteCommand::Stoccato,
    };
    if let Err(err) = player.control_note(command) {
        debug!("player rejected command: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_rejects_out_of_range_index() {
        let bank = SlotBank::new();
        assert_eq!(
            bank.fill(SLOT_COUNT, NoteControl::NoteOn, None, None),
            Err(SequencerError::SlotOutOfRange(SLOT_COUNT))
        );
        assert_eq!(
            bank.get(SLOT_COUNT).unwrap_err(),
            SequencerError::SlotOutOfRange(SLOT_COUNT)
        );
    }

    #[test]
    fn bank_clear_empties_every_slot() {
        let bank = SlotBank::new();
        bank.fill(3, NoteControl::NoteOn, Some(7), None).unwrap();
        bank.fill(31, NoteControl::Stoccato, None, None).unwrap();
        bank.clear();
        for index in 0..SLOT_COUNT {
            assert!(bank.get(index).unwrap().is_empty());
        }
    }

    #[test]
    fn clones_share_the_grid() {
        let bank = SlotBank::new();
        let other = bank.clone();
        other.fill(5, NoteControl::NoteOff, Some(-3), None).unwrap();
        let slot = bank.get(5).unwrap();
        assert_eq!(slot.control, NoteControl::NoteOff);
        assert_eq!(slot.note, Some(-3));
    }

    #[test]
    fn tempo_bounds() {
        assert!(check_bpm(BPM_MIN as i32).is_ok());
        assert!(check_bpm(BPM_MAX as i32).is_ok());
        assert_eq!(
            check_bpm(BPM_MIN as i32 - 1),
            Err(SequencerError::TempoOutOfRange(19))
        );
        assert_eq!(
            check_bpm(BPM_MAX as i32 + 1),
            Err(SequencerError::TempoOutOfRange(301))
        );
    }
}
