//! Sequencer grid data: slots, indices, and tempo math.
//!
//! The grid is a fixed 32-slot array — two bars of sixteenth notes. Each
//! slot holds at most one note command and an optional voice override.
//! The threaded sequencer that walks the grid lives in `fg-master`.

use crate::voice::{Note, VoiceConfig};

/// Slots in the grid: 2 bars x 16 sixteenth notes.
pub const SLOT_COUNT: usize = 32;

/// Sixteenth-note steps per beat.
pub const STEPS_PER_BEAT: u64 = 4;

/// Lowest accepted tempo.
pub const BPM_MIN: u16 = 20;

/// Highest accepted tempo.
pub const BPM_MAX: u16 = 300;

/// Note command carried by a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoteControl {
    /// Empty step.
    #[default]
    None,
    /// Trigger the note.
    NoteOn,
    /// Release the current note.
    NoteOff,
    /// Trigger and immediately release.
    Stoccato,
}

/// One sixteenth-note position in the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slot {
    /// Command to issue at this step.
    pub control: NoteControl,
    /// Note to apply before the command, if any.
    pub note: Option<Note>,
    /// Voice preset to apply before the note, if any.
    pub voice: Option<VoiceConfig>,
}

impl Slot {
    /// An empty step.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this slot carries nothing.
    pub fn is_empty(&self) -> bool {
        self.control == NoteControl::None && self.note.is_none() && self.voice.is_none()
    }
}

/// Map a musical position to a grid index.
///
/// `quarter` counts quarter notes across both bars (`0..8`), `eighth` and
/// `sixteenth` subdivide it (`0..2` each).
pub fn slot_index(quarter: usize, eighth: usize, sixteenth: usize) -> usize {
    quarter * 4 + eighth * 2 + sixteenth
}

/// Nanoseconds per sixteenth-note step at the given tempo.
pub fn ns_per_step(bpm: u16) -> u64 {
    60_000_000_000 / (bpm as u64 * STEPS_PER_BEAT)
}
