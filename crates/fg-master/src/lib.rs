//! Threaded control layer for fmgrid.
//!
//! [`FmPlayer`] owns the synthesizer on a feed thread and streams rendered
//! periods into an [`AudioSink`]. [`Sequencer`] walks a 32-slot note grid
//! on its own timing thread and drives the player through the [`NoteSink`]
//! seam. Both are plain owned handles; dropping them shuts their threads
//! down.

mod player;
mod sequencer;

pub use player::{FmPlayer, NoteCommand, NoteSink, PlayerError};
pub use sequencer::{LoopCallback, Sequencer, SequencerError, SlotBank};

// Re-export the pieces callers need so most users depend on this crate
// alone.
pub use fg_audio::{AudioError, AudioSink, CaptureHandle, CaptureSink, CpalSink};
pub use fg_engine::{Frame, OperatorEdit};
pub use fg_ir::{
    EnvelopeSpec, Note, NoteControl, Slot, VoiceConfig, WaveType, BPM_MAX, BPM_MIN,
    OPERATOR_COUNT, SLOT_COUNT,
};
