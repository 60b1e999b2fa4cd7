//! Core data model for the fmgrid synthesis engine.
//!
//! This crate defines the immutable configuration types shared across the
//! engine: waveform tables, envelope shapes, operator/voice presets, and
//! the sequencer grid data. The playback engine consumes these; runtime
//! state never flows back into them.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod envelope;
mod grid;
mod preset;
mod tables;
mod voice;
pub mod wavetable;

pub use envelope::{Breakpoint, EnvelopeSpec, ENV_UPDATE_RATE, MAX_BREAKPOINTS};
pub use grid::{
    ns_per_step, slot_index, NoteControl, Slot, BPM_MAX, BPM_MIN, SLOT_COUNT, STEPS_PER_BEAT,
};
pub use voice::{Note, OperatorConfig, VoiceConfig, OPERATOR_COUNT};
pub use wavetable::{WaveType, TABLE_LEN};
