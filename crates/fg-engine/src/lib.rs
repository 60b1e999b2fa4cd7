//! Four-operator FM synthesis engine for fmgrid.
//!
//! Consumes the immutable configuration types from `fg-ir` and produces
//! PCM frames one buffer at a time. Everything here is single-threaded by
//! construction — the player in `fg-master` owns one `FmSynth` per feed
//! thread.

#![cfg_attr(not(feature = "std"), no_std)]

mod envelope_state;
mod frame;
mod operator;
pub mod pitch;
mod synth;

pub use envelope_state::{EnvelopePhase, EnvelopeState};
pub use frame::Frame;
pub use operator::{OperatorEdit, OperatorState};
pub use synth::FmSynth;
