//! Audio sink backends for fmgrid.
//!
//! Defines the period-oriented [`AudioSink`] contract the feed thread
//! drives, a CPAL implementation for real devices, and an in-memory
//! capture sink for tests and offline rendering.

mod capture;
mod cpal_backend;
mod traits;

pub use capture::{CaptureHandle, CaptureSink};
pub use cpal_backend::CpalSink;
pub use traits::{AudioError, AudioSink};
