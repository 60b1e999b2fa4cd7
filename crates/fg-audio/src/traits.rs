//! Audio sink trait and error types.

use std::time::Duration;

use fg_engine::Frame;

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
    /// The sink has been closed and accepts no more writes
    Closed,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
            AudioError::Closed => write!(f, "Audio sink is closed"),
        }
    }
}

impl std::error::Error for AudioError {}

/// A period-oriented audio output.
///
/// The feed thread blocks on [`wait_period`](AudioSink::wait_period),
/// renders exactly one period of frames, and hands them to
/// [`write`](AudioSink::write), retrying until the whole period is
/// consumed. After a fault, one [`recover`](AudioSink::recover) attempt
/// is made before the thread gives up.
pub trait AudioSink {
    /// The sample rate the sink was opened with.
    fn sample_rate(&self) -> u32;

    /// Frames the sink accepts per wakeup.
    fn period_frames(&self) -> usize;

    /// Block until the sink can accept a full period, bounded by
    /// `timeout`. Returns `Ok(false)` on timeout.
    fn wait_period(&mut self, timeout: Duration) -> Result<bool, AudioError>;

    /// Write frames, returning how many were consumed. May consume fewer
    /// than offered; the caller retries with the remainder.
    fn write(&mut self, frames: &[Frame]) -> Result<usize, AudioError>;

    /// Attempt in-place recovery after an underrun or write failure.
    fn recover(&mut self) -> Result<(), AudioError>;

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback and drain.
    fn stop(&mut self) -> Result<(), AudioError>;
}
