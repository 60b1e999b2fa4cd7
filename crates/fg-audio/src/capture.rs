//! In-memory capture sink.
//!
//! Implements the sink contract without a device: periods become ready on
//! a wall-clock cadence matching the sample rate, and every written frame
//! is recorded for later inspection. Used by tests and offline rendering.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use fg_engine::Frame;

use crate::traits::{AudioError, AudioSink};

/// A paced, recording audio sink.
pub struct CaptureSink {
    sample_rate: u32,
    period: usize,
    period_duration: Duration,
    next_period: Instant,
    frames: Arc<Mutex<Vec<Frame>>>,
    closed: bool,
}

/// Read side of a [`CaptureSink`]; usable while the sink is owned by a
/// feed thread.
#[derive(Clone)]
pub struct CaptureHandle {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl CaptureSink {
    /// Create a capture sink and the handle to its recorded frames.
    pub fn new(sample_rate: u32, period: usize) -> (Self, CaptureHandle) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let period_duration =
            Duration::from_nanos(period as u64 * 1_000_000_000 / sample_rate.max(1) as u64);
        let sink = Self {
            sample_rate,
            period,
            period_duration,
            next_period: Instant::now(),
            frames: frames.clone(),
            closed: false,
        };
        (sink, CaptureHandle { frames })
    }
}

impl AudioSink for CaptureSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn period_frames(&self) -> usize {
        self.period
    }

    fn wait_period(&mut self, timeout: Duration) -> Result<bool, AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        let now = Instant::now();
        if self.next_period <= now {
            self.next_period = now + self.period_duration;
            return Ok(true);
        }
        let ready_in = self.next_period - now;
        if ready_in > timeout {
            thread::sleep(timeout);
            return Ok(false);
        }
        thread::sleep(ready_in);
        self.next_period += self.period_duration;
        Ok(true)
    }

    fn write(&mut self, frames: &[Frame]) -> Result<usize, AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(frames);
        Ok(frames.len())
    }

    fn recover(&mut self) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.closed = true;
        Ok(())
    }
}

impl CaptureHandle {
    /// Snapshot of everything written so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of frames written so far.
    pub fn len(&self) -> usize {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
