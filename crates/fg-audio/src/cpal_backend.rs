//! CPAL-based audio sink.
//!
//! Frames travel through a lock-free SPSC ring buffer into the CPAL
//! stream callback. Period readiness is signaled with a condition
//! variable notified from the callback after it drains frames — the feed
//! thread never spins.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use fg_engine::Frame;
use log::error;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::traits::{AudioError, AudioSink};

/// Shared readiness signal between the stream callback and the feed
/// thread.
struct Readiness {
    lock: Mutex<()>,
    drained: Condvar,
}

/// CPAL-based audio sink.
pub struct CpalSink {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    period: usize,
    readiness: Arc<Readiness>,
    faulted: Arc<AtomicBool>,
}

impl CpalSink {
    /// Open the default output device at the requested sample rate.
    pub fn open(sample_rate: u32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        // Validate that the device exists and can be configured.
        device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let config = StreamConfig {
            channels: 2,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        // About 100ms of buffer; one period is a quarter of it.
        let capacity = (sample_rate as usize / 10).max(256);
        let rb = HeapRb::<Frame>::new(capacity);
        let (producer, consumer) = rb.split();

        let readiness = Arc::new(Readiness {
            lock: Mutex::new(()),
            drained: Condvar::new(),
        });
        let faulted = Arc::new(AtomicBool::new(false));

        let mut sink = Self {
            device,
            config,
            stream: None,
            producer,
            period: capacity / 4,
            readiness,
            faulted,
        };
        sink.build_stream(consumer)?;
        Ok(sink)
    }

    /// Build the output stream around a ring buffer consumer.
    fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let channels = self.config.channels as usize;
        let readiness = self.readiness.clone();
        let faulted = self.faulted.clone();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut drained = false;
                    for chunk in data.chunks_mut(channels) {
                        if let Some(frame) = consumer.try_pop() {
                            drained = true;
                            let left = frame.left as f32 / 32768.0;
                            let right = frame.right as f32 / 32768.0;
                            for (i, sample) in chunk.iter_mut().enumerate() {
                                *sample = match i {
                                    0 => left,
                                    1 => right,
                                    _ => 0.0,
                                };
                            }
                        } else {
                            // Ring buffer underrun: emit silence.
                            for sample in chunk.iter_mut() {
                                *sample = 0.0;
                            }
                        }
                    }
                    if drained {
                        let _guard = readiness.lock.lock().unwrap_or_else(|e| e.into_inner());
                        readiness.drained.notify_one();
                    }
                },
                move |err| {
                    error!("audio stream error: {}", err);
                    faulted.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }
}

impl AudioSink for CpalSink {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn period_frames(&self) -> usize {
        self.period
    }

    fn wait_period(&mut self, timeout: Duration) -> Result<bool, AudioError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.faulted.load(Ordering::Relaxed) {
                return Err(AudioError::Playback("stream fault".into()));
            }
            if self.producer.vacant_len() >= self.period {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            let guard = self
                .readiness
                .lock
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            // Re-check under the lock: the callback may have drained
            // between the check above and acquiring the lock.
            if self.producer.vacant_len() >= self.period {
                return Ok(true);
            }
            let (_guard, _timed_out) = self
                .readiness
                .drained
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    fn write(&mut self, frames: &[Frame]) -> Result<usize, AudioError> {
        if self.faulted.load(Ordering::Relaxed) {
            return Err(AudioError::Playback("stream fault".into()));
        }
        if self.stream.is_none() {
            return Err(AudioError::Closed);
        }
        Ok(self.producer.push_slice(frames))
    }

    fn recover(&mut self) -> Result<(), AudioError> {
        // In-place recovery: restart the existing stream and clear the
        // fault flag. The ring buffer keeps whatever was queued.
        let stream = self.stream.as_ref().ok_or(AudioError::Closed)?;
        stream
            .pause()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        self.faulted.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn start(&mut self) -> Result<(), AudioError> {
        let stream = self.stream.as_ref().ok_or(AudioError::Closed)?;
        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(ref stream) = self.stream {
            stream
                .pause()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        self.stream = None;
        Ok(())
    }
}
