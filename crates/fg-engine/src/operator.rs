//! Per-operator runtime state and staged edits.

use fg_ir::{Note, OperatorConfig, WaveType, OPERATOR_COUNT};

use crate::envelope_state::EnvelopeState;
use crate::pitch;

/// Runtime state for one FM operator.
#[derive(Clone, Debug)]
pub struct OperatorState {
    /// Active configuration (a copy; presets are never mutated).
    pub config: OperatorConfig,
    /// Amplitude envelope state.
    pub envelope: EnvelopeState,
    /// Oscillator phase in `[0, 1)`.
    pub phase: f32,
    /// Phase advance per sample at the current pitch.
    pub step: f32,
    /// Envelope value as of the last envelope update.
    pub level: f32,
}

impl OperatorState {
    /// Create an operator tuned for the given base frequency.
    pub fn new(config: OperatorConfig, base_frequency: f32, sample_rate: u32) -> Self {
        let envelope = EnvelopeState::new(config.envelope.clone());
        let mut op = Self {
            config,
            envelope,
            phase: 0.0,
            step: 0.0,
            level: 0.0,
        };
        op.retune(base_frequency, sample_rate);
        op
    }

    /// Recompute the phase step for a new base frequency. Fixed-pitch
    /// operators ignore the base and use their own note.
    pub fn retune(&mut self, base_frequency: f32, sample_rate: u32) {
        let frequency = if self.config.is_fixed_pitch() {
            let note = self.config.fixed_note.unwrap_or(0);
            pitch::note_to_frequency(note, pitch::REFERENCE_FREQUENCY)
        } else {
            base_frequency * self.config.frequency_ratio
        };
        self.step = pitch::frequency_to_step(frequency, sample_rate);
    }

    /// Swap in a new configuration, keeping phase continuity.
    pub fn reconfigure(&mut self, config: OperatorConfig, base_frequency: f32, sample_rate: u32) {
        self.envelope.reconfigure(config.envelope.clone());
        self.config = config;
        self.retune(base_frequency, sample_rate);
    }

    /// Apply a staged partial edit, then retune.
    pub fn apply_edit(&mut self, edit: &OperatorEdit, base_frequency: f32, sample_rate: u32) {
        if let Some(wave) = edit.wave {
            self.config.wave = wave;
        }
        if let Some(ratio) = edit.frequency_ratio {
            self.config.frequency_ratio = ratio;
        }
        if let Some(mix) = edit.mix_level {
            self.config.mix_level = mix;
        }
        for (slot, staged) in self.config.modulation.iter_mut().zip(edit.modulation) {
            if let Some(weight) = staged {
                *slot = weight;
            }
        }
        if let Some(fixed) = edit.fixed_note {
            self.config.fixed_note = fixed;
        }
        self.retune(base_frequency, sample_rate);
    }
}

/// A staged partial edit to one operator. Fields left `None` keep their
/// current value; the whole edit is applied as one batch by the feed
/// thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperatorEdit {
    pub wave: Option<WaveType>,
    pub frequency_ratio: Option<f32>,
    pub mix_level: Option<f32>,
    /// Per-source modulation weight overrides.
    pub modulation: [Option<f32>; OPERATOR_COUNT],
    /// `Some(None)` clears the fixed note.
    pub fixed_note: Option<Option<Note>>,
}

impl OperatorEdit {
    /// Whether the edit stages no changes.
    pub fn is_empty(&self) -> bool {
        self.wave.is_none()
            && self.frequency_ratio.is_none()
            && self.mix_level.is_none()
            && self.modulation.iter().all(Option::is_none)
            && self.fixed_note.is_none()
    }
}
