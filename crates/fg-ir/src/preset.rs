//! Named voice presets.
//!
//! The presets collaborators reference by name: a plain lead, a classic
//! two-operator FM bell, and a fixed-pitch percussion voice.

use crate::envelope::EnvelopeSpec;
use crate::voice::{OperatorConfig, VoiceConfig};
use crate::wavetable::WaveType;

impl VoiceConfig {
    /// A single sine carrier with a gentle ADSR.
    pub fn sine_lead(sample_rate: u32) -> Self {
        Self::new(sample_rate)
    }

    /// Two-operator bell: a 3.5-ratio modulator with a fast decay feeding
    /// a long-ringing carrier.
    pub fn bell(sample_rate: u32) -> Self {
        let mut voice = Self::new(sample_rate);
        voice.main_envelope = EnvelopeSpec::pluck(2.0);
        voice.operators[0] = OperatorConfig::carrier(1.0, EnvelopeSpec::pluck(2.0));
        voice.operators[1] = OperatorConfig::modulator(3.5, EnvelopeSpec::pluck(0.4));
        // Modulator 1 drives the carrier's phase.
        voice.operators[0].modulation[1] = 2.0;
        voice
    }

    /// Fixed-pitch percussive hit: the carrier ignores the played note and
    /// always sounds at its own low fixed note, with a square modulator
    /// roughing up the attack.
    pub fn wood_drum(sample_rate: u32) -> Self {
        let mut voice = Self::new(sample_rate);
        voice.main_envelope = EnvelopeSpec::pluck(0.3);
        voice.operators[0] = OperatorConfig {
            frequency_ratio: 0.0,
            fixed_note: Some(-24),
            ..OperatorConfig::carrier(1.0, EnvelopeSpec::pluck(0.3))
        };
        voice.operators[1] = OperatorConfig {
            wave: WaveType::Square,
            ..OperatorConfig::modulator(5.1, EnvelopeSpec::pluck(0.05))
        };
        voice.operators[0].modulation[1] = 1.2;
        voice
    }
}
