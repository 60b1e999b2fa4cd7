//! Operator and voice configuration.
//!
//! A `VoiceConfig` is an immutable preset: four operators, a main
//! envelope, and a sample rate. Collaborators hand these to the player;
//! the engine copies them into its own runtime state.

use crate::envelope::EnvelopeSpec;
use crate::wavetable::WaveType;

/// A pitch in signed half-steps from the reference frequency (A4).
pub type Note = i32;

/// Operators per voice.
pub const OPERATOR_COUNT: usize = 4;

/// Configuration for a single FM operator.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorConfig {
    /// Frequency as a ratio of the voice's base frequency. A value `<= 0`
    /// switches the operator to fixed-pitch mode: it ignores the played
    /// note and derives its frequency from `fixed_note` instead.
    pub frequency_ratio: f32,
    /// Pitch used in fixed-pitch mode.
    pub fixed_note: Option<Note>,
    /// Contribution to the audible mix, `0..=1`. Pure modulators use 0.
    pub mix_level: f32,
    /// Modulation input weight from each operator (including self,
    /// which gives feedback).
    pub modulation: [f32; OPERATOR_COUNT],
    /// Waveform for this operator.
    pub wave: WaveType,
    /// Amplitude envelope template.
    pub envelope: EnvelopeSpec,
}

impl OperatorConfig {
    /// An audible carrier at the given frequency ratio.
    pub fn carrier(frequency_ratio: f32, envelope: EnvelopeSpec) -> Self {
        Self {
            frequency_ratio,
            fixed_note: None,
            mix_level: 1.0,
            modulation: [0.0; OPERATOR_COUNT],
            wave: WaveType::Sine,
            envelope,
        }
    }

    /// An inaudible modulator at the given frequency ratio.
    pub fn modulator(frequency_ratio: f32, envelope: EnvelopeSpec) -> Self {
        Self {
            mix_level: 0.0,
            ..Self::carrier(frequency_ratio, envelope)
        }
    }

    /// A muted operator that contributes nothing.
    pub fn silent() -> Self {
        Self {
            mix_level: 0.0,
            ..Self::carrier(1.0, EnvelopeSpec::pluck(0.1))
        }
    }

    /// Whether this operator runs at a fixed pitch, ignoring the note.
    pub fn is_fixed_pitch(&self) -> bool {
        self.frequency_ratio <= 0.0
    }
}

/// A complete voice preset: four operators plus a main amplitude envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceConfig {
    /// Audio sample rate the voice is rendered at.
    pub sample_rate: u32,
    /// Envelope applied to the final mix.
    pub main_envelope: EnvelopeSpec,
    /// The four operators.
    pub operators: [OperatorConfig; OPERATOR_COUNT],
}

impl VoiceConfig {
    /// A neutral voice: one sine carrier, three muted operators.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            main_envelope: EnvelopeSpec::adsr(0.01, 0.1, 0.8, 0.3),
            operators: [
                OperatorConfig::carrier(1.0, EnvelopeSpec::adsr(0.01, 0.1, 0.8, 0.3)),
                OperatorConfig::silent(),
                OperatorConfig::silent(),
                OperatorConfig::silent(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_is_audible_modulator_is_not() {
        let env = EnvelopeSpec::pluck(0.5);
        assert_eq!(OperatorConfig::carrier(1.0, env.clone()).mix_level, 1.0);
        assert_eq!(OperatorConfig::modulator(2.0, env).mix_level, 0.0);
    }

    #[test]
    fn non_positive_ratio_means_fixed_pitch() {
        let mut op = OperatorConfig::silent();
        assert!(!op.is_fixed_pitch());
        op.frequency_ratio = 0.0;
        assert!(op.is_fixed_pitch());
        op.frequency_ratio = -1.0;
        assert!(op.is_fixed_pitch());
    }

    #[test]
    fn neutral_voice_has_one_carrier() {
        let voice = VoiceConfig::new(44_100);
        let audible = voice.operators.iter().filter(|op| op.mix_level > 0.0).count();
        assert_eq!(audible, 1);
    }
}
