//! The four-operator FM synthesis core.

use fg_ir::{wavetable, Note, VoiceConfig, ENV_UPDATE_RATE, OPERATOR_COUNT};
use log::warn;

use crate::envelope_state::EnvelopeState;
use crate::frame::Frame;
use crate::operator::{OperatorEdit, OperatorState};
use crate::pitch;

/// The FM voice: four operators, a main envelope, and the active note.
///
/// Owned and mutated by exactly one thread. `configure` must not race a
/// `render` call on another thread; the player serializes them by doing
/// both on the feed thread.
pub struct FmSynth {
    config: VoiceConfig,
    operators: [OperatorState; OPERATOR_COUNT],
    main_envelope: EnvelopeState,
    note: Note,
    base_frequency: f32,
    /// Main envelope value as of the last envelope update.
    main_level: f32,
    /// Samples between envelope updates.
    env_interval: u32,
    env_countdown: u32,
    /// One warning per configuration; a clamp means the voice mix is hot.
    clamp_warned: bool,
}

impl FmSynth {
    /// Build a synth from a voice preset.
    pub fn new(config: &VoiceConfig) -> Self {
        let note = 0;
        let base_frequency = pitch::note_to_frequency(note, pitch::REFERENCE_FREQUENCY);
        let operators = core::array::from_fn(|i| {
            OperatorState::new(
                config.operators[i].clone(),
                base_frequency,
                config.sample_rate,
            )
        });
        Self {
            config: config.clone(),
            operators,
            main_envelope: EnvelopeState::new(config.main_envelope.clone()),
            note,
            base_frequency,
            main_level: 0.0,
            env_interval: env_interval(config.sample_rate),
            env_countdown: 0,
            clamp_warned: false,
        }
    }

    /// Swap the whole voice, keeping note and phase continuity.
    pub fn configure(&mut self, config: &VoiceConfig) {
        for (op, op_config) in self.operators.iter_mut().zip(config.operators.iter()) {
            op.reconfigure(op_config.clone(), self.base_frequency, config.sample_rate);
        }
        self.main_envelope.reconfigure(config.main_envelope.clone());
        self.env_interval = env_interval(config.sample_rate);
        self.config = config.clone();
        self.clamp_warned = false;
    }

    /// Apply a staged partial edit to one operator.
    pub fn apply_edit(&mut self, index: usize, edit: &OperatorEdit) {
        if index >= OPERATOR_COUNT {
            return;
        }
        self.operators[index].apply_edit(edit, self.base_frequency, self.config.sample_rate);
    }

    /// The active voice configuration.
    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Set the note; all ratio-mode operators retune.
    pub fn set_note(&mut self, note: Note) {
        self.note = note;
        self.base_frequency = pitch::note_to_frequency(note, pitch::REFERENCE_FREQUENCY);
        for op in self.operators.iter_mut() {
            op.retune(self.base_frequency, self.config.sample_rate);
        }
    }

    /// Trigger all operator envelopes and the main envelope.
    pub fn note_on(&mut self) {
        for op in self.operators.iter_mut() {
            op.envelope.trigger();
        }
        self.main_envelope.trigger();
    }

    /// Gate all envelopes (begin release).
    pub fn note_off(&mut self) {
        for op in self.operators.iter_mut() {
            op.envelope.gate();
        }
        self.main_envelope.gate();
    }

    /// Whether any envelope is still producing sound.
    pub fn is_sounding(&self) -> bool {
        self.main_envelope.is_active()
    }

    /// Render PCM frames into `out`. Never allocates, never fails; a
    /// misconfigured voice degrades to silence, not an error.
    pub fn render(&mut self, out: &mut [Frame]) {
        for frame in out.iter_mut() {
            // Envelopes advance at the reduced update rate.
            if self.env_countdown == 0 {
                self.env_countdown = self.env_interval;
                self.main_level = self.main_envelope.advance_and_sample();
                for op in self.operators.iter_mut() {
                    op.level = op.envelope.advance_and_sample();
                }
            }
            self.env_countdown -= 1;

            // Operator outputs at the current phases.
            let mut samples = [0.0f32; OPERATOR_COUNT];
            let mut steps = [0.0f32; OPERATOR_COUNT];
            for (i, op) in self.operators.iter().enumerate() {
                samples[i] = wavetable::sample(op.config.wave, op.phase) * op.level;
                steps[i] = op.step;
            }

            // Phase modulation: each operator's phase advances by its own
            // step plus the weighted sum of its modulators, scaled by the
            // modulator's step so depth is pitch-independent.
            for op in self.operators.iter_mut() {
                let mut modulation = 0.0;
                for j in 0..OPERATOR_COUNT {
                    modulation += op.config.modulation[j] * samples[j] * steps[j];
                }
                op.phase += op.step + modulation;
                op.phase -= libm::floorf(op.phase);
            }

            // Mix, clamp, apply the main envelope, scale to i16.
            let mut mix = 0.0;
            for (i, op) in self.operators.iter().enumerate() {
                mix += samples[i] * op.config.mix_level;
            }
            if !(-1.0..=1.0).contains(&mix) {
                if !self.clamp_warned {
                    warn!("voice mix clamped at {mix:.3}; check operator mix levels");
                    self.clamp_warned = true;
                }
                mix = mix.clamp(-1.0, 1.0);
            }
            let value = mix * self.main_level * i16::MAX as f32;
            *frame = Frame::mono(value as i16);
        }
    }
}

/// Samples between envelope updates for a sample rate.
fn env_interval(sample_rate: u32) -> u32 {
    (sample_rate / ENV_UPDATE_RATE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_ir::{EnvelopeSpec, OperatorConfig, VoiceConfig};

    const SAMPLE_RATE: u32 = 44_100;

    fn render_secs(synth: &mut FmSynth, secs: f32) -> Vec<Frame> {
        let mut frames = vec![Frame::silence(); (SAMPLE_RATE as f32 * secs) as usize];
        synth.render(&mut frames);
        frames
    }

    fn peak(frames: &[Frame]) -> i16 {
        frames
            .iter()
            .map(|f| f.left.saturating_abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn silent_before_note_on() {
        let mut synth = FmSynth::new(&VoiceConfig::sine_lead(SAMPLE_RATE));
        synth.set_note(0);
        let frames = render_secs(&mut synth, 0.1);
        assert_eq!(peak(&frames), 0);
    }

    #[test]
    fn note_on_produces_output() {
        let mut synth = FmSynth::new(&VoiceConfig::sine_lead(SAMPLE_RATE));
        synth.set_note(0);
        synth.note_on();
        let frames = render_secs(&mut synth, 0.2);
        assert!(peak(&frames) > 1000, "peak {}", peak(&frames));
    }

    #[test]
    fn all_zero_mix_renders_silence() {
        let mut voice = VoiceConfig::sine_lead(SAMPLE_RATE);
        for op in voice.operators.iter_mut() {
            op.mix_level = 0.0;
        }
        let mut synth = FmSynth::new(&voice);
        synth.note_on();
        let frames = render_secs(&mut synth, 0.1);
        assert_eq!(peak(&frames), 0);
    }

    #[test]
    fn note_off_decays_to_silence() {
        let mut synth = FmSynth::new(&VoiceConfig::sine_lead(SAMPLE_RATE));
        synth.set_note(0);
        synth.note_on();
        render_secs(&mut synth, 0.2);
        synth.note_off();
        // Run well past the release; the tail must be silent.
        let frames = render_secs(&mut synth, 1.0);
        let tail = &frames[frames.len() - 1000..];
        assert_eq!(peak(tail), 0);
        assert!(!synth.is_sounding());
    }

    #[test]
    fn fixed_pitch_voice_ignores_note() {
        let mut voice = VoiceConfig::new(SAMPLE_RATE);
        voice.operators[0] = OperatorConfig {
            frequency_ratio: 0.0,
            fixed_note: Some(-12),
            ..OperatorConfig::carrier(1.0, EnvelopeSpec::pluck(0.5))
        };
        let mut low = FmSynth::new(&voice);
        low.set_note(-24);
        low.note_on();
        let mut high = FmSynth::new(&voice);
        high.set_note(24);
        high.note_on();
        assert_eq!(render_secs(&mut low, 0.1), render_secs(&mut high, 0.1));
    }

    #[test]
    fn modulation_changes_the_waveform() {
        let plain = VoiceConfig::sine_lead(SAMPLE_RATE);
        let mut modulated = plain.clone();
        modulated.operators[1] =
            OperatorConfig::modulator(2.0, EnvelopeSpec::adsr(0.01, 0.1, 0.8, 0.3));
        modulated.operators[0].modulation[1] = 3.0;

        let mut a = FmSynth::new(&plain);
        a.set_note(0);
        a.note_on();
        let mut b = FmSynth::new(&modulated);
        b.set_note(0);
        b.note_on();
        assert_ne!(render_secs(&mut a, 0.1), render_secs(&mut b, 0.1));
    }

    #[test]
    fn output_stays_in_range_with_hot_mix() {
        // Two full-mix carriers sum past 1.0; output must clamp, not wrap.
        let mut voice = VoiceConfig::sine_lead(SAMPLE_RATE);
        voice.operators[1] =
            OperatorConfig::carrier(1.01, EnvelopeSpec::adsr(0.01, 0.1, 0.8, 0.3));
        let mut synth = FmSynth::new(&voice);
        synth.set_note(0);
        synth.note_on();
        let frames = render_secs(&mut synth, 0.2);
        assert!(peak(&frames) > 0);
        // A wrapped overflow would flip a near-full-scale sample straight
        // to the opposite sign; a clamped one flat-tops instead. Envelope
        // updates may step the amplitude within one sample, so only the
        // sign pattern is checked, not sample-to-sample deltas.
        for w in frames.windows(2) {
            let (a, b) = (w[0].left as i32, w[1].left as i32);
            assert!(
                !(a.abs() > 20_000 && b.abs() > 20_000 && a.signum() != b.signum()),
                "sign flip {a} -> {b}"
            );
        }
        // The hot region must actually run into the clamp: with the mix
        // pinned at 1.0 the peak tracks the main envelope near full
        // scale.
        assert!(peak(&frames) > 31_000, "peak {}", peak(&frames));
    }

    #[test]
    fn apply_edit_changes_future_output() {
        let mut synth = FmSynth::new(&VoiceConfig::sine_lead(SAMPLE_RATE));
        synth.set_note(0);
        synth.note_on();
        let before = render_secs(&mut synth, 0.05);
        let edit = OperatorEdit {
            mix_level: Some(0.0),
            ..OperatorEdit::default()
        };
        synth.apply_edit(0, &edit);
        render_secs(&mut synth, 0.05); // flush the current envelope level
        let after = render_secs(&mut synth, 0.05);
        assert!(peak(&before) > 0);
        assert_eq!(peak(&after), 0);
    }

    #[test]
    fn out_of_range_edit_index_is_ignored() {
        let mut synth = FmSynth::new(&VoiceConfig::sine_lead(SAMPLE_RATE));
        synth.apply_edit(99, &OperatorEdit::default());
    }
}
