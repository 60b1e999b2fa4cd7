//! Runtime evaluator for `EnvelopeSpec`.
//!
//! A small trigger/gate state machine over the piecewise-linear template:
//! `Idle -> Triggered -> TriggeredAndGated -> Idle`. Position advances at
//! the reduced envelope update rate, not per audio sample.

use fg_ir::EnvelopeSpec;

/// Trigger/gate phase of a running envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopePhase {
    /// Not sounding; samples as zero.
    #[default]
    Idle,
    /// Triggered and running toward the gate point.
    Triggered,
    /// Gate received; running out the release.
    TriggeredAndGated,
}

/// Runtime state for one envelope.
#[derive(Clone, Debug)]
pub struct EnvelopeState {
    spec: EnvelopeSpec,
    /// Position advance per update, derived from the spec duration.
    step: f32,
    /// Current position in `[0, 1]`.
    position: f32,
    /// Lower clamp installed by a retrigger that interrupted an active
    /// envelope; cleared once the raw curve value catches up.
    floor: Option<f32>,
    phase: EnvelopePhase,
    /// Last sampled value, captured as the floor on retrigger.
    value: f32,
}

impl EnvelopeState {
    /// Create an idle envelope from a template.
    pub fn new(spec: EnvelopeSpec) -> Self {
        let step = spec.step_per_update();
        Self {
            spec,
            step,
            position: 0.0,
            floor: None,
            phase: EnvelopePhase::Idle,
            value: 0.0,
        }
    }

    /// Swap in a new template without interrupting a running envelope.
    pub fn reconfigure(&mut self, spec: EnvelopeSpec) {
        self.step = spec.step_per_update();
        self.spec = spec;
        self.position = self.position.clamp(0.0, 1.0);
    }

    /// Current phase.
    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    /// Whether the envelope is producing a value.
    pub fn is_active(&self) -> bool {
        self.phase != EnvelopePhase::Idle
    }

    /// Start (or restart) the envelope.
    ///
    /// Retriggering an active envelope records the instantaneous value as
    /// a floor so the new attack cannot jump downward audibly.
    pub fn trigger(&mut self) {
        if self.is_active() {
            self.floor = Some(self.value);
        }
        self.position = 0.0;
        self.phase = EnvelopePhase::Triggered;
    }

    /// Signal release. Position is untouched; the envelope stops holding
    /// at the gate point and runs out to the end.
    pub fn gate(&mut self) {
        if self.phase == EnvelopePhase::Triggered {
            self.phase = EnvelopePhase::TriggeredAndGated;
        }
    }

    /// Sample the envelope at the current position, then advance one
    /// update. Returns 0 when idle.
    pub fn advance_and_sample(&mut self) -> f32 {
        if !self.is_active() {
            return 0.0;
        }

        let raw = self.spec.value_at(self.position);
        let sampled = match self.floor {
            Some(floor) if raw < floor => floor,
            Some(_) => {
                self.floor = None;
                raw
            }
            None => raw,
        };
        self.value = sampled;

        self.position += self.step;
        if self.phase == EnvelopePhase::Triggered && self.position >= self.spec.gate_point {
            // Sustain: loop to the repeat point, or hold at the gate.
            self.position = match self.spec.repeat_point {
                Some(repeat) => repeat,
                None => self.spec.gate_point,
            };
        }
        if self.position > 1.0 {
            self.phase = EnvelopePhase::Idle;
            self.position = 0.0;
        }

        sampled
    }
}
