//! Piecewise-linear envelope shapes.
//!
//! `EnvelopeSpec` is the template an operator or voice is configured with:
//! up to six breakpoints over a normalized `[0, 1]` position axis, a gate
//! point where playback holds awaiting release, and an optional repeat
//! point that loops instead of holding. The runtime trigger/gate state
//! machine lives in `fg-engine`.

use arrayvec::ArrayVec;

/// Maximum breakpoints per envelope.
pub const MAX_BREAKPOINTS: usize = 6;

/// Envelope updates per second. Envelopes advance at this reduced rate
/// regardless of the audio sample rate.
pub const ENV_UPDATE_RATE: u32 = 64;

/// A breakpoint on the normalized envelope curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    /// Position in `[0, 1]`. Non-decreasing across the point list.
    pub x: f32,
    /// Envelope value at this position.
    pub y: f32,
}

impl Breakpoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A piecewise-linear envelope template.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvelopeSpec {
    /// Breakpoints with non-decreasing `x` spanning `[0, 1]`.
    pub points: ArrayVec<Breakpoint, MAX_BREAKPOINTS>,
    /// Nominal duration of the whole curve in seconds.
    pub duration_secs: f32,
    /// Position where playback pauses (sustain) until gated.
    pub gate_point: f32,
    /// Loop target: when the gate point is reached ungated, jump here
    /// instead of holding.
    pub repeat_point: Option<f32>,
}

impl EnvelopeSpec {
    /// Build an envelope from `(x, y)` pairs.
    pub fn from_points(pts: &[(f32, f32)], duration_secs: f32, gate_point: f32) -> Self {
        let mut points = ArrayVec::new();
        for &(x, y) in pts {
            points.push(Breakpoint::new(x, y));
        }
        debug_assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
        Self {
            points,
            duration_secs,
            gate_point,
            repeat_point: None,
        }
    }

    /// Classic attack/decay/sustain/release shape. Times are in seconds;
    /// `sustain` is the level held at the gate point.
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let duration = (attack + decay + release).max(1e-3);
        let x_peak = attack / duration;
        let x_sustain = (attack + decay) / duration;
        Self::from_points(
            &[
                (0.0, 0.0),
                (x_peak, 1.0),
                (x_sustain, sustain),
                (1.0, 0.0),
            ],
            duration,
            x_sustain,
        )
    }

    /// Percussive shape: fast attack, then a single decay to silence.
    /// The gate point sits at the end, so the curve runs through without
    /// waiting for a release.
    pub fn pluck(duration_secs: f32) -> Self {
        Self::from_points(&[(0.0, 0.0), (0.03, 1.0), (1.0, 0.0)], duration_secs, 1.0)
    }

    /// Make this envelope loop back to `x` when the gate point is reached
    /// ungated, instead of holding.
    pub fn with_repeat(mut self, x: f32) -> Self {
        self.repeat_point = Some(x);
        self
    }

    /// Sample the curve at position `x`, clamping to the endpoints.
    pub fn value_at(&self, x: f32) -> f32 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if x <= first.x {
            return first.y;
        }
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            if x <= b.x {
                let span = b.x - a.x;
                if span <= 0.0 {
                    return b.y;
                }
                let t = (x - a.x) / span;
                return a.y + (b.y - a.y) * t;
            }
        }
        self.points[self.points.len() - 1].y
    }

    /// Position advance per envelope update, derived from the nominal
    /// duration and the reduced update rate.
    pub fn step_per_update(&self) -> f32 {
        let updates = self.duration_secs * ENV_UPDATE_RATE as f32;
        if updates <= 0.0 {
            1.0
        } else {
            1.0 / updates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_at_endpoints() {
        let env = EnvelopeSpec::from_points(&[(0.0, 0.2), (1.0, 0.8)], 1.0, 1.0);
        assert_eq!(env.value_at(0.0), 0.2);
        assert_eq!(env.value_at(1.0), 0.8);
    }

    #[test]
    fn value_at_interpolates_linearly() {
        let env = EnvelopeSpec::from_points(&[(0.0, 0.0), (1.0, 1.0)], 1.0, 1.0);
        assert!((env.value_at(0.25) - 0.25).abs() < 1e-6);
        assert!((env.value_at(0.75) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn value_at_clamps_outside_range() {
        let env = EnvelopeSpec::from_points(&[(0.0, 0.5), (1.0, 0.9)], 1.0, 1.0);
        assert_eq!(env.value_at(-1.0), 0.5);
        assert_eq!(env.value_at(2.0), 0.9);
    }

    #[test]
    fn value_at_empty_is_zero() {
        let env = EnvelopeSpec::from_points(&[], 1.0, 1.0);
        assert_eq!(env.value_at(0.5), 0.0);
    }

    #[test]
    fn coincident_points_step() {
        // Two points at the same x: sampling there takes the later value.
        let env = EnvelopeSpec::from_points(&[(0.0, 0.0), (0.5, 1.0), (0.5, 0.2), (1.0, 0.0)], 1.0, 0.5);
        assert_eq!(env.value_at(0.5), 1.0); // first segment ends at 1.0
        assert!(env.value_at(0.6) < 0.2); // past the step, releasing from 0.2
    }

    #[test]
    fn adsr_shape() {
        let env = EnvelopeSpec::adsr(0.1, 0.1, 0.6, 0.2);
        assert_eq!(env.value_at(0.0), 0.0);
        // Peak at end of attack.
        assert!((env.value_at(0.25) - 1.0).abs() < 1e-6);
        // Sustain level at the gate point.
        assert!((env.value_at(env.gate_point) - 0.6).abs() < 1e-6);
        // Releases to zero.
        assert!(env.value_at(1.0).abs() < 1e-6);
    }

    #[test]
    fn step_per_update_matches_duration() {
        let env = EnvelopeSpec::adsr(0.5, 0.5, 0.5, 1.0);
        // 2 seconds at 64 updates/sec = 128 updates to traverse.
        assert!((env.step_per_update() - 1.0 / 128.0).abs() < 1e-7);
    }

    #[test]
    fn step_per_update_degenerate_duration() {
        let mut env = EnvelopeSpec::pluck(0.5);
        env.duration_secs = 0.0;
        assert_eq!(env.step_per_update(), 1.0);
    }

    #[test]
    fn with_repeat_sets_loop_target() {
        let env = EnvelopeSpec::adsr(0.1, 0.1, 0.7, 0.1).with_repeat(0.2);
        assert_eq!(env.repeat_point, Some(0.2));
    }
}
