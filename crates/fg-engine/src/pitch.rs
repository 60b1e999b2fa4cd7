//! Note-to-frequency conversion.
//!
//! Notes are signed half-steps from a reference frequency, mapped with
//! equal temperament: each +12 doubles the frequency.

use fg_ir::Note;

/// The frequency of note 0 (A4).
pub const REFERENCE_FREQUENCY: f32 = 440.0;

/// Convert a note in half-steps to a frequency in Hz.
pub fn note_to_frequency(note: Note, reference: f32) -> f32 {
    reference * libm::exp2f(note as f32 / 12.0)
}

/// Phase advance per sample for a frequency at the given sample rate.
/// Phase is normalized to one period per unit.
pub fn frequency_to_step(frequency: f32, sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 0.0;
    }
    frequency / sample_rate as f32
}
