//! Stateless periodic waveform sampler.
//!
//! Each wave type is a 255-entry lookup table covering one period.
//! [`sample`] maps an angle in `[0, 1)` onto the table with linear
//! interpolation, wrapping from the last entry back to the first.

use crate::tables;

/// Entries per waveform table.
pub const TABLE_LEN: usize = 255;

/// Waveform selector for an operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaveType {
    #[default]
    Sine,
    Square,
    Saw,
}

impl WaveType {
    /// The lookup table for this wave type.
    pub fn table(self) -> &'static [f32; TABLE_LEN] {
        match self {
            WaveType::Sine => &tables::SINE,
            WaveType::Square => &tables::SQUARE,
            WaveType::Saw => &tables::SAW,
        }
    }
}

/// Sample one period of `wave` at `angle` in `[0, 1)`.
///
/// The angle maps to a real-valued index; the result interpolates between
/// the floor entry and the next entry, wrapping at the table end. Angles
/// outside `[0, 1)` must be reduced by the caller — the engine owns phase
/// wrapping.
pub fn sample(wave: WaveType, angle: f32) -> f32 {
    let table = wave.table();
    let pos = angle * TABLE_LEN as f32;
    // Rounding can push angle * 255 to exactly 255.0 for angles just
    // below 1.0, so the index is reduced once more here.
    let index = (pos as usize) % TABLE_LEN;
    let frac = pos - pos as usize as f32;
    let next = (index + 1) % TABLE_LEN;
    table[index] * (1.0 - frac) + table[next] * frac
}
