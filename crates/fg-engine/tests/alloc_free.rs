//! Allocation-free render path tests.
//!
//! The feed thread calls `FmSynth::render` under a real-time deadline, so
//! the render path must never touch the heap. These tests render a few
//! seconds of each preset with allocations disabled.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use fg_engine::{Frame, FmSynth};
use fg_ir::VoiceConfig;

const SAMPLE_RATE: u32 = 44_100;

/// Render `periods` buffers of 512 frames with the heap locked out.
fn assert_render_alloc_free(voice: VoiceConfig, periods: usize) {
    let mut synth = FmSynth::new(&voice);
    synth.set_note(0);
    synth.note_on();

    let mut buffer = [Frame::silence(); 512];
    assert_no_alloc(|| {
        for _ in 0..periods {
            synth.render(&mut buffer);
        }
    });
}

#[test]
fn sine_lead_alloc_free() {
    assert_render_alloc_free(VoiceConfig::sine_lead(SAMPLE_RATE), 200);
}

#[test]
fn bell_alloc_free() {
    assert_render_alloc_free(VoiceConfig::bell(SAMPLE_RATE), 200);
}

#[test]
fn wood_drum_alloc_free() {
    assert_render_alloc_free(VoiceConfig::wood_drum(SAMPLE_RATE), 200);
}

#[test]
fn note_transitions_alloc_free() {
    let mut synth = FmSynth::new(&VoiceConfig::bell(SAMPLE_RATE));
    let mut buffer = [Frame::silence(); 512];
    assert_no_alloc(|| {
        for note in [-12, 0, 7, 12] {
            synth.set_note(note);
            synth.note_on();
            for _ in 0..20 {
                synth.render(&mut buffer);
            }
            synth.note_off();
            for _ in 0..20 {
                synth.render(&mut buffer);
            }
        }
    });
}
