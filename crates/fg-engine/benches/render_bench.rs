//! Render hot path benchmark.

use criterion::{criterion_group, criterion_main, Criterion};
use fg_engine::{Frame, FmSynth};
use fg_ir::VoiceConfig;

fn render_benchmark(c: &mut Criterion) {
    let mut synth = FmSynth::new(&VoiceConfig::bell(44_100));
    synth.set_note(0);
    synth.note_on();
    let mut buffer = [Frame::silence(); 512];

    c.bench_function("render_512_frames", |b| {
        b.iter(|| synth.render(&mut buffer));
    });
}

criterion_group!(benches, render_benchmark);
criterion_main!(benches);
