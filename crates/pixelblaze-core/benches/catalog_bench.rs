//! Criterion benchmarks for program-list decoding.
//!
//! Measures frame classification and catalog assembly for listings of
//! realistic size (a Pixelblaze typically holds a few dozen to a few hundred
//! programs).
//!
//! Run with:
//! ```bash
//! cargo bench --package pixelblaze-core --bench catalog_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pixelblaze_core::protocol::catalog::{AssemblyState, CatalogAssembler};
use pixelblaze_core::protocol::frame::{decode_frame, DecodedFrame, RawFrame};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Splits `count` patterns into frames of at most `per_frame` lines.
fn make_frames(count: usize, per_frame: usize) -> Vec<RawFrame> {
    let lines: Vec<String> = (0..count)
        .map(|i| format!("{:017x}\tPattern number {}", i * 7919, count - i))
        .collect();

    let chunks: Vec<&[String]> = lines.chunks(per_frame).collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut bytes = vec![0x07, if i == last { 0x04 } else { 0x00 }];
            bytes.extend_from_slice(chunk.join("\n").as_bytes());
            RawFrame::Binary(bytes)
        })
        .collect()
}

fn assemble(frames: &[RawFrame]) -> usize {
    let mut assembler = CatalogAssembler::new();
    for frame in frames {
        if let Ok(DecodedFrame::ProgramList(fragment)) = decode_frame(frame) {
            if let Ok(AssemblyState::Complete) = assembler.push(fragment) {
                break;
            }
        }
    }
    assembler.finish().map(|c| c.len()).unwrap_or(0)
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_decode_frame(c: &mut Criterion) {
    let frames = make_frames(50, 50);
    let frame = &frames[0];
    c.bench_function("decode_frame/50_lines", |b| {
        b.iter(|| decode_frame(black_box(frame)).is_ok())
    });
}

fn bench_assemble_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_catalog");
    for count in [20usize, 100, 500] {
        let frames = make_frames(count, 25);
        group.bench_with_input(BenchmarkId::from_parameter(count), &frames, |b, frames| {
            b.iter(|| assemble(black_box(frames)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode_frame, bench_assemble_catalog);
criterion_main!(benches);
