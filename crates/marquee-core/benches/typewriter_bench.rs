//! Benchmarks for per-frame typewriter and scroll-lock work.
//!
//! Run with: cargo bench -p marquee-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use marquee_core::event::{InputEvent, KeyCode, TouchPhase};
use marquee_core::{FlagTarget, ScrollLockController, SiteConfig, TypewriterEngine};
use std::hint::black_box;
use std::time::Duration;

// ============================================================================
// Typewriter tick
// ============================================================================

fn bench_typewriter_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("typewriter/tick");
    let config = SiteConfig::default();

    // 60 Hz, 120 Hz, 240 Hz frame spacing (the last one is mostly discarded).
    for frame_us in [16_667u64, 8_333, 4_167] {
        group.bench_with_input(
            BenchmarkId::new("one_cycle", format!("{frame_us}us")),
            &frame_us,
            |b, &frame_us| {
                b.iter(|| {
                    let mut engine = TypewriterEngine::from_config(&config).unwrap();
                    let mut now = Duration::ZERO;
                    let step = Duration::from_micros(frame_us);
                    for _ in 0..1_000 {
                        black_box(engine.tick(now).text.len());
                        now += step;
                    }
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Scroll lock filter
// ============================================================================

fn bench_scroll_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_lock/filter");
    let lock = ScrollLockController::new(FlagTarget::new());
    let _handle = lock.engage();
    let events = [
        InputEvent::wheel(3),
        InputEvent::key(KeyCode::PageDown),
        InputEvent::key(KeyCode::Char('a')),
        InputEvent::touch(TouchPhase::Move, 1),
        InputEvent::touch(TouchPhase::Move, 2),
    ];

    group.bench_function("mixed_events", |b| {
        b.iter(|| {
            for event in &events {
                black_box(lock.filter(black_box(event)));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_typewriter_tick, bench_scroll_filter);
criterion_main!(benches);
