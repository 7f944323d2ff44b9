use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use slider_core::{
    ControlCfg, MappingCfg, Policy, SliderController, SliderState, TriggerThresholds, quantize,
};

// Synthetic pinch trace: slow open/close with additive noise, pixel distances
fn synth_distances(n: usize, noise_amp: f32, seed: u32) -> Vec<Option<f32>> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f32 / 90.0;
        let base = 105.0 + 75.0 * t.sin();
        let noise = (next_f32() * 2.0 - 1.0) * noise_amp;
        // roughly one frame in 20 without a hand
        if next_f32() < 0.05 {
            v.push(None);
        } else {
            v.push(Some(base + noise));
        }
    }
    v
}

fn controller(policy: Policy, trigger: Option<TriggerThresholds>) -> SliderController {
    let control = ControlCfg {
        step_size: 2,
        policy,
        cooldown_ms: 150,
        trigger,
        ..ControlCfg::default()
    };
    match SliderController::new(SliderState::asserted(50), MappingCfg::default(), control) {
        Ok(c) => c,
        Err(e) => panic!("bench config invalid: {e}"),
    }
}

pub fn bench_step_distance(c: &mut Criterion) {
    let trace = synth_distances(4_096, 4.0, 0x5eed);

    let mut group = c.benchmark_group("step_distance");
    for (name, policy, trigger) in [
        ("chase", Policy::ProportionalChase, None),
        ("rate_limited", Policy::RateLimitedTrigger, None),
        (
            "threshold",
            Policy::RateLimitedTrigger,
            Some(TriggerThresholds {
                down_below: 40.0,
                up_above: 150.0,
            }),
        ),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || controller(policy, trigger),
                |mut ctl| {
                    for (i, d) in trace.iter().enumerate() {
                        black_box(ctl.step_distance(*d, i as u64 * 33));
                    }
                    ctl.believed_volume()
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

pub fn bench_quantize(c: &mut Criterion) {
    c.bench_function("quantize_sweep", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for i in 0..1_000u32 {
                let p = i as f32 * 0.1;
                acc += u32::from(quantize(black_box(p), 3).unwrap_or(0));
            }
            acc
        });
    });
}

criterion_group!(benches, bench_step_distance, bench_quantize);
criterion_main!(benches);
