#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use slider_core::{ControlCfg, MappingCfg, Policy, SliderController, SliderState};

#[derive(Debug, Arbitrary)]
struct Input {
    step: u8,
    start: u8,
    rate_limited: bool,
    cooldown_ms: u16,
    min_dist: f32,
    max_dist: f32,
    ticks: Vec<(Option<f32>, u16)>,
}

fuzz_target!(|input: Input| {
    let control = ControlCfg {
        step_size: u32::from(input.step),
        policy: if input.rate_limited {
            Policy::RateLimitedTrigger
        } else {
            Policy::ProportionalChase
        },
        cooldown_ms: u64::from(input.cooldown_ms),
        ..ControlCfg::default()
    };
    let mapping = MappingCfg {
        min_dist: input.min_dist,
        max_dist: input.max_dist,
    };
    let Ok(mut c) = SliderController::new(SliderState::asserted(input.start), mapping, control)
    else {
        return;
    };
    let step = c.step_size();
    let mut now = 0u64;
    for (d, dt) in input.ticks {
        now += u64::from(dt);
        c.step_distance(d, now);
        let v = c.believed_volume();
        assert!(v <= c.ceiling());
        assert_eq!(v % step, 0);
    }
});
