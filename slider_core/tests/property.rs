use proptest::prelude::*;
use slider_core::{
    ActuationCommand, ControlCfg, DistanceMapper, MappingCfg, Policy, SliderController,
    SliderState, ceiling, quantize,
};

fn policy_strategy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        Just(Policy::ProportionalChase),
        Just(Policy::RateLimitedTrigger)
    ]
}

proptest! {
    #[test]
    fn quantize_lands_on_grid(p in -50.0f32..200.0, step in 1u32..=100) {
        let q = quantize(p, step).unwrap();
        prop_assert_eq!(u32::from(q) % step, 0);
        prop_assert!(q <= 100);
        prop_assert!(q <= ceiling(step as u8));
    }

    #[test]
    fn map_is_monotone_and_clamped(
        min in 0.0f32..200.0,
        span in 1.0f32..300.0,
        a in -1_000.0f32..1_000.0,
        b in -1_000.0f32..1_000.0,
    ) {
        let m = DistanceMapper::new(min, min + span).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (pl, ph) = (m.map(lo), m.map(hi));
        prop_assert!((0.0..=100.0).contains(&pl));
        prop_assert!((0.0..=100.0).contains(&ph));
        prop_assert!(pl <= ph);
    }

    #[test]
    fn believed_volume_stays_on_grid(
        step in 1u32..=25,
        start in 0u8..=100,
        policy in policy_strategy(),
        cooldown in 0u64..200,
        inputs in proptest::collection::vec(proptest::option::of(-50.0f32..300.0), 1..200),
    ) {
        let mut c = SliderController::new(
            SliderState::asserted(start),
            MappingCfg::default(),
            ControlCfg { step_size: step, policy, cooldown_ms: cooldown, ..ControlCfg::default() },
        ).unwrap();
        for (i, d) in inputs.into_iter().enumerate() {
            c.step_distance(d, i as u64 * 33);
            let v = c.believed_volume();
            prop_assert_eq!(u32::from(v) % step, 0);
            prop_assert!(v <= 100);
        }
    }

    #[test]
    fn rate_limited_commands_respect_cooldown(
        cooldown in 1u64..500,
        dt in 1u64..100,
        targets in proptest::collection::vec(0u8..=100, 1..300),
    ) {
        let mut c = SliderController::new(
            SliderState::asserted(50),
            MappingCfg::default(),
            ControlCfg {
                step_size: 2,
                policy: Policy::RateLimitedTrigger,
                cooldown_ms: cooldown,
                ..ControlCfg::default()
            },
        ).unwrap();
        let mut last: Option<u64> = None;
        for (i, t) in targets.into_iter().enumerate() {
            let now = i as u64 * dt;
            if c.step(Some(t), now) != ActuationCommand::None {
                if let Some(prev) = last {
                    prop_assert!(now - prev >= cooldown);
                }
                last = Some(now);
            }
        }
    }

    #[test]
    fn freeze_never_moves(start in 0u8..=100, step in 1u32..=100, ticks in 1usize..100) {
        let mut c = SliderController::new(
            SliderState::asserted(start),
            MappingCfg::default(),
            ControlCfg { step_size: step, ..ControlCfg::default() },
        ).unwrap();
        let before = c.believed_volume();
        for i in 0..ticks {
            prop_assert_eq!(c.step(None, i as u64), ActuationCommand::None);
        }
        prop_assert_eq!(c.believed_volume(), before);
    }
}
