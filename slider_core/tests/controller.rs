use rstest::rstest;
use slider_core::{
    ActuationCommand, ControlCfg, MappingCfg, Policy, SliderController, SliderState,
    TriggerThresholds,
};

fn mapping() -> MappingCfg {
    MappingCfg {
        min_dist: 30.0,
        max_dist: 180.0,
    }
}

fn controller(start: u8, control: ControlCfg) -> SliderController {
    SliderController::new(SliderState::asserted(start), mapping(), control).unwrap()
}

fn chase(start: u8, step: u32) -> SliderController {
    controller(
        start,
        ControlCfg {
            step_size: step,
            policy: Policy::ProportionalChase,
            ..ControlCfg::default()
        },
    )
}

#[test]
fn closed_fingers_walk_volume_down_to_zero() {
    let mut c = chase(100, 2);
    let mut decreases = 0;
    for t in 0..60u64 {
        match c.step_distance(Some(30.0), t * 33) {
            ActuationCommand::Decrease => decreases += 1,
            ActuationCommand::None => {}
            ActuationCommand::Increase => panic!("unexpected increase at tick {t}"),
        }
    }
    assert_eq!(decreases, 50);
    assert_eq!(c.believed_volume(), 0);
    assert_eq!(c.step_distance(Some(30.0), 10_000), ActuationCommand::None);
}

#[test]
fn open_fingers_walk_volume_up_to_hundred() {
    let mut c = chase(0, 2);
    let increases = (0..60u64)
        .filter(|t| c.step_distance(Some(180.0), t * 33) == ActuationCommand::Increase)
        .count();
    assert_eq!(increases, 50);
    assert_eq!(c.believed_volume(), 100);
    assert_eq!(c.step_distance(Some(180.0), 10_000), ActuationCommand::None);
}

#[test]
fn missing_hand_freezes_volume() {
    let mut c = chase(40, 2);
    for t in 0..25u64 {
        assert_eq!(c.step_distance(None, t * 33), ActuationCommand::None);
    }
    assert_eq!(c.believed_volume(), 40);
    assert_eq!(c.state().last_action_ms(), None);
}

#[rstest]
#[case(20.0, ActuationCommand::Decrease)]
#[case(200.0, ActuationCommand::Increase)]
#[case(100.0, ActuationCommand::None)]
#[case(40.0, ActuationCommand::None)] // thresholds are strict
#[case(150.0, ActuationCommand::None)]
fn fixed_thresholds_ignore_believed_volume(
    #[case] distance: f32,
    #[case] expected: ActuationCommand,
    #[values(0, 50, 100)] start: u8,
) {
    let mut c = controller(
        start,
        ControlCfg {
            step_size: 2,
            policy: Policy::RateLimitedTrigger,
            cooldown_ms: 150,
            trigger: Some(TriggerThresholds {
                down_below: 40.0,
                up_above: 150.0,
            }),
            ..ControlCfg::default()
        },
    );
    assert_eq!(c.step_distance(Some(distance), 0), expected);
}

#[test]
fn fixed_thresholds_keep_volume_in_range() {
    let mut c = controller(
        0,
        ControlCfg {
            policy: Policy::RateLimitedTrigger,
            cooldown_ms: 0,
            trigger: Some(TriggerThresholds {
                down_below: 40.0,
                up_above: 150.0,
            }),
            ..ControlCfg::default()
        },
    );
    assert_eq!(c.step_distance(Some(10.0), 0), ActuationCommand::Decrease);
    assert_eq!(c.believed_volume(), 0);
}

#[rstest]
#[case(2, 0)]
#[case(2, 100)]
#[case(5, 35)]
#[case(3, 99)]
fn stepping_to_believed_volume_is_idempotent(#[case] step: u32, #[case] start: u8) {
    let mut c = chase(start, step);
    let before = *c.state();
    assert_eq!(c.step(Some(c.believed_volume()), 1_000), ActuationCommand::None);
    assert_eq!(c.believed_volume(), before.believed_volume());
    assert_eq!(c.state().last_action_ms(), before.last_action_ms());
}

#[rstest]
#[case(2, 0, 73, 74)]
#[case(5, 100, 12, 10)]
#[case(3, 0, 100, 99)]
#[case(7, 98, 0, 0)]
#[case(100, 0, 60, 100)]
#[case(5, 0, 99, 100)]
#[case(5, 0, 97, 95)]
#[case(3, 50, 100, 99)]
fn chase_converges_within_bound(
    #[case] step: u32,
    #[case] start: u8,
    #[case] target: u8,
    #[case] expected: u8,
) {
    let mut c = chase(start, step);
    let bound = 100u32.div_ceil(step);
    for t in 0..bound {
        c.step(Some(target), u64::from(t));
    }
    assert_eq!(c.believed_volume(), expected);
    for t in 0..10 {
        assert_eq!(c.step(Some(target), 1_000 + t), ActuationCommand::None);
    }
}

#[test]
fn cooldown_spaces_commands() {
    let mut c = controller(
        0,
        ControlCfg {
            step_size: 2,
            policy: Policy::RateLimitedTrigger,
            cooldown_ms: 150,
            ..ControlCfg::default()
        },
    );
    let mut emitted = Vec::new();
    for t in 0..200u64 {
        let now = t * 10;
        if !c.step(Some(100), now).is_none() {
            emitted.push(now);
        }
    }
    assert_eq!(emitted.first(), Some(&0));
    assert!(emitted.windows(2).all(|w| w[1] - w[0] >= 150));
    assert_eq!(emitted.len(), 14); // 0, 150, ..., 1950
}

#[test]
fn cooldown_boundary_is_inclusive() {
    let mut c = controller(
        0,
        ControlCfg {
            policy: Policy::RateLimitedTrigger,
            cooldown_ms: 150,
            ..ControlCfg::default()
        },
    );
    assert_eq!(c.step(Some(100), 1_000), ActuationCommand::Increase);
    assert_eq!(c.step(Some(100), 1_149), ActuationCommand::None);
    assert_eq!(c.step(Some(100), 1_150), ActuationCommand::Increase);
}

#[test]
fn chase_emits_every_tick_while_out_of_sync() {
    let mut c = controller(
        0,
        ControlCfg {
            policy: Policy::ProportionalChase,
            cooldown_ms: 10_000,
            ..ControlCfg::default()
        },
    );
    for _ in 0..5 {
        assert_eq!(c.step(Some(100), 0), ActuationCommand::Increase);
    }
    assert_eq!(c.believed_volume(), 10);
}

#[test]
fn last_command_tracks_the_latest_tick() {
    let mut c = chase(0, 2);
    c.step(Some(10), 0);
    assert_eq!(c.last_command(), ActuationCommand::Increase);
    c.step(None, 1);
    assert_eq!(c.last_command(), ActuationCommand::None);
}
