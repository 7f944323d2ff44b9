#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are fine; panics are not.
    let Ok(cfg) = slider_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A validated config must convert into runtime structs the controller accepts.
    let control: slider_core::ControlCfg = (&cfg.control).into();
    let mapping: slider_core::MappingCfg = (&cfg.mapping).into();
    let calibration: slider_core::CalibrationCfg = (&cfg.calibration).into();
    let cal = slider_core::Calibrator::new(calibration, control.step_size)
        .expect("validated calibration must build");
    slider_core::SliderController::new(
        slider_core::SliderState::asserted(cal.asserted_volume()),
        mapping,
        control,
    )
    .expect("validated control must build");
});
