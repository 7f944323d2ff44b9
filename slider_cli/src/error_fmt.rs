//! Human-readable error descriptions and structured JSON error formatting.

/// Prefix used when wrapping config load/validation failures.
pub const INVALID_CONFIG: &str = "invalid configuration";

/// Stable name of the error class, used in JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    use slider_core::error::{BuildError, SliderError};

    if let Some(se) = err.downcast_ref::<SliderError>() {
        return match se {
            SliderError::InvalidConfig(_) => "InvalidConfig",
            SliderError::FrameAcquisition(_) => "FrameAcquisition",
            SliderError::ActuatorFault(_) => "ActuatorFault",
            SliderError::EndOfStream => "EndOfStream",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() || is_config_error(err) {
        return "InvalidConfig";
    }
    "Error"
}

fn is_config_error(err: &eyre::Report) -> bool {
    err.chain().any(|e| e.to_string().starts_with(INVALID_CONFIG))
        || err.downcast_ref::<toml::de::Error>().is_some()
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use slider_core::error::{BuildError, SliderError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSource => {
                "What happened: No signal source was provided to the slider.\nLikely causes: The trace or sweep source was not wired into the builder.\nHow to fix: Pass a source via with_source(...).".to_string()
            }
            BuildError::MissingActuator => {
                "What happened: No actuator was provided to the slider.\nLikely causes: The [actuator] section could not be turned into an actuator.\nHow to fix: Pass an actuator via with_actuator(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SliderError>() {
        return match se {
            SliderError::FrameAcquisition(msg) => format!(
                "What happened: Could not acquire a frame ({msg}).\nLikely causes: Camera disconnected, trace file truncated, or tracker crashed.\nHow to fix: Check the video source and rerun; the volume was left where it was."
            ),
            SliderError::ActuatorFault(msg) => format!(
                "What happened: Sending a volume key failed ({msg}).\nLikely causes: The volume command is missing or exits non-zero.\nHow to fix: Run actuator.up_cmd / actuator.down_cmd by hand and fix them in the config."
            ),
            SliderError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: step_size, mapping range or trigger thresholds out of range.\nHow to fix: Edit the config file, then rerun."
            ),
            SliderError::EndOfStream => {
                "What happened: The signal source ran out of frames.\nLikely causes: The trace replay reached its end.\nHow to fix: Nothing to fix; use a longer trace or the sweep source.".to_string()
            }
        };
    }

    if let Some(te) = err.downcast_ref::<toml::de::Error>() {
        return format!(
            "What happened: The config file is not valid TOML for this program ({}).\nLikely causes: Typo in a key, wrong value type, or missing [mapping] section.\nHow to fix: Compare with etc/slider.toml and fix the reported key.",
            te.message()
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if is_config_error(err) {
        let cause = err
            .chain()
            .nth(1)
            .map(ToString::to_string)
            .unwrap_or_else(|| msg.clone());
        return format!(
            "What happened: Configuration is invalid ({cause}).\nLikely causes: Missing or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Trace CSV header special-case
    if lower.contains("trace csv must have headers") {
        return "Invalid headers in trace CSV. Expected 'x1,y1,x2,y2'.".to_string();
    }

    if lower.contains("read config") {
        return format!(
            "What happened: Could not read the config file.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE>. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 frame acquisition, 4 actuator fault, 5 invalid config, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match reason_name(err) {
        "FrameAcquisition" => 3,
        "ActuatorFault" => 4,
        "InvalidConfig" => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
