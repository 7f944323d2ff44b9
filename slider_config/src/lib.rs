#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and trace loading for the gesture volume slider.
//!
//! - `Config` and its sections are deserialized from TOML and checked by
//!   `Config::validate`, which names the offending key in its error.
//! - `load_trace_csv` reads a recorded tracker trace (one row per frame).
use serde::Deserialize;

/// Distance range that spans the virtual slider, in pixels.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct MappingCfg {
    /// Distance that maps to 0 %.
    pub min_dist: f32,
    /// Distance that maps to 100 %.
    pub max_dist: f32,
}

impl Default for MappingCfg {
    fn default() -> Self {
        Self {
            min_dist: 30.0,
            max_dist: 180.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Cooldown-gated pulses; optionally fixed distance thresholds.
    RateLimitedTrigger,
    /// One pulse per tick while out of sync, throttled only by the post-action delay.
    #[default]
    ProportionalChase,
}

/// Fixed distance thresholds for the pure trigger form.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TriggerCfg {
    /// Pinch: distances strictly below this press volume-down.
    pub down_below: f32,
    /// Spread: distances strictly above this press volume-up.
    pub up_above: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ControlCfg {
    /// Percentage points per pulse; also the quantization grid.
    pub step_size: i64,
    pub policy: Policy,
    /// Minimum spacing between pulses under `rate_limited_trigger`.
    pub cooldown_s: f64,
    /// Fixed pause after every pulse; throttles the host input layer.
    pub post_action_delay_ms: u64,
    /// When set (and policy is `rate_limited_trigger`), compare raw distance
    /// against these thresholds instead of chasing a mapped target.
    pub trigger: Option<TriggerCfg>,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self {
            step_size: 2,
            policy: Policy::ProportionalChase,
            cooldown_s: 0.15,
            post_action_delay_ms: 20,
            trigger: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationTarget {
    /// No pulses; believed volume starts at `initial_volume`.
    None,
    /// Saturate downwards; believed volume starts at 0.
    ForceMin,
    /// Saturate upwards; believed volume starts at the top of the grid.
    #[default]
    ForceMax,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct CalibrationCfg {
    pub target: CalibrationTarget,
    /// Extra pulses on top of ceil(100 / step_size).
    pub margin: u32,
    /// Pause between calibration pulses (ms).
    pub pulse_pause_ms: u64,
    /// Assumed host volume when `target = "none"`.
    pub initial_volume: i64,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self {
            target: CalibrationTarget::ForceMax,
            margin: 5,
            pulse_pause_ms: 10,
            initial_volume: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct RunnerCfg {
    /// Tick rate of the control loop (one tick per video frame).
    pub frame_rate_hz: u32,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self { frame_rate_hz: 30 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// In-process model of the host volume (no side effects).
    #[default]
    Simulated,
    /// Spawn `up_cmd` / `down_cmd` for every pulse.
    Command,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ActuatorCfg {
    pub kind: ActuatorKind,
    pub up_cmd: Vec<String>,
    pub down_cmd: Vec<String>,
    /// Granularity of the simulated host, in percentage points.
    pub host_step: u8,
    /// Simulated host ignores every Nth pulse (0 = never).
    pub drop_every: u32,
    /// Starting volume of the simulated host.
    pub initial_volume: u8,
}

impl Default for ActuatorCfg {
    fn default() -> Self {
        Self {
            kind: ActuatorKind::Simulated,
            up_cmd: Vec::new(),
            down_cmd: Vec::new(),
            host_step: 2,
            drop_every: 0,
            initial_volume: 50,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub mapping: MappingCfg,
    #[serde(default)]
    pub control: ControlCfg,
    #[serde(default)]
    pub calibration: CalibrationCfg,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub actuator: ActuatorCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Mapping
        let m = &self.mapping;
        if !m.min_dist.is_finite() || !m.max_dist.is_finite() {
            eyre::bail!("mapping.min_dist and mapping.max_dist must be finite");
        }
        if m.min_dist < 0.0 || m.max_dist < 0.0 {
            eyre::bail!("mapping distances must be >= 0");
        }
        if m.min_dist == m.max_dist {
            eyre::bail!("mapping.min_dist must differ from mapping.max_dist");
        }

        // Control
        let c = &self.control;
        if !(1..=100).contains(&c.step_size) {
            eyre::bail!("control.step_size must be in 1..=100");
        }
        if !c.cooldown_s.is_finite() || c.cooldown_s < 0.0 {
            eyre::bail!("control.cooldown_s must be >= 0");
        }
        if c.cooldown_s > 60.0 {
            eyre::bail!("control.cooldown_s is unreasonably large (>60s)");
        }
        if c.post_action_delay_ms > 10_000 {
            eyre::bail!("control.post_action_delay_ms is unreasonably large (>10s)");
        }
        if let Some(t) = c.trigger {
            if !t.down_below.is_finite() || !t.up_above.is_finite() {
                eyre::bail!("control.trigger thresholds must be finite");
            }
            if t.down_below >= t.up_above {
                eyre::bail!("control.trigger.down_below must be < control.trigger.up_above");
            }
            if c.policy != Policy::RateLimitedTrigger {
                eyre::bail!("control.trigger requires policy = \"rate_limited_trigger\"");
            }
        }

        // Calibration
        let cal = &self.calibration;
        if !(0..=100).contains(&cal.initial_volume) {
            eyre::bail!("calibration.initial_volume must be in 0..=100");
        }
        if cal.margin > 1000 {
            eyre::bail!("calibration.margin is unreasonably large (>1000)");
        }
        if cal.pulse_pause_ms > 10_000 {
            eyre::bail!("calibration.pulse_pause_ms is unreasonably large (>10s)");
        }

        // Runner
        if self.runner.frame_rate_hz == 0 {
            eyre::bail!("runner.frame_rate_hz must be > 0");
        }

        // Actuator
        let a = &self.actuator;
        match a.kind {
            ActuatorKind::Command => {
                if a.up_cmd.is_empty() || a.down_cmd.is_empty() {
                    eyre::bail!("actuator.up_cmd and actuator.down_cmd are required for kind = \"command\"");
                }
            }
            ActuatorKind::Simulated => {
                if a.host_step == 0 || a.host_step > 100 {
                    eyre::bail!("actuator.host_step must be in 1..=100");
                }
                if a.initial_volume > 100 {
                    eyre::bail!("actuator.initial_volume must be in 0..=100");
                }
            }
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly");
            }
        }

        Ok(())
    }
}

/// One recorded tracker frame.
///
/// Expected headers:
/// x1,y1,x2,y2
///
/// A row with any empty field means no hand was tracked in that frame.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub x1: Option<f32>,
    pub y1: Option<f32>,
    pub x2: Option<f32>,
    pub y2: Option<f32>,
}

impl TraceRow {
    /// Both points, or `None` when the frame carries no (complete) hand.
    pub fn points(&self) -> Option<[(f32, f32); 2]> {
        match (self.x1, self.y1, self.x2, self.y2) {
            (Some(x1), Some(y1), Some(x2), Some(y2)) => Some([(x1, y1), (x2, y2)]),
            _ => None,
        }
    }
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["x1", "y1", "x2", "y2"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "trace CSV must have headers 'x1,y1,x2,y2', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_takes_defaults() {
        let cfg = load_toml("[mapping]\nmin_dist = 20.0\nmax_dist = 180.0\n").expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.control.step_size, 2);
        assert_eq!(cfg.control.policy, Policy::ProportionalChase);
        assert_eq!(cfg.calibration.target, CalibrationTarget::ForceMax);
        assert_eq!(cfg.runner.frame_rate_hz, 30);
        assert_eq!(cfg.actuator.kind, ActuatorKind::Simulated);
    }

    #[test]
    fn partial_row_has_no_points() {
        let row = TraceRow {
            x1: Some(1.0),
            y1: None,
            x2: Some(2.0),
            y2: Some(3.0),
        };
        assert!(row.points().is_none());
    }
}
