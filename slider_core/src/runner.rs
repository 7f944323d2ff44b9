use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::builder::Slider;
use crate::config::RunnerCfg;
use crate::error::Result;
use crate::status::{ActuationCommand, TickStatus};

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown flag was raised.
    Shutdown,
    /// A finite signal source ran dry.
    SourceExhausted,
    /// `RunnerCfg::max_ticks` was reached.
    TickLimit,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Shutdown => "shutdown",
            StopReason::SourceExhausted => "source_exhausted",
            StopReason::TickLimit => "tick_limit",
        }
    }
}

/// Per-tick latency, measured on the slider's clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyStats {
    pub samples: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub total_ms: u64,
}

impl LatencyStats {
    fn record(&mut self, ms: u64) {
        if self.samples == 0 {
            self.min_ms = ms;
            self.max_ms = ms;
        } else {
            self.min_ms = self.min_ms.min(ms);
            self.max_ms = self.max_ms.max(ms);
        }
        self.samples += 1;
        self.total_ms = self.total_ms.saturating_add(ms);
    }

    /// Mean latency; 0.0 before the first sample.
    pub fn avg_ms(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                self.total_ms as f64 / self.samples as f64
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub increases: u64,
    pub decreases: u64,
    pub calibration_pulses: u32,
    pub final_volume: u8,
    pub stop: StopReason,
    pub latency: LatencyStats,
}

/// Drive `slider` at `cfg.frame_rate_hz` until shutdown, exhaustion or the
/// tick limit. Optionally calibrates first. Frame and actuator failures are
/// returned as errors; the slider is left in its last consistent state.
pub fn run(
    slider: &mut Slider,
    cfg: RunnerCfg,
    calibrate: bool,
    shutdown: &AtomicBool,
) -> Result<RunSummary> {
    let clock = slider.clock();
    let period_ms = crate::util::period_ms(cfg.frame_rate_hz);

    let calibration_pulses = if calibrate { slider.calibrate()? } else { 0 };

    tracing::info!(
        frame_rate_hz = cfg.frame_rate_hz,
        max_ticks = ?cfg.max_ticks,
        believed = slider.believed_volume(),
        "run start"
    );

    let mut summary = RunSummary {
        ticks: 0,
        increases: 0,
        decreases: 0,
        calibration_pulses,
        final_volume: slider.believed_volume(),
        stop: StopReason::Shutdown,
        latency: LatencyStats::default(),
    };

    loop {
        if shutdown.load(Ordering::Relaxed) {
            summary.stop = StopReason::Shutdown;
            break;
        }
        if cfg.max_ticks.is_some_and(|max| summary.ticks >= max) {
            summary.stop = StopReason::TickLimit;
            break;
        }

        let started = slider.now_ms();
        match slider.tick()? {
            TickStatus::SourceExhausted => {
                summary.stop = StopReason::SourceExhausted;
                break;
            }
            TickStatus::Ticked(cmd) => {
                summary.ticks += 1;
                match cmd {
                    ActuationCommand::Increase => summary.increases += 1,
                    ActuationCommand::Decrease => summary.decreases += 1,
                    ActuationCommand::None => {}
                }
            }
        }
        let elapsed = slider.now_ms().saturating_sub(started);
        summary.latency.record(elapsed);

        if elapsed < period_ms {
            clock.sleep(Duration::from_millis(period_ms - elapsed));
        }
    }

    summary.final_volume = slider.believed_volume();
    tracing::info!(
        ticks = summary.ticks,
        increases = summary.increases,
        decreases = summary.decreases,
        final_volume = summary.final_volume,
        stop = summary.stop.as_str(),
        "run stopped"
    );
    Ok(summary)
}
