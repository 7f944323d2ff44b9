//! Config mapping, hardware assembly, and run execution.

use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::time::{SystemTime, UNIX_EPOCH};

use eyre::WrapErr;
use slider_config::{ActuatorKind, Config, TraceRow};
use slider_core::error::Result as CoreResult;
use slider_core::{RunSummary, Slider, Snapshot};
use slider_hardware::{
    CommandActuator, FaultySource, HostProbe, SimulatedHost, SweepSource, TraceSource,
};
use slider_traits::{Actuator, BoxError, Point, SignalSource, TrackedPoints};

/// Test hook: make the source fail at this frame index.
const GRAB_FAIL_ENV: &str = "SLIDER_TEST_GRAB_FAIL_AT";

/// Width of the text volume bar, in cells.
const BAR_WIDTH: usize = 20;

/// `[#####-----]  42 %`
pub fn render_bar(volume: u8, width: usize) -> String {
    let v = usize::from(volume.min(100));
    let filled = (v * width + 50) / 100;
    format!(
        "[{}{}] {:>3} %",
        "#".repeat(filled),
        "-".repeat(width - filled),
        v
    )
}

/// Redraws the volume bar on stderr once per tick.
#[derive(Debug)]
pub struct BarRenderer {
    width: usize,
}

impl BarRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl slider_core::Renderer for BarRenderer {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), BoxError> {
        let hand = if snapshot.points.is_some() { ' ' } else { '?' };
        let mut err = std::io::stderr().lock();
        write!(
            err,
            "\r{} {hand}",
            render_bar(snapshot.believed_volume, self.width)
        )?;
        err.flush()?;
        Ok(())
    }
}

/// Actuator selected by `[actuator]`, plus a probe on the simulated host.
pub fn make_actuator(cfg: &slider_config::ActuatorCfg) -> CoreResult<(Box<dyn Actuator>, Option<HostProbe>)> {
    match cfg.kind {
        ActuatorKind::Simulated => {
            let host = SimulatedHost::new(cfg.initial_volume, cfg.host_step)
                .with_drop_every(cfg.drop_every);
            let probe = host.probe();
            tracing::info!(
                initial_volume = cfg.initial_volume,
                host_step = cfg.host_step,
                drop_every = cfg.drop_every,
                "simulated host"
            );
            Ok((Box::new(host), Some(probe)))
        }
        ActuatorKind::Command => {
            let act = CommandActuator::new(cfg.up_cmd.clone(), cfg.down_cmd.clone())
                .wrap_err("build command actuator")?;
            tracing::info!(up = ?cfg.up_cmd, down = ?cfg.down_cmd, "command actuator");
            Ok((Box::new(act), None))
        }
    }
}

fn row_to_points(row: &TraceRow) -> Option<TrackedPoints> {
    row.points()
        .map(|[(x1, y1), (x2, y2)]| TrackedPoints::new(Point::new(x1, y1), Point::new(x2, y2)))
}

/// Trace replay when a trace was given, an endless sweep otherwise.
pub fn make_source(cfg: &Config, trace: Option<Vec<TraceRow>>) -> CoreResult<Box<dyn SignalSource>> {
    let base: Box<dyn SignalSource> = match trace {
        Some(rows) => {
            tracing::info!(frames = rows.len(), "trace replay source");
            Box::new(TraceSource::new(rows.iter().map(row_to_points)))
        }
        None => {
            // one full open/close cycle every four seconds
            let period = cfg.runner.frame_rate_hz.saturating_mul(4);
            tracing::info!(period_frames = period, "sweep source");
            Box::new(SweepSource::new(
                cfg.mapping.min_dist,
                cfg.mapping.max_dist,
                period,
            ))
        }
    };

    match std::env::var(GRAB_FAIL_ENV) {
        Ok(v) => {
            let at: u64 = v
                .trim()
                .parse()
                .wrap_err_with(|| format!("{GRAB_FAIL_ENV} must be an integer, got {v:?}"))?;
            Ok(Box::new(FaultySource::new(base, at)))
        }
        Err(_) => Ok(base),
    }
}

/// Assemble a `Slider` from config and hardware.
pub fn build(
    cfg: &Config,
    source: Box<dyn SignalSource>,
    actuator: Box<dyn Actuator>,
    bar: bool,
) -> CoreResult<Slider> {
    let mut builder = Slider::builder()
        .with_source(source)
        .with_actuator(actuator)
        .with_mapping((&cfg.mapping).into())
        .with_control((&cfg.control).into())
        .with_calibration((&cfg.calibration).into());
    if bar {
        builder = builder.with_renderer(BarRenderer::new(BAR_WIDTH));
    }
    builder.build()
}

pub struct RunOpts {
    pub max_ticks: Option<u64>,
    pub calibrate: bool,
    pub bar: bool,
    pub stats: bool,
    pub json: bool,
}

pub fn run_slider(
    cfg: &Config,
    mut slider: Slider,
    probe: Option<HostProbe>,
    opts: &RunOpts,
    shutdown: &AtomicBool,
) -> CoreResult<RunSummary> {
    let mut runner: slider_core::RunnerCfg = (&cfg.runner).into();
    runner.max_ticks = opts.max_ticks;

    let started = std::time::Instant::now();
    let result = slider_core::run(&mut slider, runner, opts.calibrate, shutdown);
    if opts.bar {
        // finish the bar line
        eprintln!();
    }
    let summary = result?;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if opts.json {
        println!("{}", summary_json(&summary, probe.as_ref(), duration_ms));
    } else {
        println!(
            "stopped ({}): volume {} % after {} ticks",
            summary.stop.as_str(),
            summary.final_volume,
            summary.ticks
        );
        if let Some(p) = &probe {
            println!(
                "simulated host: volume {} %, {} pulses, {} dropped",
                p.volume(),
                p.pulses(),
                p.dropped()
            );
        }
    }
    if opts.stats {
        print_stats(&summary, cfg.runner.frame_rate_hz);
    }
    Ok(summary)
}

/// Calibrate only; returns the number of pulses sent.
pub fn calibrate_only(mut slider: Slider, probe: Option<HostProbe>, json: bool) -> CoreResult<u32> {
    let pulses = slider.calibrate()?;
    let volume = slider.believed_volume();
    if json {
        let v = serde_json::json!({
            "calibration_pulses": pulses,
            "believed_volume": volume,
            "host_volume": probe.as_ref().map(HostProbe::volume),
        });
        println!("{v}");
    } else {
        println!("calibrated: {pulses} pulses, believed volume {volume} %");
    }
    Ok(pulses)
}

fn summary_json(s: &RunSummary, probe: Option<&HostProbe>, duration_ms: u64) -> serde_json::Value {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    serde_json::json!({
        "timestamp": ts,
        "stop": s.stop.as_str(),
        "ticks": s.ticks,
        "increases": s.increases,
        "decreases": s.decreases,
        "calibration_pulses": s.calibration_pulses,
        "final_volume": s.final_volume,
        "host_volume": probe.map(HostProbe::volume),
        "duration_ms": duration_ms,
        "latency_ms": {
            "min": s.latency.min_ms,
            "avg": s.latency.avg_ms(),
            "max": s.latency.max_ms,
        },
    })
}

/// Print tick and latency stats to stderr.
fn print_stats(s: &RunSummary, frame_rate_hz: u32) {
    let period = slider_core::util::period_ms(frame_rate_hz);
    eprintln!("\n--- Slider Stats ---");
    eprintln!("Ticks: {}", s.ticks);
    eprintln!("Period (ms): {period}");
    eprintln!("Pulses up/down: {} / {}", s.increases, s.decreases);
    eprintln!("Calibration pulses: {}", s.calibration_pulses);
    eprintln!(
        "Tick latency min/avg/max (ms): {} / {:.1} / {}",
        s.latency.min_ms,
        s.latency.avg_ms(),
        s.latency.max_ms
    );
    eprintln!("--------------------\n");
}
