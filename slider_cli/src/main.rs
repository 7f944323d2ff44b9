mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{INVALID_CONFIG, exit_code_for_error, format_error_json, humanize};
use crate::run::RunOpts;

fn main() {
    if let Err(err) = real_main() {
        tracing::error!(error = %err, "slider failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let cfg = load_config(&cli.config)?;
    init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    let trace = cli
        .trace
        .as_deref()
        .map(slider_config::load_trace_csv)
        .transpose()?;

    let (actuator, probe) = run::make_actuator(&cfg.actuator)?;
    let source = run::make_source(&cfg, trace)?;

    match cli.cmd {
        Commands::SelfCheck => {
            let slider = run::build(&cfg, source, actuator, false)?;
            tracing::info!(
                believed = slider.believed_volume(),
                step = slider.controller().step_size(),
                "self-check passed"
            );
            println!("ok");
        }
        Commands::Calibrate => {
            let slider = run::build(&cfg, source, actuator, false)?;
            run::calibrate_only(slider, probe, cli.json)?;
        }
        Commands::Run {
            max_ticks,
            no_calibrate,
            bar,
            stats,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                ctrlc::set_handler(move || {
                    flag.store(true, Ordering::Relaxed);
                })
                .wrap_err("install Ctrl-C handler")?;
            }
            let slider = run::build(&cfg, source, actuator, bar)?;
            let opts = RunOpts {
                max_ticks,
                calibrate: !no_calibrate,
                bar,
                stats,
                json: cli.json,
            };
            run::run_slider(&cfg, slider, probe, &opts, &shutdown)?;
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<slider_config::Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = slider_config::load_toml(&text).wrap_err(INVALID_CONFIG)?;
    cfg.validate().wrap_err(INVALID_CONFIG)?;
    Ok(cfg)
}

/// Console layer (pretty or JSON, on stderr) plus an optional JSON file layer.
fn init_tracing(cli: &Cli, logging: &slider_config::Logging) -> Result<()> {
    let level = logging
        .level
        .as_deref()
        .filter(|_| cli.log_level == "info")
        .unwrap_or(&cli.log_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    if cli.json {
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed(),
        );
    } else {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .boxed(),
        );
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        let appender = match logging.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}
