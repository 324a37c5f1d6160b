//! marionette - third-person player control with viewpoint interaction
//!
//! Headless driver: loads a scene, possesses a character and replays scripted input.

mod config;
mod headless;
mod scene;
mod scripted_input;

use anyhow::{Context, Result};
use config::ControlsConfig;
use scene::SceneDescription;
use scripted_input::ScriptedInputPlayer;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // INFO by default; override via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting marionette v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let controls = ControlsConfig::load_from_path(&cli.config);
    if let Some(path) = &cli.save_config {
        controls
            .save_to_path(path)
            .with_context(|| format!("failed to save controls to {}", path.display()))?;
        info!("Saved controls config to {}", path.display());
    }

    let scene = match &cli.scene {
        Some(path) => SceneDescription::from_path(path)?,
        None => {
            info!("No --scene given; using the built-in scene");
            SceneDescription::builtin()
        }
    };
    let script = cli
        .script
        .as_deref()
        .map(|path| {
            ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load scripted input {}", path.display()))
        })
        .transpose()?;

    let summary = headless::run(headless::HeadlessConfig {
        controls,
        scene,
        script,
        max_ticks: cli.ticks,
        dt: cli.dt,
        events: cli.events,
        exit_when_script_finished: !cli.keep_running,
    })?;

    info!(ticks = summary.ticks, "Run finished");
    for (kind, count) in &summary.outcomes {
        info!(kind = *kind, count, "interaction outcomes");
    }
    for (name, status) in &summary.statuses {
        info!("{name}: {status}");
    }
    Ok(())
}

#[derive(Debug)]
struct CliOptions {
    config: PathBuf,
    save_config: Option<PathBuf>,
    scene: Option<PathBuf>,
    script: Option<PathBuf>,
    ticks: u64,
    dt: f32,
    events: Option<PathBuf>,
    keep_running: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: PathBuf::from(config::DEFAULT_CONTROLS_PATH),
            save_config: None,
            scene: None,
            script: None,
            ticks: 600,
            dt: 1.0 / 60.0,
            events: None,
            keep_running: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => match args.next() {
                    Some(path) => opts.config = PathBuf::from(path),
                    None => tracing::error!("--config requires a file path"),
                },
                "--save-config" => match args.next() {
                    Some(path) => opts.save_config = Some(PathBuf::from(path)),
                    None => tracing::error!("--save-config requires a file path"),
                },
                "--scene" => match args.next() {
                    Some(path) => opts.scene = Some(PathBuf::from(path)),
                    None => tracing::error!("--scene requires a file path"),
                },
                "--script" => match args.next() {
                    Some(path) => opts.script = Some(PathBuf::from(path)),
                    None => tracing::error!("--script requires a file path"),
                },
                "--events" => match args.next() {
                    Some(path) => opts.events = Some(PathBuf::from(path)),
                    None => tracing::error!("--events requires a file path"),
                },
                "--ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.ticks = value,
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--ticks requires an integer");
                    }
                }
                "--dt" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<f32>() {
                            Ok(value) if value.is_finite() && value > 0.0 => opts.dt = value,
                            Ok(value) => tracing::error!(value, "--dt must be positive"),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--dt must be a number");
                            }
                        }
                    } else {
                        tracing::error!("--dt requires a number of seconds");
                    }
                }
                "--keep-running" => opts.keep_running = true,
                other => tracing::warn!("Ignoring unknown argument {other}"),
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        let opts = parse(&[]);
        assert_eq!(opts.config, PathBuf::from("config/controls.toml"));
        assert_eq!(opts.ticks, 600);
        assert!(opts.scene.is_none() && opts.script.is_none() && opts.events.is_none());
    }

    #[test]
    fn parses_every_flag() {
        let opts = parse(&[
            "--config", "c.toml", "--scene", "s.json", "--script", "p.json", "--ticks", "42",
            "--dt", "0.02", "--events", "out.jsonl", "--keep-running",
        ]);
        assert_eq!(opts.config, PathBuf::from("c.toml"));
        assert_eq!(opts.scene, Some(PathBuf::from("s.json")));
        assert_eq!(opts.script, Some(PathBuf::from("p.json")));
        assert_eq!(opts.ticks, 42);
        assert!((opts.dt - 0.02).abs() < 1e-6);
        assert_eq!(opts.events, Some(PathBuf::from("out.jsonl")));
        assert!(opts.keep_running);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let opts = parse(&["--ticks", "many", "--dt", "-1"]);
        assert_eq!(opts.ticks, 600);
        assert!((opts.dt - 1.0 / 60.0).abs() < 1e-9);
    }
}
