use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use draggle::Dp;

mod config;
mod loading;
mod output;
mod scenario;

use config::DemoConfig;
use scenario::{Harness, Scenario};

#[derive(Parser)]
#[command(name = "draggle-example")]
#[command(version, about = "Replays slide-to-confirm gestures on a simulated clock", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay one scenario
    Run {
        #[arg(value_enum)]
        scenario: Scenario,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Replay every scenario
    All {
        #[command(flatten)]
        options: RunOptions,
    },
    /// Print the default configuration as TOML
    Defaults,
}

#[derive(Args)]
struct RunOptions {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the track width, in dp
    #[arg(long)]
    track_width: Option<f32>,
    /// Override the loading timeout, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Override the fling velocity threshold, in dp per second
    #[arg(long)]
    velocity_threshold: Option<f32>,
    /// Draw the track every N frames (0 disables)
    #[arg(long, default_value_t = 0)]
    every: usize,
}

impl RunOptions {
    fn load(&self) -> Result<DemoConfig> {
        let mut config = DemoConfig::load(self.config.as_deref())?;
        if let Some(width) = self.track_width {
            config.track_width = Dp(width);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(threshold) = self.velocity_threshold {
            config.control.velocity_threshold = Dp(threshold);
        }
        config.control.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let Cli { command } = Cli::parse();

    match command {
        Commands::Run { scenario, options } => {
            let config = options.load()?;
            replay(scenario, &config, options.every)?;
        }
        Commands::All { options } => {
            let config = options.load()?;
            let mut failures = Vec::new();
            for &scenario in Scenario::value_variants() {
                if !replay(scenario, &config, options.every)? {
                    failures.push(scenario);
                }
            }
            if !failures.is_empty() {
                bail!("{} scenario(s) did not come back to rest: {failures:?}", failures.len());
            }
        }
        Commands::Defaults => {
            print!("{}", DemoConfig::default().to_toml()?);
        }
    }

    Ok(())
}

/// Replays `scenario`; returns whether the control ended at rest.
fn replay(scenario: Scenario, config: &DemoConfig, every: usize) -> Result<bool> {
    let name = scenario
        .to_possible_value()
        .map(|value| value.get_name().to_string())
        .unwrap_or_else(|| format!("{scenario:?}"));
    output::status(
        "Replaying",
        format!("{name} on a {:.0} px track", config.track_width_px()),
    );

    let harness = Harness::new(config)?;
    let anchors = harness.unlocker().state().anchors();
    if let Some(anchors) = anchors.filter(|anchors| anchors.is_degenerate()) {
        output::note(format!(
            "track is no wider than the thumb (end anchor at {:.0} px); dragging is inert",
            anchors.end()
        ));
    }

    let mut frame_index = 0usize;
    let report = harness.run(&scenario.steps(), |at, frame| {
        frame_index += 1;
        if every > 0 && frame_index % every == 0 {
            output::frame(at, frame);
        }
    });
    for (at, event) in &report.events {
        output::event(*at, event);
    }

    let settled = report.settled();
    output::status(
        "Finished",
        format!(
            "{} frames, {} unlock(s), {}",
            report.frames,
            report.unlock_count,
            match settled {
                Some(anchor) => format!("resting at {anchor}"),
                None => "still moving".to_string(),
            }
        ),
    );
    Ok(settled.is_some())
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "error,draggle=info,draggle_example=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .try_init();
}
