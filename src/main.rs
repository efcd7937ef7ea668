use anyhow::Context;
use clap::{Parser, Subcommand};
use macro_recorder::capture::native::NativeInputSource;
use macro_recorder::capture::SystemClock;
use macro_recorder::commands::{inspect_macro, play_macro, record_macro};
use macro_recorder::config::{MacroConfig, PlaybackConfig};
use macro_recorder::playback::{CancelToken, ThreadSleeper};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;

#[derive(Parser, Debug)]
#[command(name = "macro-recorder", version, about = "Record and replay keyboard and mouse macros")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record input until Enter or Ctrl+C, then save it
    Record {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replay a saved macro
    Play {
        input: PathBuf,
        /// Playback speed; 2.0 halves every recorded gap
        #[arg(long, conflicts_with = "compressed")]
        speed: Option<f64>,
        /// Scale every recorded gap by 0.2
        #[arg(long)]
        compressed: bool,
        /// Seconds to wait before the first action
        #[arg(long)]
        lead_in: Option<f64>,
    },
    /// Print a summary of a saved macro
    Inspect { input: PathBuf },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MacroConfig> {
    match path {
        Some(path) => MacroConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(MacroConfig::default()),
    }
}

async fn wait_for_stop() {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    tokio::select! {
        _ = lines.next_line() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    macro_recorder::init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Record { output } => {
            let source = Arc::new(NativeInputSource::new()?);
            eprintln!("Recording... press Enter to stop.");
            let summary = record_macro(
                source,
                Arc::new(SystemClock),
                config,
                &output,
                wait_for_stop(),
            )
            .await?;
            eprintln!(
                "Saved {} events ({:.2}s) to {}",
                summary.total_events,
                summary.duration_secs,
                output.display()
            );
        }
        Command::Play {
            input,
            speed,
            compressed,
            lead_in,
        } => {
            let mut playback = if compressed {
                PlaybackConfig {
                    lead_in_secs: config.playback.lead_in_secs,
                    ..PlaybackConfig::compressed()
                }
            } else {
                config.playback.clone()
            };
            if let Some(speed) = speed {
                playback.speed_factor = speed;
            }
            if let Some(lead_in) = lead_in {
                playback.lead_in_secs = lead_in;
            }

            let source = Arc::new(NativeInputSource::new()?);
            let cancel = CancelToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let report = play_macro(
                source,
                Arc::new(ThreadSleeper),
                config,
                &input,
                playback,
                cancel,
            )
            .await?;
            eprintln!(
                "Played {} events ({} skipped){}",
                report.synthesized,
                report.skipped,
                if report.cancelled { ", cancelled" } else { "" }
            );
        }
        Command::Inspect { input } => {
            let summary = inspect_macro(&input)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
