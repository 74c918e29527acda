use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono_input::InputFrame;
use chrono_kernel::{FrameSnapshot, Level, LevelDef, Session, SessionConfig};
use chrono_tools::{SessionInspector, ascii_view};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod demo;
mod files;
mod script;

use script::Script;

#[derive(Parser)]
#[command(name = "chrono-cli", about = "Headless driver for chrono-switch levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Level file (.json, .yaml, .yml)
    #[arg(short, long)]
    level: PathBuf,
    /// Tuning overrides; defaults apply for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Input script: list of held-key segments
    #[arg(short, long)]
    script: Option<PathBuf>,
    /// Ticks to simulate; defaults to the script length
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Milliseconds per tick
    #[arg(long, default_value = "16")]
    dt_ms: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Validate a level file and describe its layers
    Validate {
        /// Level file (.json, .yaml, .yml)
        level: PathBuf,
    },
    /// Run a level with an input script and print frames with events
    Run {
        #[command(flatten)]
        args: RunArgs,
        /// Print every frame, not only frames with events
        #[arg(long)]
        all: bool,
        /// Emit snapshots as JSON lines
        #[arg(long)]
        json: bool,
        /// Draw the area around the player after the last tick
        #[arg(long)]
        view: bool,
    },
    /// Run a level twice and check both runs hash identically every tick
    Replay {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Play the built-in two-world level
    Demo {
        /// Milliseconds per tick
        #[arg(long, default_value = "16")]
        dt_ms: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("chrono-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", chrono_common::crate_info());
            println!("collision: {}", chrono_collision::crate_info());
            println!("input: {}", chrono_input::crate_info());
            println!("motion: {}", chrono_motion::crate_info());
            println!("kernel: {}", chrono_kernel::crate_info());
            println!("tools: {}", chrono_tools::crate_info());
        }
        Commands::Validate { level } => {
            let def = files::load_level(&level)?;
            let loaded = Level::load(def.clone())
                .with_context(|| format!("level {} is invalid", level.display()))?;
            println!("{}", describe_level(&def, &loaded));
        }
        Commands::Run {
            args,
            all,
            json,
            view,
        } => {
            let (mut session, frames, ticks) = prepare(&args)?;
            simulate(&mut session, &frames, ticks, args.dt_ms, |snap| {
                if json {
                    match serde_json::to_string(snap) {
                        Ok(line) => println!("{line}"),
                        Err(err) => tracing::error!(%err, "failed to encode snapshot"),
                    }
                } else if all || !snap.events.is_empty() {
                    println!("{}", SessionInspector::frame_line(snap));
                }
            });
            if !json {
                println!("{}", SessionInspector::summary(&session));
            }
            if view {
                print!("{}", ascii_view(&session, 8));
            }
        }
        Commands::Replay { args } => {
            let (session, frames, ticks) = prepare(&args)?;
            let hashes_a = hash_trace(session.clone(), &frames, ticks, args.dt_ms);
            let hashes_b = hash_trace(session, &frames, ticks, args.dt_ms);

            println!("Deterministic replay: ticks={ticks}, dt={}ms", args.dt_ms);
            if let Some(last) = hashes_a.last() {
                println!("Final hash: {last:016x}");
            }
            match hashes_a.iter().zip(&hashes_b).position(|(a, b)| a != b) {
                None => println!("Match: OK"),
                Some(tick) => bail!("replay diverged at tick {}", tick + 1),
            }
        }
        Commands::Demo { dt_ms } => {
            let script = demo::script();
            let mut session = Session::from_def(demo::level(), SessionConfig::default())
                .context("built-in demo level rejected")?;
            let frames = script.frames();
            simulate(&mut session, &frames, script.total_ticks(), dt_ms, |snap| {
                if !snap.events.is_empty() {
                    println!("{}", SessionInspector::frame_line(snap));
                }
            });
            println!("{}", SessionInspector::summary(&session));
            print!("{}", ascii_view(&session, 8));
        }
    }

    Ok(())
}

/// Load level, config and script, and start the session.
fn prepare(args: &RunArgs) -> anyhow::Result<(Session, Vec<InputFrame>, u64)> {
    let def = files::load_level(&args.level)?;
    let config = files::load_config(args.config.as_deref())?;
    let script: Script = files::load_script(args.script.as_deref())?;
    if args.dt_ms == 0 {
        bail!("--dt-ms must be at least 1");
    }
    let session = Session::from_def(def, config)
        .with_context(|| format!("cannot start {}", args.level.display()))?;
    let ticks = args.ticks.unwrap_or_else(|| script.total_ticks());
    Ok((session, script.frames(), ticks))
}

/// Step `ticks` times, feeding scripted frames and then neutral input.
fn simulate(
    session: &mut Session,
    frames: &[InputFrame],
    ticks: u64,
    dt_ms: u32,
    mut on_frame: impl FnMut(&FrameSnapshot),
) {
    let idle = InputFrame::default();
    for i in 0..ticks {
        let input = usize::try_from(i)
            .ok()
            .and_then(|i| frames.get(i))
            .unwrap_or(&idle);
        let snap = session.step(input, dt_ms);
        on_frame(&snap);
    }
}

fn hash_trace(mut session: Session, frames: &[InputFrame], ticks: u64, dt_ms: u32) -> Vec<u64> {
    let mut hashes = Vec::new();
    let idle = InputFrame::default();
    for i in 0..ticks {
        let input = usize::try_from(i)
            .ok()
            .and_then(|i| frames.get(i))
            .unwrap_or(&idle);
        session.step(input, dt_ms);
        hashes.push(session.state_hash());
    }
    hashes
}

fn describe_level(def: &LevelDef, level: &Level) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Level [{}]: start=({}, {}) initial_mode={} checkpoints={}",
        level.name(),
        level.start().x,
        level.start().y,
        level.initial_mode(),
        level.checkpoints().len()
    );
    for layer in &def.layers {
        let Some(grid) = level.world().get(&layer.id) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  {:<16} {}x{} cells @ {} solid={} hazard={} present={:?} past={:?}",
            layer.id.as_str(),
            grid.width(),
            grid.height(),
            grid.cell_size(),
            grid.count(chrono_collision::Cell::Solid),
            grid.count(chrono_collision::Cell::Hazard),
            layer.roles.present,
            layer.roles.past,
        );
    }
    out
}
