//! Headless driver for recorded landmark streams
//!
//! Usage:
//!   air-sketch replay --frames session.jsonl [--config sketch.toml] [--fps 60]
//!   air-sketch check-config sketch.toml
//!
//! A frames file holds one JSON object per line:
//! `{"dt": 0.033, "frame": {"points": [{"x": 0.5, "y": 0.4}, ...]}}`, with
//! `"frame": null` for frames where no hand was detected.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use air_sketch::{
    HandFrame, OrthoBridge, PeerMessage, SketchConfig, SketchSession, StrokeOutcome, TweenPlayer,
};

#[derive(Parser)]
#[command(name = "air-sketch")]
#[command(version)]
#[command(about = "Replay hand-landmark recordings through the sketch pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a recorded frame stream through a session and summarize it
    Replay {
        /// JSON-lines file of `{dt, frame}` records
        #[arg(long, value_name = "FILE")]
        frames: PathBuf,

        /// TOML configuration; defaults apply when omitted
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Render ticks per second driving motion and tweens
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Viewport width and height in pixels
        #[arg(long, num_args = 2, value_names = ["W", "H"], default_values = ["1280", "720"])]
        viewport: Vec<f32>,

        /// Flip landmark X (selfie camera)
        #[arg(long)]
        mirror: bool,
    },

    /// Validate a configuration file and print the effective values
    #[command(name = "check-config")]
    CheckConfig {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Deserialize)]
struct FrameRecord {
    dt: f32,
    #[serde(default)]
    frame: Option<HandFrame>,
}

#[derive(Default, Serialize)]
struct ReplaySummary {
    frames: usize,
    hand_frames: usize,
    gestures: BTreeMap<&'static str, usize>,
    strokes_closed: usize,
    strokes_rejected: usize,
    strokes_discarded: usize,
    objects_removed: usize,
    objects_cleared: usize,
    objects_alive: usize,
    peer_messages: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("air_sketch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            frames,
            config,
            fps,
            viewport,
            mirror,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => SketchConfig::default(),
            };
            let &[width, height] = viewport.as_slice() else {
                bail!("--viewport takes exactly two values");
            };
            if width <= 0.0 || height <= 0.0 {
                bail!("--viewport must be positive, got {}x{}", width, height);
            }
            let bridge = OrthoBridge::new((width, height), (16.0, 16.0 * height / width))
                .with_mirror(mirror);
            let summary = replay(&frames, config, fps, &bridge)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::CheckConfig { path } => {
            let config = load_config(&path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<SketchConfig> {
    SketchConfig::load(path).with_context(|| format!("loading config {}", path.display()))
}

fn replay(
    path: &Path,
    config: SketchConfig,
    fps: u32,
    bridge: &OrthoBridge,
) -> Result<ReplaySummary> {
    if fps == 0 {
        bail!("--fps must be positive");
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let tick = 1.0 / fps as f32;

    let mut session = SketchSession::new(config);
    let mut tweens = TweenPlayer::new();
    let mut summary = ReplaySummary::default();
    let mut pending = 0.0_f32;

    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: bad frame record", path.display(), number + 1))?;

        let report = session.on_frame(record.frame.as_ref(), record.dt, bridge);
        summary.frames += 1;
        if report.gesture.hand_present {
            summary.hand_frames += 1;
        }
        *summary.gestures.entry(report.gesture.current.name()).or_default() += 1;
        match report.stroke {
            Some(StrokeOutcome::Closed) => summary.strokes_closed += 1,
            Some(StrokeOutcome::Rejected) => summary.strokes_rejected += 1,
            Some(StrokeOutcome::Discarded) => summary.strokes_discarded += 1,
            None => {}
        }
        summary.objects_removed += usize::from(report.removed.is_some());
        summary.objects_cleared += report.cleared;
        for message in &report.outgoing {
            summary.peer_messages += 1;
            let record = message.encode()?;
            tracing::debug!(%record, "outgoing peer record");
        }
        if let Some(PeerMessage::StrokeComplete { points, .. }) = report.outgoing.first() {
            tracing::info!(line = number + 1, points = points.len(), "stroke completed");
        }

        // Render cadence runs independently of the pose cadence
        pending += record.dt.max(0.0);
        while pending >= tick {
            pending -= tick;
            session.tick(tick);
            tweens.extend(session.drain_updates());
            tweens.advance(tick, session.layout_mut());
        }
    }

    tweens.extend(session.drain_updates());
    tweens.finish(session.layout_mut());
    summary.objects_alive = session.layout().len();
    Ok(summary)
}
