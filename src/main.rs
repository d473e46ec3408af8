//! Slowlap Replay.
//!
//! Spielt ein aufgezeichnetes Frame-Log (JSON) durch den Pfadplaner und
//! gibt die letzte Planung als JSON aus.
//!
//! Aufruf: `slowlap-replay <frames.json> [options.toml]`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use glam::Vec2;
use serde::Deserialize;
use slowlap_planner::{ConeObservation, PathPlanner, PlannerOptions, PlannerOutput};

/// Ein aufgezeichneter Perzeptions-Frame.
#[derive(Debug, Deserialize)]
struct Frame {
    car: Vec2,
    #[serde(default)]
    cones: Vec<ConeObservation>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Slowlap Replay v{} startet...", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let Some(frames_path) = args.next().map(PathBuf::from) else {
        bail!("Aufruf: slowlap-replay <frames.json> [options.toml]");
    };
    let options = match args.next() {
        Some(path) => PlannerOptions::load_from_file(Path::new(&path)),
        None => PlannerOptions::default(),
    };

    let frames = read_frames(&frames_path)?;
    let output = replay(&frames, options)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_frames(path: &Path) -> anyhow::Result<Vec<Frame>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Frame-Log nicht lesbar: {}", path.display()))?;
    let frames: Vec<Frame> = serde_json::from_str(&content)
        .with_context(|| format!("Frame-Log fehlerhaft: {}", path.display()))?;
    log::info!("{} Frames geladen aus: {}", frames.len(), path.display());
    Ok(frames)
}

fn replay(frames: &[Frame], options: PlannerOptions) -> anyhow::Result<PlannerOutput> {
    let Some(first) = frames.first() else {
        bail!("Frame-Log enthält keine Frames");
    };
    let mut planner = PathPlanner::new(first.car, options).context("Planer-Initialisierung")?;
    let mut output = planner.output();

    for (index, frame) in frames.iter().enumerate() {
        output = planner
            .update(&frame.cones, frame.car)
            .with_context(|| format!("Frame {index} abgelehnt"))?;
        if output.complete {
            log::info!("Runde in Frame {index} geschlossen");
            break;
        }
    }

    log::info!(
        "Replay beendet: {} Punkte ({} aus Pylonen-Paaren), Zustand {:?}",
        output.centre_line.len(),
        output.paired_points(),
        planner.loop_state()
    );
    Ok(output)
}
