//! Replay an event script frame by frame.

use std::path::PathBuf;

use lodestone_common::clock::{FrameClock, FrameRate};
use lodestone_common::config::AppConfig;
use lodestone_common::load_script;
use lodestone_model::Region;
use lodestone_motion::{FrameSample, ScrollSection, Simulation};

pub fn run(
    config: &AppConfig,
    script: PathBuf,
    layout: Region,
    section: Option<ScrollSection>,
    settle_frames: u64,
    all_frames: bool,
    json: bool,
) -> anyhow::Result<()> {
    let events = load_script(&script)
        .map_err(|e| anyhow::anyhow!("Failed to load script {}: {e}", script.display()))?;

    let scene = super::build_scene(config, layout, section);
    let mut simulation = Simulation::new(scene, FrameRate::new(config.frame_rate_hz))
        .with_settle_frames(settle_frames);
    let report = simulation.run(&events);
    let shown: Vec<&FrameSample> = if all_frames {
        report.frames.iter().collect()
    } else {
        report.changed_frames().collect()
    };

    if json {
        for frame in &shown {
            println!("{}", serde_json::to_string(frame)?);
        }
        return Ok(());
    }

    println!("Replaying {}", script.display());
    println!(
        "  {} events over {} frames at {}Hz, {} changed",
        report.events_applied,
        report.frames.len(),
        config.frame_rate_hz,
        report.changed_frames().count()
    );
    println!();
    println!(
        "{:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "frame", "t_ms", "raw_x", "raw_y", "x", "y", "parallax"
    );
    for frame in &shown {
        let parallax = frame
            .parallax
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6} {:>9.1} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9}",
            frame.frame,
            FrameClock::ns_to_secs(frame.t_ns) * 1_000.0,
            frame.raw.x,
            frame.raw.y,
            frame.offset.x,
            frame.offset.y,
            parallax
        );
    }
    println!();

    match report.settled_at_ns {
        Some(t) => println!(
            "Settled at {:.1}ms",
            FrameClock::ns_to_secs(t) * 1_000.0
        ),
        None => println!("Did not settle within {settle_frames} trailing frames"),
    }

    Ok(())
}
