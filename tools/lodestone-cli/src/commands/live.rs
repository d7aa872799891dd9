//! Real-time loop: events from stdin, frames on a fixed-rate ticker.
//!
//! Input lines are applied as soon as they arrive; springs advance only on
//! frame ticks. Both run on one thread, so the raw targets need no locking.
//! After stdin closes the loop keeps ticking until every spring settles.

use std::time::Duration;

use lodestone_common::clock::{FrameClock, FrameRate};
use lodestone_common::config::AppConfig;
use lodestone_model::{EventKind, Region};
use lodestone_motion::ScrollSection;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

pub async fn run(
    config: &AppConfig,
    layout: Region,
    section: Option<ScrollSection>,
) -> anyhow::Result<()> {
    let mut scene = super::build_scene(config, layout, section);
    let rate = FrameRate::new(config.frame_rate_hz);

    let mut ticker = tokio::time::interval(Duration::from_nanos(rate.interval_ns()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut clock = FrameClock::start();
    let mut applied = 0u64;

    tracing::info!(
        fps = config.frame_rate_hz,
        started = clock.epoch_wall(),
        "Live loop started"
    );

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() || trimmed.starts_with('#') {
                            continue;
                        }
                        match serde_json::from_str::<EventKind>(trimmed) {
                            Ok(event) => {
                                scene.apply(&event);
                                applied += 1;
                            }
                            Err(e) => tracing::warn!(error = %e, line = trimmed, "Skipping malformed event"),
                        }
                    }
                    None => {
                        input_open = false;
                        tracing::debug!(events = applied, "Input closed, waiting for springs to settle");
                    }
                }
            }
            _ = ticker.tick() => {
                let now = clock.elapsed_ns();
                let dt = clock.frame_dt(now);
                let sample = scene.frame(now, dt);
                if sample.changed {
                    println!("{}", serde_json::to_string(&sample)?);
                }
                if !input_open && sample.settled {
                    break;
                }
            }
        }
    }

    tracing::info!(events = applied, "Live loop finished");
    Ok(())
}
