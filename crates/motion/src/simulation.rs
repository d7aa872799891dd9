//! Deterministic replay of event scripts on a fixed frame grid.
//!
//! Events whose timestamp is at or before a frame's time are applied before
//! that frame renders. After the last event, frames keep rendering until the
//! scene settles or the tail budget runs out.

use lodestone_common::clock::FrameRate;
use lodestone_model::TimedEvent;
use serde::Serialize;

use crate::scene::{FrameSample, Scene};

/// Default number of extra frames allowed for settling after the script.
pub const DEFAULT_SETTLE_FRAMES: u64 = 600;

/// Result of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub frame_interval_ns: u64,
    pub events_applied: usize,
    /// Time of the first frame from which the scene stayed settled.
    pub settled_at_ns: Option<u64>,
    pub frames: Vec<FrameSample>,
}

impl SimulationReport {
    /// Frames in which something visibly moved.
    pub fn changed_frames(&self) -> impl Iterator<Item = &FrameSample> {
        self.frames.iter().filter(|frame| frame.changed)
    }

    pub fn last(&self) -> Option<&FrameSample> {
        self.frames.last()
    }
}

/// Replays scripts against a scene.
#[derive(Debug)]
pub struct Simulation {
    scene: Scene,
    rate: FrameRate,
    settle_frames: u64,
}

impl Simulation {
    pub fn new(scene: Scene, rate: FrameRate) -> Self {
        Self {
            scene,
            rate,
            settle_frames: DEFAULT_SETTLE_FRAMES,
        }
    }

    /// Limit the frames rendered after the last event.
    pub fn with_settle_frames(mut self, frames: u64) -> Self {
        self.settle_frames = frames;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Replay `events`. Events are ordered by timestamp first; ties keep
    /// their script order.
    pub fn run(&mut self, events: &[TimedEvent]) -> SimulationReport {
        let mut ordered: Vec<&TimedEvent> = events.iter().collect();
        ordered.sort_by_key(|event| event.timestamp_ns);

        let end_ns = ordered.last().map_or(0, |event| event.timestamp_ns);
        let scripted_frames = self.rate.frames_covering(end_ns);
        let dt = self.rate.interval_secs();

        tracing::info!(
            events = ordered.len(),
            frames = scripted_frames,
            interval_ns = self.rate.interval_ns(),
            "Replaying script"
        );

        let mut frames = Vec::with_capacity(scripted_frames as usize);
        let mut pending = ordered.into_iter().peekable();
        let mut applied = 0;
        let mut index = 0u64;

        loop {
            let t_ns = self.rate.frame_time_ns(index);
            while let Some(event) = pending.next_if(|event| event.timestamp_ns <= t_ns) {
                self.scene.apply(&event.kind);
                applied += 1;
            }

            let frame_dt = if index == 0 { 0.0 } else { dt };
            let sample = self.scene.frame(t_ns, frame_dt);
            frames.push(sample);
            index += 1;

            let in_tail = index >= scripted_frames;
            if in_tail && (sample.settled || index >= scripted_frames + self.settle_frames) {
                break;
            }
        }

        let settled_at_ns = settled_since(&frames);
        match settled_at_ns {
            Some(t) => tracing::info!(frames = frames.len(), settled_at_ns = t, "Replay finished"),
            None => tracing::warn!(frames = frames.len(), "Replay ended before the scene settled"),
        }

        SimulationReport {
            frame_interval_ns: self.rate.interval_ns(),
            events_applied: applied,
            settled_at_ns,
            frames,
        }
    }
}

/// Timestamp of the first frame of the trailing run of settled frames.
fn settled_since(frames: &[FrameSample]) -> Option<u64> {
    let tail = frames.iter().rev().take_while(|frame| frame.settled).count();
    if tail == 0 {
        return None;
    }
    Some(frames[frames.len() - tail].t_ns)
}
