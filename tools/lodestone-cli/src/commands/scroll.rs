//! Scroll progress and parallax for one scroll offset.

use anyhow::Context;
use lodestone_common::config::AppConfig;
use lodestone_motion::{parallax, ScrollOffset, ScrollProgress, ScrollSection};

pub struct ScrollQuery {
    pub section_top: f64,
    pub section_height: f64,
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub start: String,
    pub end: String,
    pub distance: Option<f64>,
}

pub fn run(config: &AppConfig, query: ScrollQuery) -> anyhow::Result<()> {
    let start: ScrollOffset = query.start.parse().context("Invalid --start")?;
    let end: ScrollOffset = query.end.parse().context("Invalid --end")?;
    let tracker = ScrollProgress::new(start, end);
    let distance = query.distance.unwrap_or(config.parallax_distance);

    let section = ScrollSection {
        page_top: query.section_top,
        height: query.section_height,
        viewport_height: query.viewport_height,
    };
    let rect = section.rect_at(query.scroll_y);

    println!(
        "Section top in viewport: {:.1}px (viewport height {})",
        rect.top, query.viewport_height
    );
    match tracker.progress(&rect, query.viewport_height) {
        Some(progress) => {
            println!("Progress: {progress:.4}");
            println!("Parallax: {:.2}px of {distance}px", parallax(progress, distance));
        }
        None => println!("Progress: undefined (tracking range is empty)"),
    }

    Ok(())
}
