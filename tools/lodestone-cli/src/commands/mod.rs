//! Subcommand implementations.

pub mod config;
pub mod live;
pub mod offset;
pub mod scroll;
pub mod simulate;

use lodestone_common::config::AppConfig;
use lodestone_model::Region;
use lodestone_motion::{Scene, ScrollDriver, ScrollProgress, ScrollSection};

/// Parse `left,top,width,height`.
pub fn parse_region(raw: &str) -> Result<Region, String> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in `{raw}`: {e}"))?;

    match values.as_slice() {
        [left, top, width, height] => {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("non-finite value in `{raw}`"));
            }
            Ok(Region::new(*left, *top, *width, *height))
        }
        _ => Err(format!(
            "expected left,top,width,height but got {} values",
            values.len()
        )),
    }
}

/// Build the scene shared by `simulate` and `live`.
pub fn build_scene(config: &AppConfig, layout: Region, section: Option<ScrollSection>) -> Scene {
    let scene = Scene::new(layout, config.magnetic, config.magnetic_spring);
    match section {
        Some(section) => {
            let driver = ScrollDriver::new(
                ScrollProgress::default(),
                config.scroll_spring,
                config.parallax_distance,
            );
            scene.with_scroll(section, driver)
        }
        None => scene,
    }
}
