//! Magnetic offset for a single pointer position.

use lodestone_common::config::AppConfig;
use lodestone_model::{PointerSample, Region};
use lodestone_motion::magnetic_offset;

pub fn run(
    config: &AppConfig,
    layout: Region,
    x: f64,
    y: f64,
    strength: Option<f64>,
) -> anyhow::Result<()> {
    let strength = strength.unwrap_or(config.magnetic.strength);
    if !strength.is_finite() {
        anyhow::bail!("strength must be finite");
    }

    let sample = PointerSample::new(x, y);
    println!(
        "Element: left={} top={} width={} height={}",
        layout.left, layout.top, layout.width, layout.height
    );
    println!("Pointer: ({x}, {y})  strength={strength}");

    match magnetic_offset(&layout, sample, strength) {
        Some(offset) => {
            println!("Offset: x={:.4} y={:.4}", offset.x, offset.y);
            if !layout.contains(sample) {
                println!("  (pointer is outside the element; it would be at rest)");
            }
        }
        None => println!("Offset: unchanged (element has no measurable area)"),
    }

    Ok(())
}
