//! Show or write the effective configuration.

use std::path::{Path, PathBuf};

use lodestone_common::config::AppConfig;

pub fn run(config: &AppConfig, write: bool, explicit: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = write_config(config, explicit)?;
        println!("\nConfig written to: {}", path.display());
    }

    Ok(())
}

/// Save to the file named by `--config`, or to the default location.
fn write_config(config: &AppConfig, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let written = match explicit {
        Some(path) => config.save_to(path).map(|()| path.to_path_buf()),
        None => config.save(),
    };
    written.map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))
}
