//! Lodestone CLI: magnetic offsets, spring replays, and live motion.
//!
//! Usage:
//!   lodestone offset [OPTIONS]        Magnetic offset for one pointer position
//!   lodestone simulate <SCRIPT>       Replay a JSONL event script frame by frame
//!   lodestone scroll [OPTIONS]        Scroll progress and parallax for a section
//!   lodestone live [OPTIONS]          Read events from stdin, emit frames in real time
//!   lodestone config [--write]        Show or write the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lodestone_common::config::AppConfig;
use lodestone_model::Region;

mod commands;

#[derive(Parser)]
#[command(
    name = "lodestone",
    about = "Pointer-magnetic and scroll-linked spring motion",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/lodestone/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Scroll-tracked section options shared by `simulate` and `live`.
#[derive(clap::Args, Clone, Copy)]
pub struct SectionArgs {
    /// Track a section starting this many pixels down the page
    #[arg(long)]
    section_top: Option<f64>,

    /// Height of the tracked section
    #[arg(long, default_value_t = 400.0)]
    section_height: f64,

    /// Viewport height
    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the magnetic offset for a single pointer position
    Offset {
        /// Element bounds as left,top,width,height
        #[arg(long, value_parser = commands::parse_region, default_value = "0,0,200,100")]
        layout: Region,

        /// Pointer X (viewport pixels)
        #[arg(short, long, allow_negative_numbers = true)]
        x: f64,

        /// Pointer Y (viewport pixels)
        #[arg(short, long, allow_negative_numbers = true)]
        y: f64,

        /// Magnetic strength (defaults to config)
        #[arg(long)]
        strength: Option<f64>,
    },

    /// Replay a JSONL event script at a fixed frame rate
    Simulate {
        /// Path to the script
        script: PathBuf,

        /// Frame rate (defaults to config)
        #[arg(long)]
        fps: Option<u32>,

        /// Magnetic strength (defaults to config)
        #[arg(long)]
        strength: Option<f64>,

        /// Initial element bounds as left,top,width,height
        #[arg(long, value_parser = commands::parse_region, default_value = "0,0,0,0")]
        layout: Region,

        #[command(flatten)]
        section: SectionArgs,

        /// Frames allowed after the last event for springs to settle
        #[arg(long, default_value_t = 600)]
        settle_frames: u64,

        /// Print every frame, not only frames that changed
        #[arg(long)]
        all_frames: bool,

        /// Emit frames as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Scroll progress and parallax for a section at one scroll offset
    Scroll {
        /// Section top in page coordinates
        #[arg(long)]
        section_top: f64,

        /// Section height
        #[arg(long, default_value_t = 400.0)]
        section_height: f64,

        /// Viewport height
        #[arg(long, default_value_t = 800.0)]
        viewport_height: f64,

        /// Page scroll offset
        #[arg(long)]
        scroll_y: f64,

        /// Intersection where tracking starts
        #[arg(long, default_value = "start end")]
        start: String,

        /// Intersection where tracking ends
        #[arg(long, default_value = "end start")]
        end: String,

        /// Parallax distance (defaults to config)
        #[arg(long)]
        distance: Option<f64>,
    },

    /// Read events from stdin and print changed frames in real time
    Live {
        /// Frame rate (defaults to config)
        #[arg(long)]
        fps: Option<u32>,

        /// Element bounds as left,top,width,height
        #[arg(long, value_parser = commands::parse_region, default_value = "0,0,200,100")]
        layout: Region,

        #[command(flatten)]
        section: SectionArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the config file location
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    lodestone_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Offset {
            layout,
            x,
            y,
            strength,
        } => commands::offset::run(&config, layout, x, y, strength),
        Commands::Simulate {
            script,
            fps,
            strength,
            layout,
            section,
            settle_frames,
            all_frames,
            json,
        } => {
            apply_overrides(&mut config, fps, strength)?;
            commands::simulate::run(
                &config,
                script,
                layout,
                section.section(),
                settle_frames,
                all_frames,
                json,
            )
        }
        Commands::Scroll {
            section_top,
            section_height,
            viewport_height,
            scroll_y,
            start,
            end,
            distance,
        } => commands::scroll::run(
            &config,
            commands::scroll::ScrollQuery {
                section_top,
                section_height,
                viewport_height,
                scroll_y,
                start,
                end,
                distance,
            },
        ),
        Commands::Live {
            fps,
            layout,
            section,
        } => {
            apply_overrides(&mut config, fps, None)?;
            commands::live::run(&config, layout, section.section()).await
        }
        Commands::Config { write } => commands::config::run(&config, write, cli.config.as_deref()),
    }
}

impl SectionArgs {
    fn section(self) -> Option<lodestone_motion::ScrollSection> {
        self.section_top
            .map(|page_top| lodestone_motion::ScrollSection {
                page_top,
                height: self.section_height,
                viewport_height: self.viewport_height,
            })
    }
}

/// Fold command-line overrides into the config and re-validate.
fn apply_overrides(
    config: &mut AppConfig,
    fps: Option<u32>,
    strength: Option<f64>,
) -> anyhow::Result<()> {
    if let Some(fps) = fps {
        config.frame_rate_hz = fps;
    }
    if let Some(strength) = strength {
        config.magnetic.strength = strength;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid settings: {e}"))
}
