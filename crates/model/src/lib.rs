//! Lodestone Model
//!
//! Defines the data contracts shared by the motion engine and its callers:
//! - **Geometry:** Element regions, pointer samples, and offset vectors
//! - **Config:** Magnetic strength and spring parameters
//! - **Events:** Timestamped pointer, layout, and scroll events (JSONL scripts)
//!
//! All coordinates are viewport-relative CSS pixels, the same space a
//! browser reports for `getBoundingClientRect()` and `clientX/clientY`.

pub mod config;
pub mod event;
pub mod geometry;

pub use config::*;
pub use event::*;
pub use geometry::*;
