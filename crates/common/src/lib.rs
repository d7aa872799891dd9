//! Lodestone Common Utilities
//!
//! Shared infrastructure for all Lodestone crates:
//! - Error types and result aliases
//! - Frame clock for per-frame `dt` and fixed-rate ticking
//! - Tracing/logging initialization
//! - Configuration and event script loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod script;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use script::load_script;
