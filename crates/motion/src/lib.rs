//! Lodestone Motion: pointer-linked and scroll-linked animation
//!
//! - **Attraction:** Turn pointer moves over an element into a magnetic offset
//! - **Spring:** Damped, per-frame smoothing of any raw target
//! - **Remap / Scroll:** Scroll progress, parallax mapping, and in-view reveal
//! - **Scene / Simulation:** Per-frame composition and deterministic replay
//!
//! Everything here is single-threaded. Input handlers write the raw target,
//! the frame tick reads it; no locking is involved.

pub mod attraction;
pub mod element;
pub mod remap;
pub mod scene;
pub mod scroll;
pub mod simulation;
pub mod spring;

pub use attraction::{magnetic_offset, PointerAttraction};
pub use element::{Element, Listener, ListenerKind, PointerEvent};
pub use remap::{parallax, remap};
pub use scene::{FrameSample, MagneticDriver, Scene, ScrollDriver, ScrollSection};
pub use scroll::{InViewTrigger, ScrollOffset, ScrollProgress};
pub use simulation::{Simulation, SimulationReport};
pub use spring::{integrate, Animatable, SmoothedMotion, SpringState};
