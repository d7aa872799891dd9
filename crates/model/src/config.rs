//! Magnetic and spring configuration.

use serde::{Deserialize, Serialize};

/// Default magnetic strength: a pointer on an edge shifts content by 20px.
pub const DEFAULT_STRENGTH: f64 = 40.0;

/// Configuration for pointer attraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticConfig {
    /// Maximum proportional displacement. A pointer on the region's edge
    /// yields `±strength / 2`.
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    DEFAULT_STRENGTH
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: DEFAULT_STRENGTH,
        }
    }
}

impl MagneticConfig {
    pub fn with_strength(strength: f64) -> Self {
        Self { strength }
    }
}

/// Damped spring parameters.
///
/// `damping_ratio() < 1` overshoots and oscillates, `>= 1` converges
/// monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,

    /// Settle once the value is within this distance of the target...
    pub rest_delta: f64,

    /// ...and moving slower than this (units per second).
    pub rest_speed: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_delta: 0.01,
            rest_speed: 0.1,
        }
    }
}

impl SpringParams {
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            ..Self::default()
        }
    }

    /// Light, quick follow used for magnetic buttons.
    pub fn magnetic() -> Self {
        Self::new(150.0, 15.0, 0.1)
    }

    /// Heavily damped follow for scroll progress.
    pub fn scroll() -> Self {
        Self {
            rest_delta: 0.001,
            ..Self::new(100.0, 30.0, 1.0)
        }
    }

    /// Damping coefficient at which the spring is critically damped.
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// `damping / critical_damping`.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    pub fn validate(&self) -> Result<(), SpringParamsError> {
        let fields = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
            ("rest_delta", self.rest_delta),
            ("rest_speed", self.rest_speed),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SpringParamsError::NotFinite { field });
            }
        }
        if self.stiffness <= 0.0 {
            return Err(SpringParamsError::NotPositive {
                field: "stiffness",
                value: self.stiffness,
            });
        }
        if self.mass <= 0.0 {
            return Err(SpringParamsError::NotPositive {
                field: "mass",
                value: self.mass,
            });
        }
        if self.rest_delta <= 0.0 {
            return Err(SpringParamsError::NotPositive {
                field: "rest_delta",
                value: self.rest_delta,
            });
        }
        if self.rest_speed <= 0.0 {
            return Err(SpringParamsError::NotPositive {
                field: "rest_speed",
                value: self.rest_speed,
            });
        }
        if self.damping < 0.0 {
            return Err(SpringParamsError::NegativeDamping(self.damping));
        }
        Ok(())
    }
}

/// Invalid spring parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpringParamsError {
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("damping must not be negative, got {0}")]
    NegativeDamping(f64),
}
