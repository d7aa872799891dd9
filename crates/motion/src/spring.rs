//! Damped spring smoothing.
//!
//! A [`SmoothedMotion`] follows a raw target that may change at any time
//! (pointer moves, scroll events) and is advanced once per rendered frame.
//! Its value never jumps when the target changes; it accelerates toward the
//! new target under a mass-spring-damper model and settles once close enough.

use std::ops::{Add, Mul, Sub};

use lodestone_common::clock::MAX_FRAME_DT_SECS;
use lodestone_model::{OffsetVector, SpringParams};

/// Longest integration step, in seconds.
pub const MAX_SUBSTEP_SECS: f64 = 1.0 / 240.0;

/// Upper bound on sub-steps per frame.
const MAX_SUBSTEPS: u32 = 4_096;

/// Floor applied to stiffness and mass before dividing by them.
const MIN_PARAM: f64 = 1e-6;

/// A value a spring can animate.
pub trait Animatable:
    Copy + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self>
{
    fn zero() -> Self;

    /// Distance from zero, used for rest checks.
    fn magnitude(&self) -> f64;

    fn is_finite(&self) -> bool;
}

impl Animatable for f64 {
    fn zero() -> Self {
        0.0
    }

    fn magnitude(&self) -> f64 {
        self.abs()
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Animatable for OffsetVector {
    fn zero() -> Self {
        OffsetVector::ZERO
    }

    fn magnitude(&self) -> f64 {
        self.length()
    }

    fn is_finite(&self) -> bool {
        OffsetVector::is_finite(self)
    }
}

/// Position and velocity of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState<T> {
    pub value: T,
    pub velocity: T,
}

impl<T: Animatable> SpringState<T> {
    /// A spring at rest at `value`.
    pub fn at_rest(value: T) -> Self {
        Self {
            value,
            velocity: T::zero(),
        }
    }
}

/// Advance a spring toward `target` by `dt` seconds.
///
/// Semi-implicit Euler, sub-stepped so each step stays well inside the
/// stable range for the given stiffness and damping. `dt` is clamped to
/// `[0, MAX_FRAME_DT_SECS]`; a non-finite `dt` is treated as zero.
pub fn integrate<T: Animatable>(
    state: SpringState<T>,
    target: T,
    dt: f64,
    params: &SpringParams,
) -> SpringState<T> {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT_SECS)
    } else {
        0.0
    };
    if dt == 0.0 {
        return state;
    }

    let stiffness = params.stiffness.max(MIN_PARAM);
    let mass = params.mass.max(MIN_PARAM);
    let damping = params.damping.max(0.0);

    let rate = (stiffness / mass).sqrt().max(damping / mass);
    let max_step = MAX_SUBSTEP_SECS.min(0.5 / rate);
    let steps = ((dt / max_step).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let h = dt / steps as f64;

    let mut value = state.value;
    let mut velocity = state.velocity;
    for _ in 0..steps {
        let spring_force = (target - value) * stiffness;
        let damping_force = velocity * -damping;
        let acceleration = (spring_force + damping_force) * (1.0 / mass);
        velocity = velocity + acceleration * h;
        value = value + velocity * h;
    }

    SpringState { value, velocity }
}

/// A spring-smoothed value following a raw target.
#[derive(Debug, Clone)]
pub struct SmoothedMotion<T> {
    state: SpringState<T>,
    target: T,
    params: SpringParams,
    settled: bool,
}

impl<T: Animatable> SmoothedMotion<T> {
    /// Start at rest at `initial`.
    pub fn new(initial: T, params: SpringParams) -> Self {
        Self {
            state: SpringState::at_rest(initial),
            target: initial,
            params,
            settled: true,
        }
    }

    /// The value a renderer should display.
    pub fn value(&self) -> T {
        self.state.value
    }

    pub fn velocity(&self) -> T {
        self.state.velocity
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    /// Whether the value rests on the target and ticks are no-ops.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Retarget the spring. The value keeps its current position and
    /// velocity. Non-finite targets are ignored.
    pub fn set_target(&mut self, target: T) {
        if !target.is_finite() {
            tracing::warn!("Ignoring non-finite spring target");
            return;
        }
        if target == self.target {
            return;
        }
        self.target = target;
        self.settled = false;
    }

    /// Place the value on `value` at rest, without animating.
    pub fn jump(&mut self, value: T) {
        if !value.is_finite() {
            tracing::warn!("Ignoring non-finite spring jump");
            return;
        }
        self.state = SpringState::at_rest(value);
        self.target = value;
        self.settled = true;
    }

    /// Swap parameters mid-flight. Position and velocity carry over.
    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params;
        if self.state.value != self.target {
            self.settled = false;
        }
    }

    /// Advance by one frame. Returns whether the displayed value changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.settled {
            return false;
        }

        let before = self.state.value;
        let next = integrate(self.state, self.target, dt, &self.params);

        let near = (self.target - next.value).magnitude() <= self.params.rest_delta;
        let slow = next.velocity.magnitude() <= self.params.rest_speed;
        if (near && slow) || !next.value.is_finite() || !next.velocity.is_finite() {
            self.state = SpringState::at_rest(self.target);
            self.settled = true;
        } else {
            self.state = next;
        }

        self.state.value != before
    }
}
