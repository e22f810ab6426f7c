#![forbid(unsafe_code)]

//! Damped harmonic oscillator used to ease rows toward their targets.
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! Positions are in the same unit as the layout (pixels). A spring whose
//! target moves mid-flight keeps its velocity, so a row that changes
//! direction during a drag does not snap.
//!
//! # Invariants
//!
//! 1. Stiffness is at least [`MIN_STIFFNESS`]; damping is never negative.
//! 2. A spring at rest does not move until its target changes, it receives
//!    an impulse, or it is reset.
//! 3. On coming to rest the position is snapped exactly onto the target.
//!
//! # Failure Modes
//!
//! - Large `dt` (a dropped frame) is subdivided into 4ms steps, so the
//!   integration stays stable at the cost of more work.
//! - Zero damping oscillates forever; `is_complete()` never becomes true.

use std::time::Duration;

use super::Animation;

/// Maximum integration step in seconds.
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta (pixels) below which the spring may rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Velocity (pixels/sec) below which the spring may rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.1;

/// Lower bound on stiffness.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Stiffness and damping pair, shared by every spring in a list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for SpringConfig {
    /// Slightly underdamped: rows settle with a barely visible bounce.
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
        }
    }
}

impl SpringConfig {
    /// Damping at which this stiffness converges without overshoot.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.max(MIN_STIFFNESS).sqrt()
    }
}

/// A damped spring moving `position` toward `target`.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring starting at `initial` heading for `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let config = SpringConfig::default();
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: config.stiffness,
            damping: config.damping,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: initial == target,
        }
    }

    /// Spring resting at `value`.
    #[must_use]
    pub fn resting(value: f64) -> Self {
        Self::new(value, value)
    }

    #[must_use]
    pub fn with_config(self, config: SpringConfig) -> Self {
        self.with_stiffness(config.stiffness)
            .with_damping(config.damping)
    }

    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Retarget the spring. Wakes it if the target actually moved.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Jump to `value` and rest there.
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Add `velocity_delta` to the current velocity.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    fn step(&mut self, dt: f64) {
        // Semi-implicit Euler: velocity first, then position from the new velocity.
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = self.initial == self.target;
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Spring tunings for list motion.
pub mod presets {
    use super::SpringConfig;

    /// Neighbours sliding out of the way of a dragged row.
    #[must_use]
    pub fn displace() -> SpringConfig {
        SpringConfig::default()
    }

    /// The dropped row easing into its slot. Critically damped so it never
    /// overshoots past the neighbours.
    #[must_use]
    pub fn settle() -> SpringConfig {
        let stiffness: f64 = 300.0;
        SpringConfig {
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
