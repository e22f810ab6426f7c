#![forbid(unsafe_code)]

//! Time-driven interpolation toward target values.
//!
//! The reorder engine only ever computes *targets* (translations, resting
//! offsets). Everything in this module moves a displayed value toward such a
//! target over time; the host calls `tick` once per frame.

pub mod spring;

use std::time::Duration;

pub use spring::{Spring, SpringConfig};

/// A value that advances toward a goal as time passes.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;

    /// Current displayed value.
    fn value(&self) -> f64;

    /// Return to the initial state.
    fn reset(&mut self);
}
