#![forbid(unsafe_code)]

//! Policy-as-data configuration for the reorder pipeline.
//!
//! Every tunable of the gesture recognizer and the slot animator is
//! captured in one [`ReorderPolicy`] that can be loaded from TOML or JSON at
//! startup.
//!
//! ```toml
//! # setlist-policy.toml
//! [gesture]
//! activation = "long_press"
//! long_press_ms = 250
//!
//! [motion.settle]
//! stiffness = 300.0
//! damping = 34.6
//! ```
//!
//! # Defaults
//!
//! `ReorderPolicy::default()` reproduces the built-in defaults of
//! [`GestureConfig`] and the spring presets exactly.

#[cfg(feature = "config")]
use std::path::Path;

use std::time::Duration;

use crate::animation::SpringConfig;
use crate::animation::spring::presets;
use crate::gesture::{Activation, GestureConfig};

// ---------------------------------------------------------------------------
// ReorderPolicy
// ---------------------------------------------------------------------------

/// Top-level configuration for a reorderable list.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReorderPolicy {
    pub gesture: GesturePolicy,
    pub motion: MotionPolicy,
}

/// Drag recognition thresholds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GesturePolicy {
    pub activation: Activation,
    pub drag_threshold: f64,
    pub long_press_ms: u64,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        let defaults = GestureConfig::default();
        Self {
            activation: defaults.activation,
            drag_threshold: defaults.drag_threshold,
            long_press_ms: defaults.long_press_threshold.as_millis() as u64,
        }
    }
}

/// Spring tuning for displaced neighbours and the dropped row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionPolicy {
    pub displace: SpringConfig,
    pub settle: SpringConfig,
    /// Snap rows into place instead of animating them.
    pub reduced_motion: bool,
}

impl Default for MotionPolicy {
    fn default() -> Self {
        Self {
            displace: presets::displace(),
            settle: presets::settle(),
            reduced_motion: false,
        }
    }
}

impl ReorderPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a file, picking the format by extension (`.json`, else TOML).
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let policy = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        policy.validated()
    }

    /// Check every parameter is within range.
    ///
    /// An empty list means the policy is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.gesture.drag_threshold.is_finite() && self.gesture.drag_threshold >= 0.0) {
            errors.push(format!(
                "gesture.drag_threshold must be >= 0, got {}",
                self.gesture.drag_threshold
            ));
        }
        if self.gesture.activation == Activation::LongPress && self.gesture.long_press_ms == 0 {
            errors.push("gesture.long_press_ms must be > 0 with long_press activation".into());
        }

        for (name, spring) in [
            ("motion.displace", self.motion.displace),
            ("motion.settle", self.motion.settle),
        ] {
            if !(spring.stiffness.is_finite() && spring.stiffness > 0.0) {
                errors.push(format!(
                    "{name}.stiffness must be > 0, got {}",
                    spring.stiffness
                ));
            }
            if !(spring.damping.is_finite() && spring.damping > 0.0) {
                errors.push(format!("{name}.damping must be > 0, got {}", spring.damping));
            }
        }

        errors
    }

    /// `self` if it validates, otherwise the collected errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build a [`GestureConfig`] from this policy.
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            activation: self.gesture.activation,
            drag_threshold: self.gesture.drag_threshold,
            long_press_threshold: Duration::from_millis(self.gesture.long_press_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error loading or validating a [`ReorderPolicy`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Out-of-range parameters.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
