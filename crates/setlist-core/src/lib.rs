#![forbid(unsafe_code)]

//! Setlist Core
//!
//! Drag-to-reorder engine for vertical lists of rows with variable heights,
//! such as the exercises of a workout.
//!
//! # Key Components
//!
//! - [`LayoutTracker`] - measured row heights and their prefix-sum offsets
//! - [`ReorderState`] - item order plus the in-flight [`DragSession`]
//! - [`GestureRecognizer`] - turns pointer input into drag gestures
//! - [`SlotAnimator`] - springs carrying rows to their computed translations
//! - [`ReorderList`] - the three above wired into one pipeline
//! - [`ReorderPolicy`] - thresholds and spring tuning as data
//!
//! # How it fits together
//! The host renders rows and reports their heights. While a row is dragged,
//! each pointer move resolves a target slot and a translation for every
//! other row. Releasing the pointer commits a single remove-and-insert move;
//! [`order_updates`] turns the new order into the writes the host persists.
//!
//! Observers subscribe to the session and order through
//! [`Observable`] handles instead of polling.

pub mod animation;
pub mod animator;
pub mod config;
pub mod controller;
pub mod event;
pub mod gesture;
pub mod layout;
pub mod order;
pub mod reactive;
pub mod reorder;

pub use animation::{Animation, Spring, SpringConfig};
pub use animator::SlotAnimator;
pub use config::{ConfigError, GesturePolicy, MotionPolicy, ReorderPolicy};
pub use controller::ReorderList;
pub use event::{Event, GestureEvent, Point, PointerEvent, PointerKind};
pub use gesture::{Activation, GestureConfig, GestureRecognizer};
pub use layout::LayoutTracker;
pub use order::{OrderUpdate, full_order, order_updates};
pub use reactive::{Observable, Subscription};
pub use reorder::{DragSession, Item, Move, ReorderState};
