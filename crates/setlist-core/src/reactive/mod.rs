//! Change notification for state published to the rendering layer.

pub mod observable;

pub use observable::{Observable, Subscription};
