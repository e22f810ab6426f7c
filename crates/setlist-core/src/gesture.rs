#![forbid(unsafe_code)]

//! Drag recognition: turns raw pointer samples into drag gestures.
//!
//! [`GestureRecognizer`] is the drag gesture source feeding the reorder
//! engine. It watches down → move → up sequences and decides when a touch
//! becomes a drag, either once it travels past a distance threshold or once
//! it has been held still long enough (the usual mobile "press and hold to
//! reorder" interaction).
//!
//! # State Machine
//!
//! ```text
//!  Idle ──down──▶ Pressed ──(threshold | long press)──▶ Dragging
//!   ▲               │ up → Tap                            │ move → DragMove
//!   │               │ move past slop (long-press mode)    │ up → DragEnd
//!   └───────────────┴─────────────────────────────────────┘ cancel → DragCancel
//! ```
//!
//! # Invariants
//!
//! 1. Drag and Tap never both emit for the same down → up interaction.
//! 2. Every `DragStart` is eventually followed by exactly one `DragEnd` or
//!    `DragCancel`, provided the host keeps delivering input.
//! 3. After `reset()` the recognizer is idle.
//!
//! # Failure Modes
//!
//! - A `Move` or `Up` without a preceding `Down` is ignored.
//! - A `Down` during a drag (the release was lost) emits `DragCancel` for
//!   the open drag before arming a new one.
//! - If the app loses focus mid-drag, `DragCancel` is emitted.

use std::time::Duration;

use tracing::trace;
use web_time::Instant;

use crate::event::{Event, GestureEvent, Point, PointerEvent, PointerKind};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How a press turns into a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Activation {
    /// Drag as soon as the pointer travels `drag_threshold`.
    #[default]
    Threshold,
    /// Drag only after a long press; earlier movement is treated as a scroll.
    LongPress,
}

/// Thresholds for drag recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    pub activation: Activation,
    /// Travel distance that starts a drag, or cancels a pending long press
    /// (default: 8.0).
    pub drag_threshold: f64,
    /// Hold time before a stationary press counts as a long press
    /// (default: 300ms).
    pub long_press_threshold: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            activation: Activation::Threshold,
            drag_threshold: 8.0,
            long_press_threshold: Duration::from_millis(300),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct DragTracker {
    origin: Point,
    last_pos: Point,
    started: bool,
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Stateful drag recognizer.
///
/// Call [`process`](GestureRecognizer::process) for every input event and
/// [`check_long_press`](GestureRecognizer::check_long_press) on every frame
/// tick.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    drag: Option<DragTracker>,
    long_press: Option<(Point, Instant)>,
    long_press_fired: bool,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            drag: None,
            long_press: None,
            long_press_fired: false,
        }
    }

    /// Process one input event, returning the gestures it produced.
    pub fn process(&mut self, event: &Event, now: Instant) -> Vec<GestureEvent> {
        let mut out = Vec::with_capacity(2);
        match *event {
            Event::Pointer(PointerEvent { kind, pos }) => match kind {
                PointerKind::Down => self.on_down(pos, now, &mut out),
                PointerKind::Move => self.on_move(pos, &mut out),
                PointerKind::Up => self.on_up(pos, &mut out),
                PointerKind::Cancel => self.abandon(&mut out),
            },
            Event::Focus(false) => self.abandon(&mut out),
            Event::Focus(true) => {}
        }
        out
    }

    /// Fire a pending long press if the hold threshold has elapsed.
    ///
    /// In [`Activation::LongPress`] mode this also starts the drag.
    pub fn check_long_press(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        if self.long_press_fired {
            return out;
        }
        let Some((pos, down_at)) = self.long_press else {
            return out;
        };
        let held = now.saturating_duration_since(down_at);
        if held < self.config.long_press_threshold {
            return out;
        }

        self.long_press_fired = true;
        out.push(GestureEvent::LongPress { pos, duration: held });

        if self.config.activation == Activation::LongPress
            && let Some(drag) = self.drag.as_mut()
            && !drag.started
        {
            drag.started = true;
            drag.origin = drag.last_pos;
            trace!(y = drag.origin.y, "drag started by long press");
            out.push(GestureEvent::DragStart {
                origin: drag.origin,
            });
        }
        out
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.started)
    }

    /// Whether a pointer is down (pressed or dragging).
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.drag.is_some()
    }

    /// Drop all state without emitting anything.
    pub fn reset(&mut self) {
        self.drag = None;
        self.long_press = None;
        self.long_press_fired = false;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn on_down(&mut self, pos: Point, now: Instant, out: &mut Vec<GestureEvent>) {
        // A lost release must not leave the previous drag open.
        self.abandon(out);
        self.drag = Some(DragTracker {
            origin: pos,
            last_pos: pos,
            started: false,
        });
        self.long_press = Some((pos, now));
        self.long_press_fired = false;
    }

    fn on_move(&mut self, pos: Point, out: &mut Vec<GestureEvent>) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        if !drag.started {
            if drag.origin.distance(pos) < self.config.drag_threshold {
                drag.last_pos = pos;
                return;
            }
            self.long_press = None;
            match self.config.activation {
                Activation::Threshold => {
                    drag.started = true;
                    trace!(y = drag.origin.y, "drag started by travel");
                    out.push(GestureEvent::DragStart {
                        origin: drag.origin,
                    });
                }
                Activation::LongPress => {
                    // Travelled before the hold completed: this touch scrolls.
                    self.drag = None;
                    return;
                }
            }
        }

        let delta = (pos.x - drag.last_pos.x, pos.y - drag.last_pos.y);
        out.push(GestureEvent::DragMove {
            origin: drag.origin,
            current: pos,
            delta,
        });
        drag.last_pos = pos;
    }

    fn on_up(&mut self, pos: Point, out: &mut Vec<GestureEvent>) {
        let fired = self.long_press_fired;
        self.long_press = None;
        self.long_press_fired = false;

        let Some(drag) = self.drag.take() else {
            return;
        };
        if drag.started {
            out.push(GestureEvent::DragEnd {
                origin: drag.origin,
                end: pos,
            });
        } else if !fired {
            out.push(GestureEvent::Tap { pos });
        }
    }

    fn abandon(&mut self, out: &mut Vec<GestureEvent>) {
        if let Some(drag) = self.drag.take()
            && drag.started
        {
            out.push(GestureEvent::DragCancel);
        }
        self.long_press = None;
        self.long_press_fired = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
