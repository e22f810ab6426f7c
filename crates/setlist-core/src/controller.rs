#![forbid(unsafe_code)]

//! End-to-end drag pipeline for one list.
//!
//! [`ReorderList`] wires pointer input through the [`GestureRecognizer`]
//! into the [`ReorderState`], and hands the resulting targets to a
//! [`SlotAnimator`]:
//!
//! ```text
//!   PointerEvent ─▶ GestureRecognizer ─▶ ReorderState ─▶ SlotAnimator
//!                      DragStart/Move/End     target,        springs
//!                                             translations
//! ```
//!
//! The row under the pointer at drag start is resolved through the layout.
//! The distance between the pointer and the row's top edge is kept for the
//! whole drag so the row does not jump under the finger.

use std::time::Duration;

use tracing::{debug, trace};
use web_time::Instant;

use crate::animator::SlotAnimator;
use crate::config::ReorderPolicy;
use crate::event::{Event, GestureEvent};
use crate::gesture::GestureRecognizer;
use crate::reactive::Observable;
use crate::reorder::{DragSession, Item, Move, ReorderState};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    index: usize,
    /// Pointer y minus the row's top edge at drag start.
    offset: f64,
}

/// A reorderable list driven by raw pointer input.
pub struct ReorderList<I: Item> {
    state: ReorderState<I>,
    gestures: GestureRecognizer,
    animator: SlotAnimator,
    reduced_motion: bool,
    grab: Option<Grab>,
}

impl<I: Item> ReorderList<I> {
    /// List over `items` using the default policy.
    #[must_use]
    pub fn new(items: Vec<I>) -> Self {
        Self::with_policy(items, &ReorderPolicy::default())
    }

    #[must_use]
    pub fn with_policy(items: Vec<I>, policy: &ReorderPolicy) -> Self {
        let mut animator = SlotAnimator::new(policy.motion.displace, policy.motion.settle);
        animator.resize(items.len());
        Self {
            state: ReorderState::new(items),
            gestures: GestureRecognizer::new(policy.to_gesture_config()),
            animator,
            reduced_motion: policy.motion.reduced_motion,
            grab: None,
        }
    }

    // --- host inputs -------------------------------------------------------

    /// Replace the list contents. An in-flight drag is abandoned.
    pub fn set_items(&mut self, items: Vec<I>) {
        self.gestures.reset();
        self.grab = None;
        self.state.set_items(items);
        self.animator.resize(self.state.len());
        self.animator.snap_to_rest();
        self.animator.release();
    }

    /// Layout callback: the row at `index` rendered `height` tall.
    pub fn record_height(&mut self, index: usize, height: f64) {
        self.state.record_height(index, height);
    }

    /// Feed one input event; returns the committed move if it ended a drag.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Option<Move<I::Id>> {
        let gestures = self.gestures.process(event, now);
        self.apply_all(gestures)
    }

    /// Frame tick: fires pending long presses and advances the springs.
    pub fn tick(&mut self, now: Instant, dt: Duration) -> Option<Move<I::Id>> {
        let gestures = self.gestures.check_long_press(now);
        let moved = self.apply_all(gestures);
        self.animator.tick(dt);
        if self.grab.is_none() && self.animator.is_at_rest() {
            self.animator.release();
        }
        moved
    }

    /// Keyboard reorder of the row at `index` by `delta` slots.
    pub fn move_by(&mut self, index: usize, delta: isize) -> Option<Move<I::Id>> {
        if self.grab.is_some() {
            return None;
        }
        let moved = self.state.move_by(index, delta);
        if moved.is_some() {
            self.animator.snap_to_rest();
        }
        moved
    }

    // --- outputs -----------------------------------------------------------

    #[must_use]
    pub fn items(&self) -> &[I] {
        self.state.items()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<I::Id> {
        self.state.ids()
    }

    #[must_use]
    pub fn state(&self) -> &ReorderState<I> {
        &self.state
    }

    #[must_use]
    pub fn animator(&self) -> &SlotAnimator {
        &self.animator
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Displayed translation for the row at `index`.
    #[must_use]
    pub fn translation(&self, index: usize) -> f64 {
        self.animator.translation(index)
    }

    /// Index and displayed top offset of the row under the pointer.
    #[must_use]
    pub fn lifted(&self) -> Option<(usize, f64)> {
        self.animator.lifted()
    }

    #[must_use]
    pub fn session_observable(&self) -> Observable<DragSession> {
        self.state.session_observable()
    }

    #[must_use]
    pub fn order_observable(&self) -> Observable<Vec<I::Id>> {
        self.state.order_observable()
    }

    // --- gesture handling --------------------------------------------------

    fn apply_all(&mut self, gestures: Vec<GestureEvent>) -> Option<Move<I::Id>> {
        let mut moved = None;
        for gesture in gestures {
            if let Some(m) = self.apply(gesture) {
                moved = Some(m);
            }
        }
        moved
    }

    fn apply(&mut self, gesture: GestureEvent) -> Option<Move<I::Id>> {
        match gesture {
            GestureEvent::DragStart { origin } => {
                let Some(index) = self.state.layout().slot_at(origin.y) else {
                    trace!(y = origin.y, "drag started outside any row");
                    return None;
                };
                let top = self.state.layout().offset(index);
                self.grab = Some(Grab {
                    index,
                    offset: origin.y - top,
                });
                self.state.update_drag_position(index, top);
                self.animator.lift(index, top);
                debug!(index, "drag started");
                None
            }
            GestureEvent::DragMove { current, .. } => {
                let grab = self.grab?;
                let top = current.y - grab.offset;
                self.state.update_drag_position(grab.index, top);
                self.animator.lift(grab.index, top);
                self.animator.set_targets(&self.state.translations());
                None
            }
            GestureEvent::DragEnd { end, .. } => {
                let grab = self.grab.take()?;
                let target = self.state.update_drag_position(grab.index, end.y - grab.offset);
                let moved = self.state.commit_reorder(grab.index, target);
                let landing = if moved.is_some() { target } else { grab.index };
                self.land(landing, moved.is_some());
                moved
            }
            GestureEvent::DragCancel => {
                let grab = self.grab.take()?;
                debug!(index = grab.index, "drag cancelled");
                self.state.cancel_drag();
                self.land(grab.index, false);
                None
            }
            GestureEvent::Tap { .. } | GestureEvent::LongPress { .. } => None,
        }
    }

    /// Bring the dropped row to rest in slot `index`.
    ///
    /// After a committed move the neighbours are already rendered in their
    /// new slots, so their translations snap to zero; after a no-op drop
    /// they glide back.
    fn land(&mut self, index: usize, committed: bool) {
        if self.reduced_motion {
            self.animator.snap_to_rest();
            self.animator.release();
            return;
        }
        if committed {
            self.animator.snap_to_rest();
        } else {
            self.animator.settle();
        }
        self.animator.drop_to(index, self.state.layout().offset(index));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
