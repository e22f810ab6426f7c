#![forbid(unsafe_code)]

//! Drag-to-reorder state for a vertical list of items.
//!
//! [`ReorderState`] owns the canonical ordering of a list, the per-slot
//! layout metrics, and the transient [`DragSession`]. On every pointer
//! sample it recomputes which slot the dragged row overlaps and how far the
//! displaced neighbours must be translated; on drop it commits a single
//! element move and returns to idle.
//!
//! # State Machine
//!
//! ```text
//!            update_drag_position          update_drag_position
//!   Idle ─────────────────────────▶ Dragging ◀──────────────────┐
//!    ▲                                  │  └─────────────────────┘
//!    └──────── commit_reorder / cancel_drag
//! ```
//!
//! # Invariants
//!
//! 1. `session.translations.len() == items.len()` at all times.
//! 2. Idle means `active == None`, `target == None`, and every translation
//!    is `0.0`.
//! 3. The dragged slot's own translation is always `0.0`; its visual
//!    position follows the pointer, not the translation vector.
//! 4. A commit is a single-element relocation: the multiset of ids is
//!    unchanged and every other id keeps its relative order.
//! 5. `update_drag_position` is a pure function of `(index, pointer_y)` and
//!    the layout: repeating a call yields the same target and translations.
//!
//! # Failure Modes
//!
//! - Position updates with an out-of-range index clamp to the last slot.
//! - Commits with an out-of-range index only reset the session.
//! - Unmeasured slots (zero height) are never chosen as a target by the
//!   interval scan; once layout completes the result self-heals.

use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace, warn};

use crate::layout::LayoutTracker;
use crate::reactive::Observable;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// An element of a reorderable list, identified by a stable id.
pub trait Item {
    type Id: Clone + Eq + Hash + Debug + 'static;

    fn id(&self) -> Self::Id;
}

// ---------------------------------------------------------------------------
// Session / Move
// ---------------------------------------------------------------------------

/// Transient drag state published to the rendering layer.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragSession {
    /// Index of the row being dragged, `None` when idle.
    pub active: Option<usize>,
    /// Slot the dragged row currently previews into.
    pub target: Option<usize>,
    /// Per-slot vertical offset for displaced neighbours.
    pub translations: Vec<f64>,
}

impl DragSession {
    /// Idle session for a list of `len` rows.
    #[must_use]
    pub fn idle(len: usize) -> Self {
        Self {
            active: None,
            target: None,
            translations: vec![0.0; len],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Whether every translation is zero.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.translations.iter().all(|&t| t == 0.0)
    }
}

/// A committed single-element move.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move<Id> {
    pub id: Id,
    pub from: usize,
    pub to: usize,
}

// ---------------------------------------------------------------------------
// ReorderState
// ---------------------------------------------------------------------------

/// Reorder state manager, generic over the item type.
pub struct ReorderState<I: Item> {
    items: Vec<I>,
    layout: LayoutTracker,
    session: Observable<DragSession>,
    order: Observable<Vec<I::Id>>,
}

impl<I: Item + Debug> Debug for ReorderState<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderState")
            .field("items", &self.items)
            .field("layout", &self.layout)
            .field("session", &self.session)
            .finish()
    }
}

impl<I: Item> Default for ReorderState<I> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<I: Item> ReorderState<I> {
    /// Create an idle state over `items` with every slot unmeasured.
    #[must_use]
    pub fn new(items: Vec<I>) -> Self {
        let len = items.len();
        let ids = items.iter().map(Item::id).collect();
        Self {
            items,
            layout: LayoutTracker::with_len(len),
            session: Observable::new(DragSession::idle(len)),
            order: Observable::new(ids),
        }
    }

    /// Replace the list, e.g. after the upstream data source refreshes.
    ///
    /// An in-flight drag is abandoned. Heights of slots that still exist are
    /// kept; new slots start unmeasured.
    pub fn set_items(&mut self, items: Vec<I>) {
        if let Some(active) = self.active_index() {
            debug!(active, "list replaced during drag; abandoning session");
        }
        self.items = items;
        self.layout.resize(self.items.len());
        self.session.set(DragSession::idle(self.items.len()));
        self.publish_order();
    }

    /// Record the measured height of the row at `index`.
    ///
    /// Indices at or beyond the current item count are ignored.
    pub fn record_height(&mut self, index: usize, height: f64) {
        if index >= self.items.len() {
            warn!(
                index,
                len = self.items.len(),
                "ignoring height for a row outside the list"
            );
            return;
        }
        self.layout.record_height(index, height);
    }

    // --- accessors ---------------------------------------------------------

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids in their current order.
    #[must_use]
    pub fn ids(&self) -> Vec<I::Id> {
        self.items.iter().map(Item::id).collect()
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutTracker {
        &self.layout
    }

    /// Snapshot of the current drag session.
    #[must_use]
    pub fn session(&self) -> DragSession {
        self.session.get()
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.session.with(|s| s.active)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active_index().is_some()
    }

    #[must_use]
    pub fn translations(&self) -> Vec<f64> {
        self.session.with(|s| s.translations.clone())
    }

    /// Handle on the published drag session for subscribers.
    #[must_use]
    pub fn session_observable(&self) -> Observable<DragSession> {
        self.session.clone()
    }

    /// Handle on the published id order for subscribers.
    #[must_use]
    pub fn order_observable(&self) -> Observable<Vec<I::Id>> {
        self.order.clone()
    }

    // --- drag --------------------------------------------------------------

    /// Feed a pointer sample for the row at `index` whose top edge is at
    /// `pointer_y`. Returns the slot the row would land in if dropped now.
    ///
    /// Nothing is committed; call [`commit_reorder`](Self::commit_reorder)
    /// on drop.
    pub fn update_drag_position(&mut self, index: usize, pointer_y: f64) -> usize {
        let len = self.items.len();
        if len == 0 {
            return 0;
        }
        let index = if index >= len {
            warn!(index, len, "drag index out of range; clamping");
            len - 1
        } else {
            index
        };

        let target = self.resolve_target(index, pointer_y);
        let translations = self.translations_for(index, target);

        let previous = self.session.with(|s| s.target);
        if previous != Some(target) {
            trace!(index, target, pointer_y, "drag target changed");
        }

        self.session.set(DragSession {
            active: Some(index),
            target: Some(target),
            translations,
        });
        target
    }

    /// Apply the move `from → to` and return to idle.
    ///
    /// Returns `None` (after resetting the session) when the move is a no-op
    /// or either index is out of bounds.
    pub fn commit_reorder(&mut self, from: usize, to: usize) -> Option<Move<I::Id>> {
        let len = self.items.len();
        let applied = if from == to || from >= len || to >= len {
            if from != to {
                warn!(from, to, len, "commit out of range; resetting only");
            }
            None
        } else {
            let item = self.items.remove(from);
            let id = item.id();
            self.items.insert(to, item);
            debug!(?id, from, to, "committed reorder");
            Some(Move { id, from, to })
        };

        self.reset_session();
        if applied.is_some() {
            self.publish_order();
        }
        applied
    }

    /// Abandon the active drag; equivalent to dropping at the original index.
    pub fn cancel_drag(&mut self) {
        if let Some(active) = self.active_index() {
            self.commit_reorder(active, active);
        } else {
            self.reset_session();
        }
    }

    /// Move the row at `index` by `delta` slots, clamped to the list bounds.
    ///
    /// Used for keyboard and accessibility reordering where there is no
    /// pointer position to resolve.
    pub fn move_by(&mut self, index: usize, delta: isize) -> Option<Move<I::Id>> {
        let len = self.items.len();
        if index >= len {
            return None;
        }
        let to = index.saturating_add_signed(delta).min(len - 1);
        self.commit_reorder(index, to)
    }

    // --- internals ---------------------------------------------------------

    fn resolve_target(&self, index: usize, pointer_y: f64) -> usize {
        let len = self.items.len();
        let center = pointer_y + self.layout.height(index) / 2.0;

        let interior = (0..len).filter(|&ix| ix != index).find(|&ix| {
            self.layout.is_measured(ix)
                && self
                    .layout
                    .slot(ix)
                    .is_some_and(|slot| slot.contains(&center))
        });
        if let Some(target) = interior {
            return target;
        }

        if center < self.layout.offset(0) {
            0
        } else if center >= self.layout.total_height() {
            len - 1
        } else {
            index
        }
    }

    /// Neighbours move into the space the dragged row vacates: `+height`
    /// for slots `target..index` when moving up, `-height` for slots
    /// `index + 1..=target` when moving down.
    fn translations_for(&self, index: usize, target: usize) -> Vec<f64> {
        let mut translations = vec![0.0; self.items.len()];
        let height = self.layout.height(index);
        if target < index {
            for t in &mut translations[target..index] {
                *t = height;
            }
        } else if target > index {
            for t in &mut translations[index + 1..=target] {
                *t = -height;
            }
        }
        translations
    }

    fn reset_session(&mut self) {
        self.session.set(DragSession::idle(self.items.len()));
    }

    fn publish_order(&self) {
        self.order.set(self.ids());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str);

    impl Item for Row {
        type Id = &'static str;

        fn id(&self) -> Self::Id {
            self.0
        }
    }

    fn abcd() -> ReorderState<Row> {
        let mut state = ReorderState::new(vec![Row("A"), Row("B"), Row("C"), Row("D")]);
        for ix in 0..4 {
            state.record_height(ix, 40.0);
        }
        state
    }

    #[test]
    fn starts_idle() {
        let state = abcd();
        assert!(!state.is_dragging());
        assert_eq!(state.translations(), vec![0.0; 4]);
        assert_eq!(state.layout().offsets(), &[0.0, 40.0, 80.0, 120.0]);
    }

    #[test]
    fn drag_first_row_down_two_slots() {
        let mut state = abcd();
        let target = state.update_drag_position(0, 85.0);
        assert_eq!(target, 2);
        assert_eq!(state.active_index(), Some(0));
        assert_eq!(state.translations(), vec![0.0, -40.0, -40.0, 0.0]);

        let moved = state.commit_reorder(0, target);
        assert_eq!(
            moved,
            Some(Move {
                id: "A",
                from: 0,
                to: 2
            })
        );
        assert_eq!(state.ids(), vec!["B", "C", "A", "D"]);
        assert!(!state.is_dragging());
        assert_eq!(state.translations(), vec![0.0; 4]);
    }

    #[test]
    fn drag_last_row_to_top() {
        let mut state = abcd();
        let target = state.update_drag_position(3, 5.0);
        assert_eq!(target, 0);
        assert_eq!(state.translations(), vec![40.0, 40.0, 40.0, 0.0]);

        state.commit_reorder(3, target);
        assert_eq!(state.ids(), vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn center_inside_own_slot_keeps_index() {
        let mut state = abcd();
        assert_eq!(state.update_drag_position(1, 45.0), 1);
        assert_eq!(state.translations(), vec![0.0; 4]);
        assert_eq!(state.active_index(), Some(1));
    }

    #[test]
    fn above_first_slot_clamps_to_zero() {
        let mut state = abcd();
        assert_eq!(state.update_drag_position(2, -200.0), 0);
        assert_eq!(state.translations(), vec![40.0, 40.0, 0.0, 0.0]);
    }

    #[test]
    fn below_last_slot_clamps_to_last() {
        let mut state = abcd();
        assert_eq!(state.update_drag_position(1, 500.0), 3);
        assert_eq!(state.translations(), vec![0.0, 0.0, -40.0, -40.0]);
    }

    #[test]
    fn out_of_range_drag_index_clamps() {
        let mut state = abcd();
        assert_eq!(state.update_drag_position(9, 125.0), 3);
        assert_eq!(state.active_index(), Some(3));
    }

    #[test]
    fn unmeasured_slot_is_skipped() {
        let mut state = ReorderState::new(vec![Row("A"), Row("B"), Row("C")]);
        state.record_height(0, 40.0);
        state.record_height(2, 40.0);
        // Slot 1 is unmeasured; center 40 lands in slot 2's interval.
        assert_eq!(state.update_drag_position(0, 20.0), 2);
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut state = abcd();
        let first = state.update_drag_position(1, 90.0);
        let session = state.session();
        let second = state.update_drag_position(1, 90.0);
        assert_eq!(first, second);
        assert_eq!(session, state.session());
    }

    #[test]
    fn commit_same_index_resets_only() {
        let mut state = abcd();
        state.update_drag_position(2, 10.0);
        assert!(state.commit_reorder(2, 2).is_none());
        assert_eq!(state.ids(), vec!["A", "B", "C", "D"]);
        assert_eq!(state.session(), DragSession::idle(4));
    }

    #[test]
    fn commit_out_of_bounds_resets_only() {
        let mut state = abcd();
        state.update_drag_position(0, 85.0);
        assert!(state.commit_reorder(0, 4).is_none());
        assert!(state.commit_reorder(7, 1).is_none());
        assert_eq!(state.ids(), vec!["A", "B", "C", "D"]);
        assert!(!state.is_dragging());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut state = abcd();
        state.update_drag_position(0, 85.0);
        state.cancel_drag();
        assert_eq!(state.session(), DragSession::idle(4));
        assert_eq!(state.ids(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn heights_stay_with_slots_after_commit() {
        let mut state = ReorderState::new(vec![Row("A"), Row("B"), Row("C")]);
        state.record_height(0, 10.0);
        state.record_height(1, 20.0);
        state.record_height(2, 30.0);
        state.commit_reorder(0, 2);
        assert_eq!(state.layout().heights(), &[10.0, 20.0, 30.0]);
        assert_eq!(state.layout().offsets(), &[0.0, 10.0, 30.0]);
    }

    #[test]
    fn move_there_and_back_restores_order() {
        let ids = ["A", "B", "C", "D", "E", "F", "G"];
        let mut state = ReorderState::new(ids.iter().map(|&id| Row(id)).collect());
        state.commit_reorder(5, 2);
        assert_eq!(state.ids(), vec!["A", "B", "F", "C", "D", "E", "G"]);
        state.commit_reorder(2, 5);
        assert_eq!(state.ids(), ids.to_vec());
    }

    #[test]
    fn move_by_clamps_to_bounds() {
        let mut state = abcd();
        let moved = state.move_by(1, -5);
        assert_eq!(moved.map(|m| m.to), Some(0));
        assert_eq!(state.ids(), vec!["B", "A", "C", "D"]);

        assert!(state.move_by(3, 1).is_none());
        assert!(state.move_by(10, 1).is_none());
        state.move_by(0, 2);
        assert_eq!(state.ids(), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn record_height_outside_list_is_ignored() {
        let mut state = abcd();
        state.record_height(4, 99.0);
        assert_eq!(state.layout().len(), 4);
        assert_eq!(state.layout().total_height(), 160.0);
    }

    #[test]
    fn set_items_resets_session_and_resizes_layout() {
        let mut state = abcd();
        state.update_drag_position(0, 85.0);
        state.set_items(vec![Row("X"), Row("Y")]);
        assert_eq!(state.session(), DragSession::idle(2));
        assert_eq!(state.layout().heights(), &[40.0, 40.0]);
        assert_eq!(state.order_observable().get(), vec!["X", "Y"]);
    }

    #[test]
    fn empty_list_never_drags() {
        let mut state: ReorderState<Row> = ReorderState::default();
        assert_eq!(state.update_drag_position(0, 10.0), 0);
        assert!(!state.is_dragging());
        assert!(state.commit_reorder(0, 0).is_none());
    }

    #[test]
    fn observers_see_session_and_order_changes() {
        let mut state = abcd();
        let previews = Rc::new(Cell::new(0u32));
        let orders = Rc::new(Cell::new(0u32));
        let previews_clone = Rc::clone(&previews);
        let orders_clone = Rc::clone(&orders);
        let _s = state
            .session_observable()
            .subscribe(move |_| previews_clone.set(previews_clone.get() + 1));
        let _o = state
            .order_observable()
            .subscribe(move |_| orders_clone.set(orders_clone.get() + 1));

        state.update_drag_position(0, 85.0);
        state.update_drag_position(0, 85.0);
        assert_eq!(previews.get(), 1, "identical samples publish once");

        state.commit_reorder(0, 2);
        assert_eq!(previews.get(), 2);
        assert_eq!(orders.get(), 1);
        assert_eq!(state.order_observable().get(), vec!["B", "C", "A", "D"]);
    }
}
