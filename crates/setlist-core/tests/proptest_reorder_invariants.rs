//! Property-based invariant tests for the layout tracker and reorder state.
//!
//! 1. Offsets are the exclusive prefix sum of heights.
//! 2. The translation vector always matches the item count.
//! 3. The dragged slot is never translated.
//! 4. Only slots between the dragged index and the target move, by exactly
//!    the dragged row's height.
//! 5. Position updates are idempotent.
//! 6. The target is monotone in the pointer position.
//! 7. A commit is a single remove-and-insert.
//! 8. Committing `i → j` then `j → i` restores the order.
//! 9. A single move needs exactly `|i - j| + 1` order writes.
//! 10. No panics on arbitrary operation sequences.

use proptest::prelude::*;
use setlist_core::{Item, LayoutTracker, ReorderState, order_updates};

#[derive(Debug, Clone, PartialEq)]
struct Tag(u32);

impl Item for Tag {
    type Id = u32;

    fn id(&self) -> u32 {
        self.0
    }
}

// ── Strategies ────────────────────────────────────────────────────────────

fn heights_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec((1u32..=200).prop_map(f64::from), 1..=12)
}

fn measured(heights: &[f64]) -> ReorderState<Tag> {
    let items = (0..heights.len() as u32).map(Tag).collect();
    let mut state = ReorderState::new(items);
    for (ix, &h) in heights.iter().enumerate() {
        state.record_height(ix, h);
    }
    state
}

#[derive(Debug, Clone)]
enum Op {
    Height(usize, f64),
    Drag(usize, f64),
    Commit(usize, usize),
    Cancel,
    MoveBy(usize, isize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..16, prop_oneof![-50.0f64..300.0, Just(f64::NAN), Just(f64::INFINITY)])
            .prop_map(|(ix, h)| Op::Height(ix, h)),
        (0usize..16, -500.0f64..2500.0).prop_map(|(ix, y)| Op::Drag(ix, y)),
        (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Commit(a, b)),
        Just(Op::Cancel),
        (0usize..16, -5isize..=5).prop_map(|(ix, d)| Op::MoveBy(ix, d)),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Offsets are the exclusive prefix sum of heights
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offsets_are_prefix_sums(heights in heights_strategy()) {
        let layout = LayoutTracker::from_heights(heights.iter().copied());
        let mut running = 0.0;
        for (ix, &h) in heights.iter().enumerate() {
            prop_assert_eq!(layout.offset(ix), running);
            running += h;
        }
        prop_assert_eq!(layout.total_height(), running);
        prop_assert!(layout.offsets().windows(2).all(|w| w[0] <= w[1]));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2–4. Shape of the translation vector
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn translations_shift_exactly_the_crossed_slots(
        heights in heights_strategy(),
        pick in any::<prop::sample::Index>(),
        y in -500.0f64..3000.0,
    ) {
        let mut state = measured(&heights);
        let index = pick.index(heights.len());
        let target = state.update_drag_position(index, y);
        let translations = state.translations();

        prop_assert!(target < heights.len());
        prop_assert_eq!(translations.len(), heights.len());
        prop_assert_eq!(translations[index], 0.0);

        let h = heights[index];
        for (ix, &t) in translations.iter().enumerate() {
            let expected = if target > index && ix > index && ix <= target {
                -h
            } else if target < index && ix >= target && ix < index {
                h
            } else {
                0.0
            };
            prop_assert_eq!(t, expected, "slot {} (index {}, target {})", ix, index, target);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_updates_are_idempotent(
        heights in heights_strategy(),
        pick in any::<prop::sample::Index>(),
        y in -500.0f64..3000.0,
    ) {
        let mut state = measured(&heights);
        let index = pick.index(heights.len());
        let first = state.update_drag_position(index, y);
        let session = state.session();
        let second = state.update_drag_position(index, y);
        prop_assert_eq!(first, second);
        prop_assert_eq!(session, state.session());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Monotone target
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn target_never_moves_backwards_as_pointer_descends(
        heights in heights_strategy(),
        pick in any::<prop::sample::Index>(),
        mut ys in proptest::collection::vec(-500.0f64..3000.0, 2..20),
    ) {
        let mut state = measured(&heights);
        let index = pick.index(heights.len());
        ys.sort_by(f64::total_cmp);
        let targets: Vec<usize> = ys.iter().map(|&y| state.update_drag_position(index, y)).collect();
        prop_assert!(
            targets.windows(2).all(|w| w[0] <= w[1]),
            "targets {:?} for ys {:?}",
            targets,
            ys
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7–9. Commit semantics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn commit_is_single_remove_insert(
        heights in heights_strategy(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let mut state = measured(&heights);
        let (from, to) = (a.index(heights.len()), b.index(heights.len()));
        let before = state.ids();

        let mut expected = before.clone();
        let id = expected.remove(from);
        expected.insert(to, id);

        let moved = state.commit_reorder(from, to);
        prop_assert_eq!(state.ids(), expected);
        prop_assert_eq!(moved.is_some(), from != to);
        prop_assert!(!state.is_dragging());
        prop_assert!(state.session().is_at_rest());

        let mut sorted = state.ids();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, before);
    }

    #[test]
    fn commit_then_reverse_restores_order(
        heights in heights_strategy(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let mut state = measured(&heights);
        let (from, to) = (a.index(heights.len()), b.index(heights.len()));
        let before = state.ids();
        state.commit_reorder(from, to);
        state.commit_reorder(to, from);
        prop_assert_eq!(state.ids(), before);
    }

    #[test]
    fn single_move_writes_the_shifted_span(
        heights in heights_strategy(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let mut state = measured(&heights);
        let (from, to) = (a.index(heights.len()), b.index(heights.len()));
        prop_assume!(from != to);
        let before = state.ids();
        state.commit_reorder(from, to);
        let updates = order_updates(&before, &state.ids());
        prop_assert_eq!(updates.len(), from.abs_diff(to) + 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. No panics on arbitrary sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_operations_keep_invariants(
        len in 0usize..10,
        ops in proptest::collection::vec(op_strategy(), 0..60),
    ) {
        let mut state = ReorderState::new((0..len as u32).map(Tag).collect());
        for op in ops {
            match op {
                Op::Height(ix, h) => state.record_height(ix, h),
                Op::Drag(ix, y) => {
                    let target = state.update_drag_position(ix, y);
                    prop_assert!(len == 0 || target < len);
                }
                Op::Commit(a, b) => {
                    state.commit_reorder(a, b);
                }
                Op::Cancel => state.cancel_drag(),
                Op::MoveBy(ix, d) => {
                    state.move_by(ix, d);
                }
            }
            let session = state.session();
            prop_assert_eq!(session.translations.len(), len);
            prop_assert!(session.translations.iter().all(|t| t.is_finite()));
            prop_assert!(state.layout().heights().iter().all(|h| h.is_finite() && *h >= 0.0));
            if !session.is_dragging() {
                prop_assert!(session.is_at_rest());
            }
        }
        let mut ids = state.ids();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..len as u32).collect::<Vec<_>>());
    }
}
