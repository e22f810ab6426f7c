#![forbid(unsafe_code)]

//! Per-slot height bookkeeping and prefix-sum offsets.
//!
//! [`LayoutTracker`] records the rendered height of each slot as the host
//! measures it and keeps `offsets` as the running prefix sum of `heights`,
//! so a vertical pointer position can be mapped back to a slot index.
//!
//! # Invariants
//!
//! 1. `heights.len() == offsets.len()` at all times.
//! 2. `offsets[0] == 0.0` and `offsets[i] == offsets[i - 1] + heights[i - 1]`.
//! 3. Every stored height is finite and `>= 0.0`; unmeasured slots hold `0.0`.
//! 4. For all `i < j`: `offsets[i] + heights[i] <= offsets[j]` (slots never
//!    overlap).
//!
//! # Failure Modes
//!
//! - Negative, NaN or infinite heights are clamped to `0.0` and logged.
//! - Recording a height past the end grows the tracker; slots in between are
//!   treated as unmeasured.

use std::ops::Range;

use tracing::warn;

/// Height and prefix-sum offset bookkeeping for a vertical list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutTracker {
    heights: Vec<f64>,
    offsets: Vec<f64>,
}

impl LayoutTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with `len` unmeasured slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            heights: vec![0.0; len],
            offsets: vec![0.0; len],
        }
    }

    /// Create a tracker from already-measured heights.
    #[must_use]
    pub fn from_heights(heights: impl IntoIterator<Item = f64>) -> Self {
        let mut tracker = Self {
            heights: heights.into_iter().map(sanitize_height).collect(),
            offsets: Vec::new(),
        };
        tracker.recompute_offsets();
        tracker
    }

    /// Record the measured height of the slot at `index`.
    ///
    /// Idempotent: recording the same height twice leaves offsets unchanged.
    pub fn record_height(&mut self, index: usize, height: f64) {
        let sanitized = sanitize_height(height);
        if sanitized != height {
            warn!(index, height, "clamping invalid slot height to 0");
        }
        let height = sanitized;

        if index >= self.heights.len() {
            self.heights.resize(index + 1, 0.0);
        }
        if self.heights[index] == height && self.offsets.len() == self.heights.len() {
            return;
        }
        self.heights[index] = height;
        self.recompute_offsets();
    }

    /// Truncate or zero-extend to `len` slots.
    pub fn resize(&mut self, len: usize) {
        if len == self.heights.len() {
            return;
        }
        self.heights.resize(len, 0.0);
        self.recompute_offsets();
    }

    /// Number of tracked slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of slot `index`, `0.0` when unmeasured or out of range.
    #[inline]
    #[must_use]
    pub fn height(&self, index: usize) -> f64 {
        self.heights.get(index).copied().unwrap_or(0.0)
    }

    /// Top offset of slot `index`.
    ///
    /// Out-of-range indices resolve to the end of the list.
    #[inline]
    #[must_use]
    pub fn offset(&self, index: usize) -> f64 {
        self.offsets
            .get(index)
            .copied()
            .unwrap_or_else(|| self.total_height())
    }

    /// Whether a non-zero height has been recorded for `index`.
    #[inline]
    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.height(index) > 0.0
    }

    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Half-open vertical interval `[offset, offset + height)` of a slot.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<Range<f64>> {
        let height = *self.heights.get(index)?;
        let start = self.offsets[index];
        Some(start..start + height)
    }

    /// Sum of all recorded heights.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        match (self.offsets.last(), self.heights.last()) {
            (Some(offset), Some(height)) => offset + height,
            _ => 0.0,
        }
    }

    /// Index of the measured slot containing `y`, if any.
    ///
    /// Unmeasured (zero-height) slots are never hit.
    #[must_use]
    pub fn slot_at(&self, y: f64) -> Option<usize> {
        if !y.is_finite() || y < 0.0 || y >= self.total_height() {
            return None;
        }
        // Offsets are sorted; find the last slot starting at or before `y`.
        let upper = self.offsets.partition_point(|&offset| offset <= y);
        (0..upper)
            .rev()
            .find(|&ix| self.slot(ix).is_some_and(|slot| slot.contains(&y)))
    }

    fn recompute_offsets(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.heights.len());
        let mut running = 0.0;
        for &height in &self.heights {
            self.offsets.push(running);
            running += height;
        }
    }
}

fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() && height >= 0.0 {
        height
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
