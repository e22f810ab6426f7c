#![forbid(unsafe_code)]

//! Springs that carry rows toward the targets the reorder engine computes.
//!
//! [`SlotAnimator`] keeps one [`Spring`] per slot for the displacement of
//! neighbours and one more for the lifted row, whose absolute top offset
//! follows the pointer during a drag and eases into its slot on drop.

use std::time::Duration;

use crate::animation::spring::presets;
use crate::animation::{Animation, Spring, SpringConfig};

/// Per-slot translation springs plus the lifted row's offset spring.
#[derive(Debug, Clone)]
pub struct SlotAnimator {
    displace: SpringConfig,
    settle: SpringConfig,
    slots: Vec<Spring>,
    lifted: Option<(usize, Spring)>,
}

impl Default for SlotAnimator {
    fn default() -> Self {
        Self::new(presets::displace(), presets::settle())
    }
}

impl SlotAnimator {
    /// Animator using `displace` for neighbours and `settle` for the drop.
    #[must_use]
    pub fn new(displace: SpringConfig, settle: SpringConfig) -> Self {
        Self {
            displace,
            settle,
            slots: Vec::new(),
            lifted: None,
        }
    }

    /// Match the number of slots in the list; new slots rest at zero.
    pub fn resize(&mut self, len: usize) {
        let config = self.displace;
        self.slots
            .resize_with(len, || Spring::resting(0.0).with_config(config));
        if self.lifted.as_ref().is_some_and(|(ix, _)| *ix >= len) {
            self.lifted = None;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Retarget every slot; missing entries are treated as `0.0`.
    pub fn set_targets(&mut self, translations: &[f64]) {
        for (ix, spring) in self.slots.iter_mut().enumerate() {
            spring.set_target(translations.get(ix).copied().unwrap_or(0.0));
        }
    }

    /// Pin the row at `index` to an absolute top offset under the pointer.
    pub fn lift(&mut self, index: usize, top: f64) {
        match self.lifted.as_mut() {
            Some((ix, spring)) if *ix == index => spring.snap_to(top),
            _ => {
                self.lifted = Some((index, Spring::resting(top).with_config(self.settle)));
            }
        }
    }

    /// Release the lifted row toward `resting_top`, the offset of the slot
    /// `index` it landed in.
    pub fn drop_to(&mut self, index: usize, resting_top: f64) {
        if let Some((ix, spring)) = self.lifted.as_mut() {
            *ix = index;
            spring.set_target(resting_top);
        }
    }

    /// Send every displaced slot back to zero.
    pub fn settle(&mut self) {
        for spring in &mut self.slots {
            spring.set_target(0.0);
        }
    }

    /// Zero every slot immediately, e.g. after the list was re-rendered in
    /// its committed order.
    pub fn snap_to_rest(&mut self) {
        for spring in &mut self.slots {
            spring.snap_to(0.0);
        }
    }

    /// Advance every spring by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        for spring in &mut self.slots {
            spring.tick(dt);
        }
        if let Some((_, spring)) = self.lifted.as_mut() {
            spring.tick(dt);
        }
    }

    /// Forget the lifted row. Hosts call this once the dropped row has
    /// settled and the list re-renders in committed order.
    pub fn release(&mut self) {
        self.lifted = None;
    }

    /// Displayed translation of slot `index`.
    #[must_use]
    pub fn translation(&self, index: usize) -> f64 {
        self.slots.get(index).map_or(0.0, Spring::position)
    }

    #[must_use]
    pub fn translations(&self) -> Vec<f64> {
        self.slots.iter().map(Spring::position).collect()
    }

    /// Index and displayed top offset of the lifted row.
    #[must_use]
    pub fn lifted(&self) -> Option<(usize, f64)> {
        self.lifted
            .as_ref()
            .map(|(ix, spring)| (*ix, spring.position()))
    }

    /// Whether every spring has settled.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.slots.iter().all(Spring::is_at_rest)
            && self.lifted.as_ref().is_none_or(|(_, s)| s.is_at_rest())
    }
}
