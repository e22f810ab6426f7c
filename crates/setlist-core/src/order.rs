#![forbid(unsafe_code)]

//! Hand-off from a committed order to the persistence layer.
//!
//! After a drop the host writes each item's position back to its remote
//! table as an `order` field. These helpers compute those writes as plain
//! data; nothing here performs I/O.

use std::collections::HashMap;
use std::hash::Hash;

/// New position for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderUpdate<Id> {
    pub id: Id,
    pub order: usize,
}

/// Position of every id in `ids`.
#[must_use]
pub fn full_order<Id: Clone>(ids: &[Id]) -> Vec<OrderUpdate<Id>> {
    ids.iter()
        .enumerate()
        .map(|(order, id)| OrderUpdate {
            id: id.clone(),
            order,
        })
        .collect()
}

/// Updates for the ids of `after` whose position differs from `before`.
///
/// Ids absent from `before` are always included. A single-element move
/// from `i` to `j` yields exactly `|i - j| + 1` updates.
#[must_use]
pub fn order_updates<Id: Clone + Eq + Hash>(before: &[Id], after: &[Id]) -> Vec<OrderUpdate<Id>> {
    let previous: HashMap<&Id, usize> = before.iter().enumerate().map(|(ix, id)| (id, ix)).collect();
    after
        .iter()
        .enumerate()
        .filter(|(ix, id)| previous.get(id) != Some(ix))
        .map(|(order, id)| OrderUpdate {
            id: id.clone(),
            order,
        })
        .collect()
}
