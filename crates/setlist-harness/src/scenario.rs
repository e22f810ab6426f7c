#![forbid(unsafe_code)]

//! Scripted drag scenarios and their deterministic replay.
//!
//! A scenario is a JSON document naming the rows of a list, their rendered
//! heights, and a timeline of pointer and keyboard input:
//!
//! ```json
//! {
//!   "name": "bench to the top",
//!   "items": ["squat", "deadlift", "bench"],
//!   "row_height": 56,
//!   "steps": [
//!     { "at_ms": 0,   "kind": "down", "y": 140 },
//!     { "at_ms": 40,  "kind": "move", "y": 60 },
//!     { "at_ms": 80,  "kind": "move", "y": 10 },
//!     { "at_ms": 120, "kind": "up",   "y": 10 }
//!   ]
//! }
//! ```
//!
//! Replay runs on a virtual clock. Between steps the list is ticked in
//! fixed 16 ms frames, so long presses fire and springs advance exactly as
//! they would on a 60 Hz display, independent of wall time. Step times
//! past [`MAX_STEP_MS`] are rejected so the frame loop stays bounded.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use setlist_core::{
    Event, Item, Move, OrderUpdate, PointerEvent, ReorderList, ReorderPolicy, order_updates,
};
use tracing::{debug, info};
use web_time::Instant;

use crate::error::{HarnessError, Result};

/// Frame period of the virtual clock.
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames spent letting springs settle after the last step.
const SETTLE_FRAME_LIMIT: usize = 600;

/// Latest step time a scenario may use (ten minutes of virtual time).
pub const MAX_STEP_MS: u64 = 10 * 60 * 1000;

fn default_row_height() -> f64 {
    48.0
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub items: Vec<String>,
    /// Per-row heights; rows without an entry use `row_height`.
    #[serde(default)]
    pub heights: Vec<f64>,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Milliseconds since the scenario started.
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Down {
        #[serde(default)]
        x: f64,
        y: f64,
    },
    Move {
        #[serde(default)]
        x: f64,
        y: f64,
    },
    Up {
        #[serde(default)]
        x: f64,
        y: f64,
    },
    /// The platform took the pointer away.
    Cancel,
    /// The app went to the background.
    Blur,
    /// Keyboard reorder of the row at `index`.
    Key { index: usize, delta: isize },
    /// Let frames pass without input.
    Wait,
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| HarnessError::ScenarioParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Height used for the row at `index`.
    #[must_use]
    pub fn height(&self, index: usize) -> f64 {
        self.heights.get(index).copied().unwrap_or(self.row_height)
    }

    /// Reject scenarios the replay cannot interpret unambiguously.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.items.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(HarnessError::invalid(format!("duplicate item id '{dup}'")));
        }
        if self.heights.len() > self.items.len() {
            return Err(HarnessError::invalid(format!(
                "heights has {} entries for {} items",
                self.heights.len(),
                self.items.len()
            )));
        }
        let mut all_heights = self.heights.iter().chain(std::iter::once(&self.row_height));
        if let Some(bad) = all_heights.find(|h| !(h.is_finite() && **h >= 0.0)) {
            return Err(HarnessError::invalid(format!(
                "row heights must be finite and >= 0, got {bad}"
            )));
        }
        if let Some(step) = self.steps.iter().find(|s| s.at_ms > MAX_STEP_MS) {
            return Err(HarnessError::invalid(format!(
                "step at {} ms is past the {MAX_STEP_MS} ms limit",
                step.at_ms
            )));
        }
        if let Some(pair) = self.steps.windows(2).find(|w| w[1].at_ms < w[0].at_ms) {
            return Err(HarnessError::invalid(format!(
                "steps go back in time: {} ms after {} ms",
                pair[1].at_ms, pair[0].at_ms
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    id: String,
}

impl Item for Row {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Outcome of replaying one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub name: Option<String>,
    pub initial: Vec<String>,
    pub order: Vec<String>,
    pub moves: Vec<Move<String>>,
    /// Writes the persistence layer needs for the final order.
    pub updates: Vec<OrderUpdate<String>>,
    pub frames: usize,
    /// Whether every row came to rest with no drag in flight.
    pub settled: bool,
}

/// Drive `scenario` through a [`ReorderList`] configured by `policy`.
pub fn replay(scenario: &Scenario, policy: &ReorderPolicy) -> Result<ReplayReport> {
    scenario.validate()?;

    let rows = scenario
        .items
        .iter()
        .map(|id| Row { id: id.clone() })
        .collect();
    let mut list = ReorderList::with_policy(rows, policy);
    for ix in 0..scenario.items.len() {
        list.record_height(ix, scenario.height(ix));
    }

    let start = Instant::now();
    let mut clock = Duration::ZERO;
    let mut frames = 0usize;
    let mut moves = Vec::new();

    for step in &scenario.steps {
        let at = Duration::from_millis(step.at_ms);
        while clock + FRAME <= at {
            clock += FRAME;
            frames += 1;
            moves.extend(list.tick(start + clock, FRAME));
        }

        let now = start + at;
        let moved = match step.action {
            Action::Down { x, y } => list.handle_event(&PointerEvent::down(x, y).into(), now),
            Action::Move { x, y } => list.handle_event(&PointerEvent::moved(x, y).into(), now),
            Action::Up { x, y } => list.handle_event(&PointerEvent::up(x, y).into(), now),
            Action::Cancel => list.handle_event(&PointerEvent::cancel().into(), now),
            Action::Blur => list.handle_event(&Event::Focus(false), now),
            Action::Key { index, delta } => list.move_by(index, delta),
            Action::Wait => None,
        };
        if let Some(m) = &moved {
            debug!(at_ms = step.at_ms, id = %m.id, from = m.from, to = m.to, "step committed");
        }
        moves.extend(moved);
    }

    let at_rest = |list: &ReorderList<Row>| {
        !list.is_dragging() && list.lifted().is_none() && list.animator().is_at_rest()
    };
    let mut settle_frames = 0;
    while !list.is_dragging() && !at_rest(&list) && settle_frames < SETTLE_FRAME_LIMIT {
        clock += FRAME;
        frames += 1;
        settle_frames += 1;
        moves.extend(list.tick(start + clock, FRAME));
    }

    let order = list.ids();
    let report = ReplayReport {
        name: scenario.name.clone(),
        updates: order_updates(&scenario.items, &order),
        initial: scenario.items.clone(),
        order,
        moves,
        frames,
        settled: at_rest(&list),
    };
    info!(
        moves = report.moves.len(),
        writes = report.updates.len(),
        frames,
        settled = report.settled,
        "scenario replayed"
    );
    Ok(report)
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "scenario: {name}")?;
        }
        writeln!(f, "order:    {}", self.order.join(", "))?;
        if self.moves.is_empty() {
            writeln!(f, "moves:    none")?;
        } else {
            writeln!(f, "moves:")?;
            for m in &self.moves {
                writeln!(f, "  {} {} -> {}", m.id, m.from, m.to)?;
            }
        }
        writeln!(f, "writes:   {}", self.updates.len())?;
        for u in &self.updates {
            writeln!(f, "  {} = {}", u.id, u.order)?;
        }
        let state = if self.settled { "settled" } else { "in motion" };
        write!(f, "frames:   {} ({state})", self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(json: &str) -> Scenario {
        serde_json::from_str(json).expect("scenario json")
    }

    #[test]
    fn steps_parse_with_default_x_and_time() {
        let s = scenario(
            r#"{ "items": ["a"], "steps": [
                { "kind": "down", "y": 5 },
                { "at_ms": 10, "kind": "key", "index": 0, "delta": 1 },
                { "at_ms": 20, "kind": "blur" }
            ] }"#,
        );
        assert_eq!(s.row_height, 48.0);
        assert_eq!(
            s.steps[0],
            Step {
                at_ms: 0,
                action: Action::Down { x: 0.0, y: 5.0 }
            }
        );
        assert_eq!(s.steps[1].action, Action::Key { index: 0, delta: 1 });
        assert_eq!(s.steps[2].action, Action::Blur);
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let parsed = serde_json::from_str::<Scenario>(r#"{ "items": [], "colour": "red" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_rejects_duplicates_and_time_travel() {
        let dup = scenario(r#"{ "items": ["a", "a"] }"#);
        assert!(dup.validate().is_err());

        let backwards = scenario(
            r#"{ "items": ["a"], "steps": [
                { "at_ms": 50, "kind": "wait" },
                { "at_ms": 10, "kind": "wait" }
            ] }"#,
        );
        let err = backwards.validate().expect_err("out of order");
        assert!(err.to_string().contains("back in time"));

        let heights = scenario(r#"{ "items": ["a"], "heights": [10, 20] }"#);
        assert!(heights.validate().is_err());

        let negative = scenario(r#"{ "items": ["a"], "row_height": -1 }"#);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn validate_caps_scenario_duration() {
        let endless = scenario(
            r#"{ "items": ["a"], "steps": [
                { "at_ms": 0, "kind": "wait" },
                { "at_ms": 18446744073709551615, "kind": "wait" }
            ] }"#,
        );
        let err = endless.validate().expect_err("beyond the limit");
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("limit"));
        assert!(replay(&endless, &ReorderPolicy::default()).is_err());

        let at_limit = scenario(&format!(
            r#"{{ "items": ["a"], "steps": [{{ "at_ms": {MAX_STEP_MS}, "kind": "wait" }}] }}"#
        ));
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn drag_to_top_reorders_and_settles() {
        let s = scenario(
            r#"{ "items": ["squat", "deadlift", "bench"], "row_height": 40, "steps": [
                { "at_ms": 0,   "kind": "down", "y": 100 },
                { "at_ms": 32,  "kind": "move", "y": 50 },
                { "at_ms": 64,  "kind": "move", "y": 10 },
                { "at_ms": 96,  "kind": "up",   "y": 10 }
            ] }"#,
        );
        let report = replay(&s, &ReorderPolicy::default()).expect("replay");
        assert_eq!(report.order, vec!["bench", "squat", "deadlift"]);
        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.moves[0].from, 2);
        assert_eq!(report.moves[0].to, 0);
        assert_eq!(report.updates.len(), 3);
        assert!(report.settled);
    }

    #[test]
    fn keyboard_steps_move_rows() {
        let s = scenario(
            r#"{ "items": ["a", "b", "c"], "steps": [
                { "kind": "key", "index": 0, "delta": 5 }
            ] }"#,
        );
        let report = replay(&s, &ReorderPolicy::default()).expect("replay");
        assert_eq!(report.order, vec!["b", "c", "a"]);
        assert_eq!(report.frames, 0);
    }

    #[test]
    fn unreleased_drag_is_reported_in_motion() {
        let s = scenario(
            r#"{ "items": ["a", "b"], "row_height": 40, "steps": [
                { "kind": "down", "y": 10 },
                { "at_ms": 16, "kind": "move", "y": 60 }
            ] }"#,
        );
        let report = replay(&s, &ReorderPolicy::default()).expect("replay");
        assert!(!report.settled);
        assert!(report.moves.is_empty());
        assert_eq!(report.order, vec!["a", "b"]);
    }

    #[test]
    fn text_report_lists_moves_and_writes() {
        let report = ReplayReport {
            name: Some("demo".into()),
            initial: vec!["a".into(), "b".into()],
            order: vec!["b".into(), "a".into()],
            moves: vec![Move {
                id: "a".into(),
                from: 0,
                to: 1,
            }],
            updates: vec![
                OrderUpdate {
                    id: "b".into(),
                    order: 0,
                },
                OrderUpdate {
                    id: "a".into(),
                    order: 1,
                },
            ],
            frames: 12,
            settled: true,
        };
        let text = report.to_string();
        assert!(text.starts_with("scenario: demo\n"));
        assert!(text.contains("  a 0 -> 1\n"));
        assert!(text.contains("writes:   2\n"));
        assert!(text.ends_with("frames:   12 (settled)"));
    }
}
