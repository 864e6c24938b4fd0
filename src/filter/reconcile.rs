//! Chart-click reconciliation — toggling one value in one dimension.
//!
//! Every chart click is a toggle: clicking a mark selects its value,
//! clicking it again de-selects it and returns the selection to its prior
//! state. Map and bar clicks target the country dimension; treemap clicks
//! target the sector dimension. Year and subsector have no click-driven
//! update path — they change only through their dropdown controls.

use serde::{Deserialize, Serialize};

use super::FilterState;

// ---------------------------------------------------------------------------
// Click event payload
// ---------------------------------------------------------------------------

/// Which chart produced a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickSource {
    Map,
    Bar,
    Treemap,
}

/// A pointer-interaction payload from one of the chart panels.
///
/// `value` carries the clicked location or label. Treemap marks are
/// hierarchical, so the payload may instead carry a `path` identifier
/// (`"Sector/Subsector"`) or a `text` field depending on which part of the
/// mark was hit; see [`treemap_sector`] for the fallback order.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickEvent {
    pub source: ClickSource,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Apply a chart click to the current filter state.
///
/// Returns `None` when the click resolves to nothing (missing or empty
/// value) — the caller must treat that as "no change" and skip
/// recomputation, which is distinct from a change that leaves a selection
/// empty. Returns `Some(new_state)` otherwise; the input state is never
/// modified, so a failed interaction can never leave it partially updated.
pub fn reconcile(state: &FilterState, event: &ClickEvent) -> Option<FilterState> {
    match event.source {
        ClickSource::Map | ClickSource::Bar => {
            let country = non_empty(event.value.as_deref())?;
            let mut next = state.clone();
            toggle(&mut next.countries, country);
            Some(next)
        }
        ClickSource::Treemap => {
            let sector = treemap_sector(event)?;
            let mut next = state.clone();
            toggle(&mut next.sectors, sector);
            Some(next)
        }
    }
}

/// Extract the sector from a treemap click, in fallback order: the first
/// segment of the hierarchical `path` identifier, then the `value` label,
/// then the `text` field. A click that carries none of these is a no-op.
fn treemap_sector(event: &ClickEvent) -> Option<&str> {
    if let Some(path) = non_empty(event.path.as_deref()) {
        let first = path.split('/').next().unwrap_or(path);
        return non_empty(Some(first));
    }
    if let Some(label) = non_empty(event.value.as_deref()) {
        return Some(label);
    }
    non_empty(event.text.as_deref())
}

/// Toggle membership of `value` in a selection list: remove it if present,
/// append it otherwise.
fn toggle(selection: &mut Vec<String>, value: &str) {
    if let Some(pos) = selection.iter().position(|v| v == value) {
        selection.remove(pos);
    } else {
        selection.push(value.to_string());
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
