//! Filter state and click reconciliation.
//!
//! [`FilterState`] is the current selection for the four dimensions;
//! [`reconcile`] turns a chart click into a new state (or a no-op). Both
//! are pure value transitions — nothing here mutates shared memory, which
//! keeps the whole reconciliation cycle testable without a UI harness.

mod reconcile;
mod state;

pub use reconcile::{ClickEvent, ClickSource, reconcile};
pub use state::FilterState;
