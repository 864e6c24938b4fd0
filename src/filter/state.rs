use serde::{Deserialize, Serialize};

use crate::dataset::Record;

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The current selection for each filterable dimension.
///
/// Each field is a list of permitted values in selection order. An empty
/// list means unconstrained: the system never distinguishes "filtered to
/// zero explicit values" from "no filter" — both pass every record, which
/// is what makes de-selecting the last toggled value return the dashboard
/// to its unfiltered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub countries: Vec<String>,
    pub years: Vec<i32>,
    pub sectors: Vec<String>,
    pub subsectors: Vec<String>,
}

impl FilterState {
    /// True when no dimension carries a constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.countries.is_empty()
            && self.years.is_empty()
            && self.sectors.is_empty()
            && self.subsectors.is_empty()
    }

    /// Whether a record satisfies every active constraint (conjunctive AND
    /// across dimensions; an empty selection passes everything).
    pub fn matches(&self, record: &Record) -> bool {
        (self.countries.is_empty() || self.countries.contains(&record.country))
            && (self.years.is_empty() || self.years.contains(&record.year))
            && (self.sectors.is_empty() || self.sectors.contains(&record.sector))
            && (self.subsectors.is_empty() || self.subsectors.contains(&record.subsector))
    }

    /// The all-unconstrained state. Reset is a single atomic transition to
    /// this value, equivalent to starting a new session.
    pub fn reset() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
