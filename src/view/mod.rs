//! View recomputation — every derived artifact from (dataset, filter state).
//!
//! One interaction fans out to many outputs: summary metrics, the
//! per-country map aggregate, the top-10 bar ranking, the sector/subsector
//! treemap breakdown, the yearly trend series, and the table rows.
//! [`recompute`] derives all of them from scratch as a pure function —
//! nothing is cached or incrementally updated, and an empty filtered
//! subset degrades to zeros and empty collections rather than errors.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::dataset::{Dataset, Record};
use crate::filter::FilterState;

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Everything the render surfaces consume for one recomputation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedView {
    /// Sum of emissions over the filtered subset, rounded to 3 decimals.
    pub total_emissions: f64,
    /// Distinct countries in the filtered subset.
    pub country_count: usize,
    /// Total divided by country count, 3 decimals; 0 for an empty subset.
    pub avg_emissions: f64,
    /// Per-country totals in first-appearance order (map aggregate).
    pub country_totals: Vec<CountryTotal>,
    /// The ≤10 largest per-country totals, descending (bar aggregate).
    pub top_countries: Vec<CountryTotal>,
    /// Per-(sector, subsector) totals (treemap aggregate).
    pub sector_breakdown: Vec<SectorSlice>,
    /// Yearly trend series per the selection policy.
    pub trend: Vec<TrendSeries>,
    /// Filtered records sorted by emissions descending, 3 decimals.
    pub table_rows: Vec<Record>,
}

/// One country's summed emissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTotal {
    pub country: String,
    pub emissions: f64,
}

/// One (sector, subsector) cell of the treemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorSlice {
    pub sector: String,
    pub subsector: String,
    pub emissions: f64,
}

/// A named line on the trend chart: yearly totals, years ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub name: String,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub emissions: f64,
}

// ---------------------------------------------------------------------------
// Recomputation
// ---------------------------------------------------------------------------

/// How many countries the bar ranking shows.
const TOP_COUNTRIES: usize = 10;

/// Round to 3 decimal places — the display precision for emissions.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Derive the full view for the current filter state.
pub fn recompute(dataset: &Dataset, state: &FilterState) -> DerivedView {
    let filtered: Vec<&Record> = dataset
        .records
        .iter()
        .filter(|r| state.matches(r))
        .collect();

    let total: f64 = filtered.iter().map(|r| r.emissions).sum();
    let total_emissions = round3(total);

    let distinct: HashSet<&str> = filtered.iter().map(|r| r.country.as_str()).collect();
    let country_count = distinct.len();

    let avg_emissions = if country_count == 0 {
        0.0
    } else {
        round3(total_emissions / country_count as f64)
    };

    let country_totals = country_totals(&filtered);
    let top_countries = top_countries(&country_totals);
    let sector_breakdown = sector_breakdown(&filtered);
    let trend = trend_series(&filtered, &state.countries);
    let table_rows = table_rows(&filtered);

    DerivedView {
        total_emissions,
        country_count,
        avg_emissions,
        country_totals,
        top_countries,
        sector_breakdown,
        trend,
        table_rows,
    }
}

/// Group the subset by country and sum emissions, keeping first-appearance
/// order so downstream tie-breaking is stable against the input.
fn country_totals(filtered: &[&Record]) -> Vec<CountryTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();

    for record in filtered {
        if !sums.contains_key(&record.country) {
            order.push(record.country.clone());
        }
        *sums.entry(record.country.clone()).or_insert(0.0) += record.emissions;
    }

    order
        .into_iter()
        .map(|country| {
            let emissions = round3(sums[&country]);
            CountryTotal { country, emissions }
        })
        .collect()
}

/// The ≤10 largest per-country totals in descending order. The sort is
/// stable, so equal totals keep their first-appearance order.
fn top_countries(totals: &[CountryTotal]) -> Vec<CountryTotal> {
    let mut ranked = totals.to_vec();
    ranked.sort_by(|a, b| b.emissions.total_cmp(&a.emissions));
    ranked.truncate(TOP_COUNTRIES);
    ranked
}

/// Group by (sector, subsector) in first-appearance order.
fn sector_breakdown(filtered: &[&Record]) -> Vec<SectorSlice> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut sums: HashMap<(String, String), f64> = HashMap::new();

    for record in filtered {
        let key = (record.sector.clone(), record.subsector.clone());
        if !sums.contains_key(&key) {
            order.push(key.clone());
        }
        *sums.entry(key).or_insert(0.0) += record.emissions;
    }

    order
        .into_iter()
        .map(|key| {
            let emissions = round3(sums[&key]);
            SectorSlice {
                sector: key.0,
                subsector: key.1,
                emissions,
            }
        })
        .collect()
}

/// Build the trend series per the selection policy:
/// one selected country → that country alone; two or more → one series per
/// selected country present in the subset; none → a single global series.
fn trend_series(filtered: &[&Record], selected_countries: &[String]) -> Vec<TrendSeries> {
    match selected_countries {
        [] => {
            let points = yearly_totals(filtered.iter().copied());
            if points.is_empty() {
                Vec::new()
            } else {
                vec![TrendSeries {
                    name: "Global".to_string(),
                    points,
                }]
            }
        }
        countries => countries
            .iter()
            .filter_map(|country| {
                let points = yearly_totals(
                    filtered.iter().copied().filter(|r| &r.country == country),
                );
                if points.is_empty() {
                    None
                } else {
                    Some(TrendSeries {
                        name: country.clone(),
                        points,
                    })
                }
            })
            .collect(),
    }
}

/// Sum emissions per year, years ascending.
fn yearly_totals<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<TrendPoint> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        *by_year.entry(record.year).or_insert(0.0) += record.emissions;
    }

    by_year
        .into_iter()
        .map(|(year, emissions)| TrendPoint {
            year,
            emissions: round3(emissions),
        })
        .collect()
}

/// The filtered subset sorted by emissions descending (stable), with
/// emissions rounded for display.
fn table_rows(filtered: &[&Record]) -> Vec<Record> {
    let mut rows: Vec<Record> = filtered
        .iter()
        .map(|r| {
            let mut row = (*r).clone();
            row.emissions = round3(row.emissions);
            row
        })
        .collect();

    rows.sort_by(|a, b| b.emissions.total_cmp(&a.emissions));
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
