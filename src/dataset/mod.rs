//! Dataset loader — CSV ingestion, header normalization, and the immutable
//! in-memory emissions table.
//!
//! The source is a tabular CSV with at least the columns Country, Year,
//! Sector, Subsector, and Emissions (in billions of tons CO₂e). Legacy
//! exports carry variant headers and deprecated columns; those are mapped
//! or dropped here so the rest of the system only ever sees canonical
//! records. Rows for known-bad years (2025 by default) never enter the
//! dataset.
//!
//! Load failures are fatal: they are surfaced once at startup and the
//! process does not start. Nothing downstream has to handle a partially
//! loaded table.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::schema::DataConfig;

// ---------------------------------------------------------------------------
// Record and Dataset
// ---------------------------------------------------------------------------

/// One (Country, Year, Sector, Subsector, Emissions) observation.
///
/// Emissions are denominated in billions of tons CO₂e and are non-negative;
/// the loader rejects rows that violate this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub country: String,
    pub year: i32,
    pub sector: String,
    pub subsector: String,
    pub emissions: f64,
}

/// The cleaned emissions table, immutable after load.
///
/// Alongside the records, the sorted distinct values of the four filterable
/// dimensions are precomputed once — they populate the dashboard's filter
/// controls and never change for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub countries: Vec<String>,
    pub years: Vec<i32>,
    pub sectors: Vec<String>,
    pub subsectors: Vec<String>,
}

impl Dataset {
    /// Build a dataset from already-cleaned records, deriving the distinct
    /// dimension values.
    pub fn from_records(records: Vec<Record>) -> Self {
        let countries: BTreeSet<String> =
            records.iter().map(|r| r.country.clone()).collect();
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let sectors: BTreeSet<String> =
            records.iter().map(|r| r.sector.clone()).collect();
        let subsectors: BTreeSet<String> =
            records.iter().map(|r| r.subsector.clone()).collect();

        Self {
            records,
            countries: countries.into_iter().collect(),
            years: years.into_iter().collect(),
            sectors: sectors.into_iter().collect(),
            subsectors: subsectors.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Header normalization
// ---------------------------------------------------------------------------

/// Columns the loader requires after normalization.
const REQUIRED_COLUMNS: [&str; 5] = ["Country", "Year", "Sector", "Subsector", "Emissions"];

/// Columns from older exports that carry no usable data and are dropped.
const DEPRECATED_COLUMNS: [&str; 3] = ["sector", "subsector", "co2e_100yr_emissions_quantity"];

/// Map a legacy header variant to its canonical name.
///
/// `Emissions in billions` maps to `Emissions`; when both appear in one
/// file the billions column wins (see [`resolve_columns`]).
fn canonical_header(raw: &str) -> &str {
    match raw.trim() {
        "Sector (Capital)" => "Sector",
        "Subsector(Capital)" => "Subsector",
        "Emissions in billions" => "Emissions",
        other => other,
    }
}

/// Per-required-column source index into the raw CSV row.
#[derive(Debug)]
struct ColumnMap {
    country: usize,
    year: usize,
    sector: usize,
    subsector: usize,
    emissions: usize,
}

/// Resolve the raw header row into canonical column indexes.
///
/// Deprecated columns are ignored. If both a raw `Emissions` column and an
/// `Emissions in billions` column exist, the billions column is used and
/// the raw one is dropped. A missing required column is a fatal error.
fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnMap> {
    let mut indexes: [Option<usize>; 5] = [None; 5];
    let mut raw_emissions: Option<usize> = None;

    for (i, raw) in headers.iter().enumerate() {
        let trimmed = raw.trim();
        if DEPRECATED_COLUMNS.contains(&trimmed) {
            continue;
        }

        // Remember the raw Emissions column separately so the billions
        // variant can take precedence regardless of header order.
        if trimmed == "Emissions" {
            raw_emissions = Some(i);
            continue;
        }

        let name = canonical_header(trimmed);
        if let Some(slot) = REQUIRED_COLUMNS.iter().position(|&c| c == name) {
            indexes[slot] = Some(i);
        }
    }

    if indexes[4].is_none() {
        indexes[4] = raw_emissions;
    }

    let take = |slot: usize| -> Result<usize> {
        indexes[slot]
            .with_context(|| format!("missing required column: {}", REQUIRED_COLUMNS[slot]))
    };

    Ok(ColumnMap {
        country: take(0)?,
        year: take(1)?,
        sector: take(2)?,
        subsector: take(3)?,
        emissions: take(4)?,
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the dataset from the configured CSV path.
pub fn load(cfg: &DataConfig) -> Result<Dataset> {
    let file = File::open(&cfg.path)
        .with_context(|| format!("failed to open data file: {}", cfg.path))?;
    from_reader(file, &cfg.excluded_years)
        .with_context(|| format!("failed to load data file: {}", cfg.path))
}

/// Parse a CSV source into a cleaned [`Dataset`].
///
/// Rows whose year is in `excluded_years` are skipped. Unparseable or
/// negative values are errors — a bad source file should fail loudly at
/// startup rather than silently skew aggregates.
pub fn from_reader<R: Read>(reader: R, excluded_years: &[i32]) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("failed to read CSV header row")?;
    let columns = resolve_columns(headers)?;

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        // Header is line 1; data starts at line 2.
        let line = i + 2;
        let row = row.with_context(|| format!("failed to read CSV row at line {line}"))?;

        let field = |idx: usize| -> Result<&str> {
            row.get(idx)
                .with_context(|| format!("row at line {line} is missing column {idx}"))
        };

        let year: i32 = field(columns.year)?
            .parse()
            .with_context(|| format!("invalid year at line {line}"))?;
        if excluded_years.contains(&year) {
            continue;
        }

        let emissions: f64 = field(columns.emissions)?
            .parse()
            .with_context(|| format!("invalid emissions value at line {line}"))?;
        if emissions < 0.0 {
            bail!("negative emissions value at line {line}");
        }

        records.push(Record {
            country: field(columns.country)?.to_string(),
            year,
            sector: field(columns.sector)?.to_string(),
            subsector: field(columns.subsector)?.to_string(),
            emissions,
        });
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
