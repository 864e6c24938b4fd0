//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. The three state-changing
//! handlers (`post_filters`, `post_click`, `post_reset`) apply an
//! all-or-nothing update to the session [`FilterState`] and answer with the
//! fully recomputed dashboard payload.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::dataset::{Dataset, Record};
use crate::filter::{self, ClickEvent, FilterState};
use crate::view::{self, CountryTotal, SectorSlice, TrendSeries};

use super::content_type_json;

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Filter options response — the sorted distinct values of each dimension.
#[derive(Serialize)]
struct OptionsResponse<'a> {
    countries: &'a [String],
    years: &'a [i32],
    sectors: &'a [String],
    subsectors: &'a [String],
}

/// The full dashboard payload produced once per recomputation cycle.
///
/// The two metric strings carry their unit so the frontend can render them
/// verbatim; the chart aggregates are handed to the render panels as-is.
#[derive(Serialize)]
struct DashboardResponse {
    total_emissions: String,
    country_count: usize,
    avg_emissions: String,
    map: Vec<CountryTotal>,
    treemap: Vec<SectorSlice>,
    bar: Vec<CountryTotal>,
    trend: Vec<TrendSeries>,
    table_rows: Vec<Record>,
    page_size: usize,
    filters: FilterState,
}

/// Response to a chart click. `dashboard` is absent for no-op clicks —
/// the frontend leaves the displayed state untouched.
#[derive(Serialize)]
struct ClickResponse {
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard: Option<DashboardResponse>,
}

/// Dropdown update request. `reset` takes precedence over any selections
/// carried in the same request.
#[derive(Deserialize)]
#[serde(default)]
struct SelectionUpdate {
    reset: bool,
    countries: Vec<String>,
    years: Vec<i32>,
    sectors: Vec<String>,
    subsectors: Vec<String>,
}

impl Default for SelectionUpdate {
    fn default() -> Self {
        Self {
            reset: false,
            countries: Vec::new(),
            years: Vec::new(),
            sectors: Vec::new(),
            subsectors: Vec::new(),
        }
    }
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    records: usize,
    countries: usize,
    years: usize,
    sectors: usize,
    subsectors: usize,
    config_exists: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Format an emissions metric with its unit for the summary cards.
fn format_emissions(value: f64) -> String {
    format!("{value:.3} billion tons CO₂e")
}

/// Run one recomputation cycle and package the result.
fn dashboard_payload(dataset: &Dataset, filter: &FilterState, page_size: usize) -> DashboardResponse {
    let view = view::recompute(dataset, filter);

    DashboardResponse {
        total_emissions: format_emissions(view.total_emissions),
        country_count: view.country_count,
        avg_emissions: format_emissions(view.avg_emissions),
        map: view.country_totals,
        treemap: view.sector_breakdown,
        bar: view.top_countries,
        trend: view.trend,
        table_rows: view.table_rows,
        page_size,
        filters: filter.clone(),
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/options` — distinct values for the four filter controls.
pub fn get_options(dataset: &Dataset) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&OptionsResponse {
        countries: &dataset.countries,
        years: &dataset.years,
        sectors: &dataset.sectors,
        subsectors: &dataset.subsectors,
    })
}

/// `GET /api/dashboard` — the full payload for the current filter state.
pub fn get_dashboard(
    dataset: &Dataset,
    filter: &FilterState,
    page_size: usize,
) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&dashboard_payload(dataset, filter, page_size))
}

/// `POST /api/filters` — replace the selections from the dropdown controls.
///
/// Body: `{ "reset": bool, "countries": [...], "years": [...],
/// "sectors": [...], "subsectors": [...] }`. A `reset: true` clears all
/// four dimensions atomically and wins over any selections in the same
/// request.
pub fn post_filters(
    dataset: &Dataset,
    filter: &mut FilterState,
    body: &str,
    page_size: usize,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let update: SelectionUpdate =
        serde_json::from_str(body).context("invalid JSON in filter update request")?;

    *filter = if update.reset {
        FilterState::reset()
    } else {
        FilterState {
            countries: update.countries,
            years: update.years,
            sectors: update.sectors,
            subsectors: update.subsectors,
        }
    };

    json_response(&dashboard_payload(dataset, filter, page_size))
}

/// `POST /api/click` — reconcile a chart click against the current state.
///
/// A malformed payload or a click with no resolvable value is a no-op: the
/// response reports `changed: false`, no recomputation runs, and the filter
/// state is untouched. The UI must never break on an unexpected click.
pub fn post_click(
    dataset: &Dataset,
    filter: &mut FilterState,
    body: &str,
    page_size: usize,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let event: ClickEvent = match serde_json::from_str(body) {
        Ok(event) => event,
        Err(e) => {
            eprintln!("ignoring malformed click payload: {e}");
            return json_response(&ClickResponse {
                changed: false,
                dashboard: None,
            });
        }
    };

    match filter::reconcile(filter, &event) {
        Some(next) => {
            *filter = next;
            json_response(&ClickResponse {
                changed: true,
                dashboard: Some(dashboard_payload(dataset, filter, page_size)),
            })
        }
        None => json_response(&ClickResponse {
            changed: false,
            dashboard: None,
        }),
    }
}

/// `POST /api/reset` — clear all filters in one atomic step.
pub fn post_reset(
    dataset: &Dataset,
    filter: &mut FilterState,
    page_size: usize,
) -> Result<Response<Cursor<Vec<u8>>>> {
    *filter = FilterState::reset();
    json_response(&dashboard_payload(dataset, filter, page_size))
}

/// `GET /api/health` — dataset and config summary.
pub fn get_health(dataset: &Dataset) -> Result<Response<Cursor<Vec<u8>>>> {
    let config_exists = crate::config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    json_response(&HealthResponse {
        records: dataset.len(),
        countries: dataset.countries.len(),
        years: dataset.years.len(),
        sectors: dataset.sectors.len(),
        subsectors: dataset.subsectors.len(),
        config_exists,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, year: i32, sector: &str, emissions: f64) -> Record {
        Record {
            country: country.to_string(),
            year,
            sector: sector.to_string(),
            subsector: "General".to_string(),
            emissions,
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record("USA", 2020, "Energy", 10.0),
            record("USA", 2020, "Energy", 5.0),
            record("China", 2020, "Energy", 20.0),
        ])
    }

    #[test]
    fn dashboard_payload_formats_metrics_with_units() {
        let payload = dashboard_payload(&sample_dataset(), &FilterState::default(), 10);
        assert_eq!(payload.total_emissions, "35.000 billion tons CO₂e");
        assert_eq!(payload.avg_emissions, "17.500 billion tons CO₂e");
        assert_eq!(payload.country_count, 2);
        assert_eq!(payload.page_size, 10);
    }

    #[test]
    fn dashboard_payload_serializes_the_output_contract() {
        let payload = dashboard_payload(&sample_dataset(), &FilterState::default(), 10);
        let json = serde_json::to_value(&payload).unwrap();

        for key in [
            "total_emissions",
            "country_count",
            "avg_emissions",
            "map",
            "treemap",
            "bar",
            "trend",
            "table_rows",
            "filters",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn selection_update_reset_wins_over_selections() {
        let dataset = sample_dataset();
        let mut filter = FilterState {
            countries: vec!["USA".to_string()],
            ..Default::default()
        };

        // Reset and a pending country selection arrive in the same cycle.
        let body = r#"{"reset": true, "countries": ["China"]}"#;
        post_filters(&dataset, &mut filter, body, 10).unwrap();
        assert!(filter.is_unconstrained());
    }

    #[test]
    fn post_filters_replaces_selections() {
        let dataset = sample_dataset();
        let mut filter = FilterState::default();

        let body = r#"{"countries": ["USA"], "years": [2020]}"#;
        post_filters(&dataset, &mut filter, body, 10).unwrap();
        assert_eq!(filter.countries, vec!["USA"]);
        assert_eq!(filter.years, vec![2020]);
    }

    #[test]
    fn post_click_toggles_and_reports_change() {
        let dataset = sample_dataset();
        let mut filter = FilterState::default();

        let body = r#"{"source": "map", "value": "USA"}"#;
        post_click(&dataset, &mut filter, body, 10).unwrap();
        assert_eq!(filter.countries, vec!["USA"]);

        post_click(&dataset, &mut filter, body, 10).unwrap();
        assert!(filter.countries.is_empty());
    }

    #[test]
    fn malformed_click_payload_is_a_no_op_not_an_error() {
        let dataset = sample_dataset();
        let mut filter = FilterState {
            countries: vec!["USA".to_string()],
            ..Default::default()
        };
        let before = filter.clone();

        let result = post_click(&dataset, &mut filter, "not json at all", 10);
        assert!(result.is_ok());
        assert_eq!(filter, before);
    }

    #[test]
    fn post_reset_clears_every_dimension() {
        let dataset = sample_dataset();
        let mut filter = FilterState {
            countries: vec!["USA".to_string()],
            years: vec![2020],
            sectors: vec!["Energy".to_string()],
            subsectors: vec!["General".to_string()],
        };

        post_reset(&dataset, &mut filter, 10).unwrap();
        assert!(filter.is_unconstrained());
    }
}
