//! Filter reconciliation tests.
//!
//! Covers the toggle semantics of chart clicks, the no-op sentinel for
//! unresolvable payloads, the treemap extraction fallback, and reset
//! behavior. View-level aggregate tests are in `view_tests.rs`.

use carbontrace::dataset::{Dataset, Record};
use carbontrace::filter::{ClickEvent, ClickSource, FilterState, reconcile};
use carbontrace::view::recompute;

fn record(country: &str, year: i32, sector: &str, subsector: &str, emissions: f64) -> Record {
    Record {
        country: country.to_string(),
        year,
        sector: sector.to_string(),
        subsector: subsector.to_string(),
        emissions,
    }
}

fn sample_dataset() -> Dataset {
    Dataset::from_records(vec![
        record("USA", 2020, "Energy", "Power", 10.0),
        record("USA", 2021, "Transport", "Road", 5.0),
        record("China", 2020, "Energy", "Power", 20.0),
        record("India", 2021, "Agriculture", "Rice", 3.0),
    ])
}

fn map_click(value: &str) -> ClickEvent {
    ClickEvent {
        source: ClickSource::Map,
        value: Some(value.to_string()),
        path: None,
        text: None,
    }
}

// ---------------------------------------------------------------------------
// Toggle semantics
// ---------------------------------------------------------------------------

#[test]
fn toggle_is_idempotent_over_two_applications() {
    let initial = FilterState {
        countries: vec!["China".to_string()],
        years: vec![2020],
        ..Default::default()
    };

    let once = reconcile(&initial, &map_click("USA")).unwrap();
    let twice = reconcile(&once, &map_click("USA")).unwrap();
    assert_eq!(twice, initial);
}

#[test]
fn map_and_bar_reconcile_against_the_same_selection() {
    // Map selects USA, bar click on USA must de-select it — both sources
    // target the country dimension and must see each other's updates.
    let state = FilterState::default();
    let after_map = reconcile(&state, &map_click("USA")).unwrap();

    let bar = ClickEvent {
        source: ClickSource::Bar,
        value: Some("USA".to_string()),
        path: None,
        text: None,
    };
    let after_bar = reconcile(&after_map, &bar).unwrap();
    assert!(after_bar.countries.is_empty());
}

#[test]
fn selection_order_is_preserved_across_toggles() {
    let state = FilterState::default();
    let s1 = reconcile(&state, &map_click("USA")).unwrap();
    let s2 = reconcile(&s1, &map_click("China")).unwrap();
    let s3 = reconcile(&s2, &map_click("India")).unwrap();
    assert_eq!(s3.countries, vec!["USA", "China", "India"]);

    // Removing the middle value keeps the rest in order.
    let s4 = reconcile(&s3, &map_click("China")).unwrap();
    assert_eq!(s4.countries, vec!["USA", "India"]);
}

#[test]
fn reconcile_never_mutates_its_input() {
    let state = FilterState {
        countries: vec!["USA".to_string()],
        ..Default::default()
    };
    let copy = state.clone();
    let _ = reconcile(&state, &map_click("China"));
    assert_eq!(state, copy);
}

// ---------------------------------------------------------------------------
// No-op sentinel
// ---------------------------------------------------------------------------

#[test]
fn empty_click_payload_returns_the_no_change_sentinel() {
    let state = FilterState {
        countries: vec!["USA".to_string()],
        ..Default::default()
    };

    for source in [ClickSource::Map, ClickSource::Bar, ClickSource::Treemap] {
        let event = ClickEvent {
            source,
            value: None,
            path: None,
            text: None,
        };
        assert!(
            reconcile(&state, &event).is_none(),
            "{source:?} click with no value must be a no-op"
        );
    }
}

#[test]
fn no_op_is_distinct_from_change_to_empty() {
    let state = FilterState {
        countries: vec!["USA".to_string()],
        ..Default::default()
    };

    // De-selecting the only country is a change (to unconstrained)...
    let deselect = reconcile(&state, &map_click("USA"));
    assert_eq!(deselect, Some(FilterState::default()));

    // ...while an unresolvable click is not a change at all.
    let no_op = reconcile(
        &state,
        &ClickEvent {
            source: ClickSource::Map,
            value: Some(String::new()),
            path: None,
            text: None,
        },
    );
    assert!(no_op.is_none());
}

// ---------------------------------------------------------------------------
// Treemap extraction fallback
// ---------------------------------------------------------------------------

#[test]
fn treemap_path_identifier_takes_the_first_segment() {
    let event = ClickEvent {
        source: ClickSource::Treemap,
        value: None,
        path: Some("Energy/Power".to_string()),
        text: None,
    };
    let next = reconcile(&FilterState::default(), &event).unwrap();
    assert_eq!(next.sectors, vec!["Energy"]);
}

#[test]
fn treemap_single_segment_path_is_the_sector_itself() {
    let event = ClickEvent {
        source: ClickSource::Treemap,
        value: None,
        path: Some("Energy".to_string()),
        text: None,
    };
    let next = reconcile(&FilterState::default(), &event).unwrap();
    assert_eq!(next.sectors, vec!["Energy"]);
}

#[test]
fn treemap_toggle_roundtrips_through_different_payload_shapes() {
    // Select via path, de-select via bare label: same sector either way.
    let state = FilterState::default();
    let select = reconcile(
        &state,
        &ClickEvent {
            source: ClickSource::Treemap,
            value: None,
            path: Some("Energy/Power".to_string()),
            text: None,
        },
    )
    .unwrap();

    let deselect = reconcile(
        &select,
        &ClickEvent {
            source: ClickSource::Treemap,
            value: Some("Energy".to_string()),
            path: None,
            text: None,
        },
    )
    .unwrap();
    assert_eq!(deselect, state);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_is_absorbing_for_recomputation() {
    let dataset = sample_dataset();
    let state = FilterState {
        countries: vec!["USA".to_string()],
        years: vec![2020],
        sectors: vec!["Energy".to_string()],
        subsectors: vec!["Power".to_string()],
    };

    let after_reset = recompute(&dataset, &FilterState::reset());
    let initial = recompute(&dataset, &FilterState::default());

    assert_eq!(after_reset.total_emissions, initial.total_emissions);
    assert_eq!(after_reset.country_count, initial.country_count);
    assert_eq!(after_reset.table_rows, initial.table_rows);
    assert_ne!(
        recompute(&dataset, &state).total_emissions,
        initial.total_emissions
    );
}

#[test]
fn reset_clears_all_four_dimensions_at_once() {
    let state = FilterState {
        countries: vec!["USA".to_string()],
        years: vec![2020],
        sectors: vec!["Energy".to_string()],
        subsectors: vec!["Power".to_string()],
    };
    assert!(!state.is_unconstrained());
    assert!(FilterState::reset().is_unconstrained());
}
