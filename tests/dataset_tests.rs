//! Dataset loading tests.
//!
//! End-to-end checks of the CSV loader: file-based loading through the
//! config path, header normalization of real-world legacy exports, and
//! fatal error surfaces. Parser-level cases live in the `dataset` module's
//! unit tests.

use std::fs;
use std::path::PathBuf;

use carbontrace::config::schema::DataConfig;
use carbontrace::dataset;

/// Write a CSV to a unique temp path and return a DataConfig pointing at it.
fn temp_csv(name: &str, contents: &str) -> DataConfig {
    let mut path = std::env::temp_dir();
    path.push(format!("carbontrace-test-{}-{}.csv", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    DataConfig {
        path: path.to_string_lossy().into_owned(),
        excluded_years: vec![2025],
    }
}

fn cleanup(cfg: &DataConfig) {
    let _ = fs::remove_file(PathBuf::from(&cfg.path));
}

#[test]
fn loads_a_well_formed_file() {
    let cfg = temp_csv(
        "well-formed",
        "Country,Year,Sector,Subsector,Emissions\n\
         USA,2020,Energy,Power,10.5\n\
         China,2021,Transport,Road,20.25\n",
    );

    let data = dataset::load(&cfg).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data.countries, vec!["China", "USA"]);

    cleanup(&cfg);
}

#[test]
fn loads_a_legacy_export_with_variant_headers() {
    // The shape of an older workbook export: variant capitals, deprecated
    // lowercase duplicates, a raw emissions column next to the billions one.
    let cfg = temp_csv(
        "legacy",
        "Country,Year,sector,subsector,Sector (Capital),Subsector(Capital),\
         Emissions,Emissions in billions,co2e_100yr_emissions_quantity\n\
         USA,2020,energy,power,Energy,Power,10500000000,10.5,123456\n\
         USA,2025,energy,power,Energy,Power,9000000000,9.0,654321\n",
    );

    let data = dataset::load(&cfg).unwrap();
    // 2025 row excluded, billions column wins.
    assert_eq!(data.len(), 1);
    assert_eq!(data.records[0].sector, "Energy");
    assert_eq!(data.records[0].subsector, "Power");
    assert_eq!(data.records[0].emissions, 10.5);

    cleanup(&cfg);
}

#[test]
fn missing_file_is_a_fatal_startup_error() {
    let cfg = DataConfig {
        path: "/nonexistent/carbontrace-no-such-file.csv".to_string(),
        excluded_years: vec![2025],
    };
    let err = dataset::load(&cfg).unwrap_err();
    assert!(err.to_string().contains("failed to open data file"));
}

#[test]
fn missing_column_error_names_the_file() {
    let cfg = temp_csv("missing-col", "Country,Year,Emissions\nUSA,2020,1.0\n");
    let err = dataset::load(&cfg).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains(&cfg.path));
    assert!(chain.contains("missing required column"));

    cleanup(&cfg);
}

#[test]
fn configured_excluded_years_are_honored() {
    let mut cfg = temp_csv(
        "excluded",
        "Country,Year,Sector,Subsector,Emissions\n\
         USA,2019,Energy,Power,1.0\n\
         USA,2020,Energy,Power,2.0\n\
         USA,2021,Energy,Power,3.0\n",
    );
    cfg.excluded_years = vec![2019, 2021];

    let data = dataset::load(&cfg).unwrap();
    assert_eq!(data.years, vec![2020]);

    cleanup(&cfg);
}
