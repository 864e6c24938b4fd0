/// Configuration schema and defaults for carbontrace.
///
/// Defines the TOML-serializable structure with the `[data]`, `[server]`,
/// and `[table]` sections. Every field has a built-in default; users only
/// set the values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level carbontrace configuration.
///
/// Maps directly to the `~/.carbontrace/config.toml` and `.carbontrace.toml`
/// file schemas. All sections and fields are optional — missing values fall
/// back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbontraceConfig {
    pub data: DataConfig,
    pub server: ServerConfig,
    pub table: TableConfig,
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the emissions CSV file.
    pub path: String,
    /// Years excluded at load time. 2025 is excluded by default as
    /// known-invalid in the source data.
    pub excluded_years: Vec<i32>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "carbontrace.csv".to_string(),
            excluded_years: vec![2025],
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `carbontrace serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on startup.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8053".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [table]
// ---------------------------------------------------------------------------

/// Data table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page in the dashboard's data table.
    pub page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

// ---------------------------------------------------------------------------
// Default config file
// ---------------------------------------------------------------------------

impl CarbontraceConfig {
    /// The annotated default config file written by `carbontrace config init`.
    pub fn default_toml() -> &'static str {
        r#"# carbontrace configuration
# All values shown are the built-in defaults. Uncomment and edit to override.
# Precedence: defaults < ~/.carbontrace/config.toml < .carbontrace.toml < CARBONTRACE_* env vars.

[data]
# Path to the emissions CSV file.
# path = "carbontrace.csv"
# Years excluded at load time (known-bad data).
# excluded_years = [2025]

[server]
# Listen address for `carbontrace serve`.
# addr = "127.0.0.1:8053"
# Open the dashboard in the default browser on startup.
# open_browser = true

[table]
# Rows per page in the dashboard's data table.
# page_size = 10
"#
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = CarbontraceConfig::default();
        assert_eq!(cfg.server.addr, "127.0.0.1:8053");
        assert_eq!(cfg.table.page_size, 10);
        assert_eq!(cfg.data.excluded_years, vec![2025]);
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let cfg: CarbontraceConfig = toml::from_str(CarbontraceConfig::default_toml()).unwrap();
        assert_eq!(cfg.data.path, CarbontraceConfig::default().data.path);
        assert_eq!(cfg.server.addr, CarbontraceConfig::default().server.addr);
    }

    #[test]
    fn partial_toml_fills_missing_fields_with_defaults() {
        let cfg: CarbontraceConfig = toml::from_str(
            r#"
[server]
addr = "0.0.0.0:9000"
"#,
        )
        .unwrap();
        assert_eq!(cfg.server.addr, "0.0.0.0:9000");
        assert!(cfg.server.open_browser);
        assert_eq!(cfg.table.page_size, 10);
    }
}
