/// Configuration system for carbontrace.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::CarbontraceConfig::default()`]
/// 2. **User global config** — `~/.carbontrace/config.toml`
/// 3. **Project local config** — `.carbontrace.toml` in the current working directory
/// 4. **Environment variables** — `CARBONTRACE_*` overrides (highest precedence)
///
/// Later layers override earlier ones. Malformed optional layers are
/// silently ignored — a broken config file must never stop the dashboard
/// from starting with defaults.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::CarbontraceConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved carbontrace configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> CarbontraceConfig {
    let mut config = CarbontraceConfig::default();

    // Layer 2: user global config (~/.carbontrace/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.carbontrace.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. Each file deserializes with `serde(default)`, so
/// unset keys fall back to built-in defaults.
fn load_toml_file(path: Option<PathBuf>) -> Option<CarbontraceConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.carbontrace/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".carbontrace").join("config.toml"))
}

/// Path to the project local config: `.carbontrace.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".carbontrace.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CARBONTRACE_DATA` — path to the emissions CSV
/// - `CARBONTRACE_ADDR` — dashboard listen address
/// - `CARBONTRACE_PAGE_SIZE` — table rows per page
/// - `CARBONTRACE_OPEN_BROWSER` — open browser on startup (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut CarbontraceConfig) {
    if let Ok(val) = std::env::var("CARBONTRACE_DATA")
        && !val.is_empty()
    {
        config.data.path = val;
    }
    if let Ok(val) = std::env::var("CARBONTRACE_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Ok(val) = std::env::var("CARBONTRACE_PAGE_SIZE")
        && let Ok(n) = val.parse::<usize>()
        && n > 0
    {
        config.table.page_size = n;
    }
    if let Ok(val) = std::env::var("CARBONTRACE_OPEN_BROWSER") {
        config.server.open_browser = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.carbontrace/config.toml`.
///
/// Creates the `~/.carbontrace/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.carbontrace/ directory")?;
    }

    fs::write(&path, CarbontraceConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `server.addr`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut value_table: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        let defaults = toml::to_string_pretty(&CarbontraceConfig::default())
            .context("failed to serialize default config")?;
        toml::from_str(&defaults).context("failed to parse serialized defaults")?
    };

    set_toml_value(&mut value_table, key, value)?;

    let output = toml::to_string_pretty(&value_table).context("failed to serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // Match the type of the existing value so numbers stay numbers.
    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(items)) if items.iter().all(toml::Value::is_integer) => {
            let parsed: Result<Vec<toml::Value>> = raw_value
                .split(',')
                .map(|s| {
                    let n: i64 = s.trim().parse().with_context(|| {
                        format!("expected integer list for '{key}', got '{raw_value}'")
                    })?;
                    Ok(toml::Value::Integer(n))
                })
                .collect();
            toml::Value::Array(parsed?)
        }
        Some(toml::Value::Array(_)) => {
            let items: Vec<toml::Value> = raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .collect();
            toml::Value::Array(items)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:8053"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "server.addr", "0.0.0.0:9000").unwrap();

        let server = root.as_table().unwrap()["server"].as_table().unwrap();
        assert_eq!(server["addr"].as_str(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[server]
open_browser = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "server.open_browser", "false").unwrap();

        let server = root.as_table().unwrap()["server"].as_table().unwrap();
        assert_eq!(server["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[table]
page_size = 10
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "table.page_size", "25").unwrap();

        let table = root.as_table().unwrap()["table"].as_table().unwrap();
        assert_eq!(table["page_size"].as_integer(), Some(25));
    }

    #[test]
    fn set_toml_value_updates_integer_array() {
        let toml_str = r#"
[data]
excluded_years = [2025]
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "data.excluded_years", "2024, 2025").unwrap();

        let data = root.as_table().unwrap()["data"].as_table().unwrap();
        let years: Vec<i64> = data["excluded_years"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_integer().unwrap())
            .collect();
        assert_eq!(years, vec![2024, 2025]);
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:8053"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
    }

    #[test]
    fn show_effective_config_returns_parseable_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: CarbontraceConfig = toml::from_str(&toml_str).unwrap();
    }
}
