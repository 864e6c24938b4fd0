//! CLI command implementations for carbontrace analytics and diagnostics.
//!
//! Provides subcommand handlers for:
//! - `carbontrace summary` — total emissions, country count, average
//! - `carbontrace top` — largest emitting countries
//! - `carbontrace trend` — yearly emissions series
//! - `carbontrace records` — individual rows, largest first
//! - `carbontrace health` — data source and config checks
//! - `carbontrace config show|init|set|reset` — configuration management
//!
//! Every analytics subcommand accepts repeatable dimension filters and runs
//! the exact same recompute path as the web dashboard.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::{self, CarbontraceConfig};
use crate::dataset::{self, Dataset};
use crate::filter::FilterState;
use crate::view::{self, DerivedView};

/// Output format for analytics commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Repeatable dimension filter flags shared by the analytics subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Restrict to a country (repeatable)
    #[arg(long = "country")]
    pub countries: Vec<String>,
    /// Restrict to a year (repeatable)
    #[arg(long = "year")]
    pub years: Vec<i32>,
    /// Restrict to a sector (repeatable)
    #[arg(long = "sector")]
    pub sectors: Vec<String>,
    /// Restrict to a subsector (repeatable)
    #[arg(long = "subsector")]
    pub subsectors: Vec<String>,
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        FilterState {
            countries: self.countries.clone(),
            years: self.years.clone(),
            sectors: self.sectors.clone(),
            subsectors: self.subsectors.clone(),
        }
    }
}

/// Load the dataset and recompute the view for the given filters.
fn load_view(cfg: &CarbontraceConfig, filters: &FilterArgs) -> Result<(Dataset, DerivedView)> {
    let data = dataset::load(&cfg.data)?;
    let view = view::recompute(&data, &filters.to_state());
    Ok((data, view))
}

// ---------------------------------------------------------------------------
// carbontrace summary
// ---------------------------------------------------------------------------

/// Show summary metrics and the top emitting countries.
pub fn run_summary(cfg: &CarbontraceConfig, filters: &FilterArgs, format: OutputFormat) -> Result<()> {
    let (_, view) = load_view(cfg, filters)?;

    match format {
        OutputFormat::Json => print_summary_json(&view)?,
        OutputFormat::Csv => print_summary_csv(&view),
        OutputFormat::Table => print_summary_table(&view),
    }

    Ok(())
}

fn print_summary_table(view: &DerivedView) {
    println!("{}", "Carbon Emissions Summary".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!(
        "  {} {:.3} billion tons CO₂e",
        "Total emissions:".bold(),
        view.total_emissions
    );
    println!("  {} {}", "Countries:      ".bold(), view.country_count);
    println!(
        "  {} {:.3} billion tons CO₂e",
        "Avg per country:".bold(),
        view.avg_emissions
    );

    if !view.top_countries.is_empty() {
        println!();
        println!("{}", "Top Emitting Countries".bold().cyan());
        println!("  {:<24} {:>14}", "Country", "Emissions");
        println!("  {}", "-".repeat(40));
        for (i, total) in view.top_countries.iter().enumerate() {
            let line = format!("  {:<24} {:>14.3}", total.country, total.emissions);
            if i % 2 == 0 {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
}

fn print_summary_json(view: &DerivedView) -> Result<()> {
    let value = serde_json::json!({
        "total_emissions": view.total_emissions,
        "country_count": view.country_count,
        "avg_emissions": view.avg_emissions,
        "top_countries": view.top_countries,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_summary_csv(view: &DerivedView) {
    println!("total_emissions,country_count,avg_emissions");
    println!(
        "{:.3},{},{:.3}",
        view.total_emissions, view.country_count, view.avg_emissions
    );
}

// ---------------------------------------------------------------------------
// carbontrace top
// ---------------------------------------------------------------------------

/// Show the largest emitting countries.
pub fn run_top(
    cfg: &CarbontraceConfig,
    filters: &FilterArgs,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let (_, view) = load_view(cfg, filters)?;
    // The bar aggregate caps at 10; go back to the full ranking for larger
    // limits.
    let mut ranked = view.country_totals.clone();
    ranked.sort_by(|a, b| b.emissions.total_cmp(&a.emissions));
    ranked.truncate(limit);

    if ranked.is_empty() {
        println!("{}", "No records match the given filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Csv => {
            println!("country,emissions");
            for t in &ranked {
                println!("{},{:.3}", t.country, t.emissions);
            }
        }
        OutputFormat::Table => {
            println!("{}", "Top Emitting Countries".bold().cyan());
            println!("{}", "=".repeat(42));
            println!("  {:<4} {:<24} {:>10}", "#", "Country", "Emissions");
            println!("  {}", "-".repeat(40));
            for (i, t) in ranked.iter().enumerate() {
                println!("  {:<4} {:<24} {:>10.3}", i + 1, t.country, t.emissions);
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// carbontrace trend
// ---------------------------------------------------------------------------

/// Show yearly emissions series per the trend selection policy.
pub fn run_trend(cfg: &CarbontraceConfig, filters: &FilterArgs, format: OutputFormat) -> Result<()> {
    let (_, view) = load_view(cfg, filters)?;

    if view.trend.is_empty() {
        println!("{}", "No records match the given filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.trend)?),
        OutputFormat::Csv => {
            println!("series,year,emissions");
            for series in &view.trend {
                for point in &series.points {
                    println!("{},{},{:.3}", series.name, point.year, point.emissions);
                }
            }
        }
        OutputFormat::Table => {
            for series in &view.trend {
                println!("{}", format!("Trend: {}", series.name).bold().cyan());
                println!("  {:<8} {:>12}", "Year", "Emissions");
                println!("  {}", "-".repeat(22));
                for point in &series.points {
                    println!("  {:<8} {:>12.3}", point.year, point.emissions);
                }
                println!();
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// carbontrace records
// ---------------------------------------------------------------------------

/// List individual records, largest emissions first.
pub fn run_records(
    cfg: &CarbontraceConfig,
    filters: &FilterArgs,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let (_, view) = load_view(cfg, filters)?;
    let rows = &view.table_rows[..view.table_rows.len().min(limit)];

    if rows.is_empty() {
        println!("{}", "No records match the given filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            println!("country,year,sector,subsector,emissions");
            for r in rows {
                println!(
                    "{},{},{},{},{:.3}",
                    r.country, r.year, r.sector, r.subsector, r.emissions
                );
            }
        }
        OutputFormat::Table => {
            println!("{}", "Emissions Records".bold().cyan());
            println!(
                "  {:<18} {:<6} {:<16} {:<16} {:>10}",
                "Country", "Year", "Sector", "Subsector", "Emissions"
            );
            println!("  {}", "-".repeat(70));
            for (i, r) in rows.iter().enumerate() {
                let line = format!(
                    "  {:<18} {:<6} {:<16} {:<16} {:>10.3}",
                    truncate(&r.country, 18),
                    r.year,
                    truncate(&r.sector, 16),
                    truncate(&r.subsector, 16),
                    r.emissions
                );
                if i % 2 == 0 {
                    println!("{}", line);
                } else {
                    println!("{}", line.dimmed());
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// carbontrace health
// ---------------------------------------------------------------------------

/// Check data source and configuration health.
pub fn run_health(cfg: &CarbontraceConfig) -> Result<()> {
    println!("{}", "Carbontrace Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.carbontrace/config.toml found"
        } else {
            "not found (run `carbontrace config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".carbontrace.toml found"
        } else {
            "none (optional)"
        },
    );

    match dataset::load(&cfg.data) {
        Ok(data) => {
            print_health_item("Data file", true, &cfg.data.path);
            print_health_item(
                "Records",
                !data.is_empty(),
                &format!(
                    "{} rows, {} countries, {} years, {} sectors",
                    data.len(),
                    data.countries.len(),
                    data.years.len(),
                    data.sectors.len()
                ),
            );
        }
        Err(e) => {
            print_health_item("Data file", false, &format!("{e:#}"));
        }
    }

    print_health_item(
        "Server address",
        true,
        &format!("{} ({} rows/page)", cfg.server.addr, cfg.table.page_size),
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// carbontrace config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Carbontrace Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.carbontrace/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.carbontrace/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".carbontrace.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".carbontrace.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "CARBONTRACE_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.carbontrace/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    println!(
        "  {}",
        "Edit the file to point data.path at your emissions CSV.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
