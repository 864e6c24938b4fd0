use anyhow::Result;
use clap::{Parser, Subcommand};

use carbontrace::{cli, config, dataset, web};

#[derive(Debug, Parser)]
#[command(name = "carbontrace")]
#[command(about = "Carbon emissions dashboard and analytics")]
struct App {
    /// Path to the emissions CSV (overrides config `data.path`)
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the interactive web dashboard
    Serve {
        /// Listen address (default from config: 127.0.0.1:8053)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Show summary metrics: total emissions, countries, average
    Summary {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        #[command(flatten)]
        filters: cli::FilterArgs,
    },
    /// Show the largest emitting countries
    Top {
        /// Number of countries to show
        #[arg(long, default_value = "10")]
        limit: usize,
        #[arg(long, default_value = "table")]
        format: String,
        #[command(flatten)]
        filters: cli::FilterArgs,
    },
    /// Show yearly emissions trend series
    Trend {
        #[arg(long, default_value = "table")]
        format: String,
        #[command(flatten)]
        filters: cli::FilterArgs,
    },
    /// List individual records, largest emissions first
    Records {
        /// Maximum rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
        #[arg(long, default_value = "table")]
        format: String,
        #[command(flatten)]
        filters: cli::FilterArgs,
    },
    /// Check data source and configuration health
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write a default config file to ~/.carbontrace/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single config value, e.g. `server.addr 0.0.0.0:8053`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(path) = app.data {
        cfg.data.path = path;
    }

    match app.command {
        Commands::Serve { addr } => {
            let data = dataset::load(&cfg.data)?;
            let addr = addr.unwrap_or_else(|| cfg.server.addr.clone());
            web::serve(&addr, data, &cfg)
        }
        Commands::Summary { format, filters } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(&cfg, &filters, fmt)
        }
        Commands::Top {
            limit,
            format,
            filters,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_top(&cfg, &filters, limit, fmt)
        }
        Commands::Trend { format, filters } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_trend(&cfg, &filters, fmt)
        }
        Commands::Records {
            limit,
            format,
            filters,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_records(&cfg, &filters, limit, fmt)
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
