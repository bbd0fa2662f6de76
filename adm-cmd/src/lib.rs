//! Command implementations for the ADM CLI.
//!
//! Every command runs against a freshly started dashboard backed by the
//! settings database named by `--settings`.

use adm_assistant::AssistantBridge;
use adm_core::date_range::RangeSelection;
use adm_dashboard::{Dashboard, DashboardOptions};
use adm_db::{Settings, SqliteSettingsStore};
use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod live;
pub mod query;

pub const DEFAULT_SETTINGS_PATH: &str = "adm-settings.db";

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// SQLite file holding persisted settings
    #[arg(long, env = "ADM_SETTINGS", default_value = DEFAULT_SETTINGS_PATH, global = true)]
    pub settings: PathBuf,

    /// Credential for the hosted assistant; without it replies are canned
    #[arg(long, env = "ADM_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a snapshot and print the metric cards, chart series and devices
    Snapshot {
        #[command(flatten)]
        view: query::SnapshotArgs,
    },

    /// Filter, sort and page the campaign table
    Campaigns {
        #[command(flatten)]
        query: query::QueryArgs,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export every matching campaign to CSV or XLSX
    Export {
        #[command(flatten)]
        query: query::QueryArgs,

        /// csv or xlsx
        #[arg(short, long, default_value = "csv")]
        format: adm_data::export::ExportFormat,

        /// Directory to write the dated export file into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Run the live metrics simulator and print each tick
    Live {
        /// Milliseconds between ticks
        #[arg(long, default_value_t = adm_live::TICK_INTERVAL.as_millis() as u64)]
        interval_ms: u64,

        /// How many ticks to print before exiting
        #[arg(long, default_value_t = 3)]
        ticks: u32,
    },

    /// Ask the assistant a question
    Ask {
        message: String,
    },

    /// Show or change the persisted dashboard settings
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

/// Open the settings database and start a dashboard on `range`.
pub fn open_dashboard(
    globals: &GlobalArgs,
    range: RangeSelection,
    options: DashboardOptions,
) -> anyhow::Result<Dashboard<SqliteSettingsStore>> {
    let settings = Settings::new(SqliteSettingsStore::open(&globals.settings)?);
    let bridge = AssistantBridge::from_api_key(globals.api_key.clone());
    Ok(Dashboard::start(range, settings, bridge, options))
}

pub async fn run(command: Command, globals: GlobalArgs) -> anyhow::Result<()> {
    match command {
        Command::Snapshot { view } => query::run_snapshot(&globals, &view).await,
        Command::Campaigns { query, json } => query::run_campaigns(&globals, &query, json).await,
        Command::Export {
            query,
            format,
            out_dir,
        } => query::run_export(&globals, &query, format, &out_dir).await,
        Command::Live { interval_ms, ticks } => live::run_live(interval_ms, ticks).await,
        Command::Ask { message } => {
            let mut dashboard = open_dashboard(&globals, RangeSelection::default(), DashboardOptions::default())?;
            match dashboard.ask(&message).await {
                Some(reply) => println!("{}", reply),
                None => log::warn!("ignoring blank message"),
            }
            dashboard.shutdown();
            Ok(())
        }
        Command::Config { action } => config::run_config(&globals, action),
    }
}
