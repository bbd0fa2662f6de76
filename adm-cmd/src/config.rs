//! Persisted settings commands.

use adm_db::{ConfigFlag, DashboardConfig, Settings, SettingsStore, SqliteSettingsStore};
use clap::{Subcommand, ValueEnum};

use crate::GlobalArgs;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print every panel flag and dark mode
    Show,
    /// Flip one panel flag, e.g. `revenue` or `device-chart`
    Toggle { flag: ConfigFlag },
    /// Show every panel again
    Reset,
    /// Turn dark mode on or off
    DarkMode { state: Switch },
}

pub fn run_config(globals: &GlobalArgs, action: ConfigAction) -> anyhow::Result<()> {
    let settings = Settings::new(SqliteSettingsStore::open(&globals.settings)?);
    print!("{}", apply(&settings, action)?);
    Ok(())
}

/// Perform `action` and return the resulting settings listing.
pub fn apply<S: SettingsStore>(settings: &Settings<S>, action: ConfigAction) -> anyhow::Result<String> {
    let config = match action {
        ConfigAction::Show => settings.load_config(),
        ConfigAction::Toggle { flag } => settings.toggle(flag)?,
        ConfigAction::Reset => settings.reset()?,
        ConfigAction::DarkMode { state } => {
            settings.set_dark_mode(state == Switch::On)?;
            settings.load_config()
        }
    };
    Ok(listing(&config, settings.dark_mode()))
}

fn listing(config: &DashboardConfig, dark_mode: bool) -> String {
    let mut out = String::new();
    for flag in ConfigFlag::ALL {
        out.push_str(&format!("{:<22} {}\n", flag.key(), config.get(flag)));
    }
    out.push_str(&format!("{:<22} {}\n", adm_db::DARK_MODE_KEY, dark_mode));
    out
}
