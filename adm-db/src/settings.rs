use crate::config::{ConfigFlag, DashboardConfig};
use crate::SettingsStore;

pub const DARK_MODE_KEY: &str = "darkModeEnabled";
pub const CONFIG_KEY: &str = "dashboardConfig";

/// Typed access to the persisted settings. Every mutation is written through
/// to the store before returning.
pub struct Settings<S> {
    store: S,
}

impl<S: SettingsStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the panel config. Missing, unreadable, or malformed values yield
    /// the all-shown default.
    pub fn load_config(&self) -> DashboardConfig {
        let raw = match self.store.get(CONFIG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DashboardConfig::default(),
            Err(e) => {
                log::warn!("could not read {}: {:#}; using defaults", CONFIG_KEY, e);
                return DashboardConfig::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("discarding malformed {} ({}); using defaults", CONFIG_KEY, e);
                DashboardConfig::default()
            }
        }
    }

    pub fn save_config(&self, config: &DashboardConfig) -> anyhow::Result<()> {
        let json = serde_json::to_string(config)?;
        self.store.set(CONFIG_KEY, &json)
    }

    /// Flip one panel flag and persist. Returns the updated config.
    pub fn toggle(&self, flag: ConfigFlag) -> anyhow::Result<DashboardConfig> {
        let mut config = self.load_config();
        let now = config.toggle(flag);
        self.save_config(&config)?;
        log::info!("{} is now {}", flag, now);
        Ok(config)
    }

    /// Persist the all-shown default.
    pub fn reset(&self) -> anyhow::Result<DashboardConfig> {
        let config = DashboardConfig::default();
        self.save_config(&config)?;
        log::info!("dashboard config reset to defaults");
        Ok(config)
    }

    pub fn dark_mode(&self) -> bool {
        match self.store.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<bool>() {
                Ok(enabled) => enabled,
                Err(_) => {
                    log::warn!("discarding malformed {} value {:?}", DARK_MODE_KEY, raw);
                    false
                }
            },
            Ok(None) => false,
            Err(e) => {
                log::warn!("could not read {}: {:#}", DARK_MODE_KEY, e);
                false
            }
        }
    }

    pub fn set_dark_mode(&self, enabled: bool) -> anyhow::Result<()> {
        self.store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    /// Flip dark mode and persist. Returns the new value.
    pub fn toggle_dark_mode(&self) -> anyhow::Result<bool> {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemorySettingsStore, SqliteSettingsStore};

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::new(MemorySettingsStore::new());
        assert_eq!(settings.load_config(), DashboardConfig::default());
        assert!(!settings.dark_mode());
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let store = MemorySettingsStore::new();
        store.set(CONFIG_KEY, "{not json").unwrap();
        let settings = Settings::new(store);
        assert_eq!(settings.load_config(), DashboardConfig::default());
    }

    #[test]
    fn test_malformed_dark_mode_is_off() {
        let store = MemorySettingsStore::new();
        store.set(DARK_MODE_KEY, "maybe").unwrap();
        assert!(!Settings::new(store).dark_mode());
    }

    #[test]
    fn test_toggle_persists_immediately() {
        let settings = Settings::new(SqliteSettingsStore::in_memory().unwrap());
        let config = settings.toggle(ConfigFlag::ShowUsers).unwrap();
        assert!(!config.show_users);

        let raw = settings.store().get(CONFIG_KEY).unwrap().unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["showUsers"], serde_json::Value::Bool(false));
        assert_eq!(stored["showRevenue"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_reset_restores_all_shown() {
        let settings = Settings::new(MemorySettingsStore::new());
        settings.toggle(ConfigFlag::ShowRevenue).unwrap();
        settings.toggle(ConfigFlag::ShowCampaignTable).unwrap();
        assert_eq!(settings.reset().unwrap(), DashboardConfig::default());
        assert_eq!(settings.load_config(), DashboardConfig::default());
    }

    #[test]
    fn test_dark_mode_round_trip() {
        let settings = Settings::new(MemorySettingsStore::new());
        settings.set_dark_mode(true).unwrap();
        assert!(settings.dark_mode());
        assert!(!settings.toggle_dark_mode().unwrap());
        assert!(!settings.dark_mode());
    }

    #[test]
    fn test_settings_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adm-settings.db");
        {
            let settings = Settings::new(SqliteSettingsStore::open(&path).unwrap());
            settings.toggle(ConfigFlag::ShowDeviceChart).unwrap();
            settings.set_dark_mode(true).unwrap();
        }
        let settings = Settings::new(SqliteSettingsStore::open(&path).unwrap());
        assert!(!settings.load_config().show_device_chart);
        assert!(settings.dark_mode());
    }
}
