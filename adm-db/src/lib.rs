//! Persisted dashboard settings.
//!
//! Two keys survive a restart:
//! - `darkModeEnabled`: `true` / `false`
//! - `dashboardConfig`: JSON object with the seven panel visibility flags
//!
//! Storage sits behind [`SettingsStore`]. [`SqliteSettingsStore`] keeps a
//! single-table SQLite database (file-backed or in-memory);
//! [`MemorySettingsStore`] is a plain map for tests and throwaway sessions.
//! [`Settings`] is the typed facade the dashboard talks to.
//!
//! ```rust
//! use adm_db::{ConfigFlag, Settings, SqliteSettingsStore};
//!
//! let settings = Settings::new(SqliteSettingsStore::in_memory().unwrap());
//! assert!(settings.load_config().show_revenue);
//! settings.toggle(ConfigFlag::ShowRevenue).unwrap();
//! assert!(!settings.load_config().show_revenue);
//! ```

pub mod config;
pub mod schema;
mod settings;

pub use config::{ConfigFlag, DashboardConfig};
pub use settings::{Settings, CONFIG_KEY, DARK_MODE_KEY};

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Key/value persistence for settings.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// SQLite-backed store.
pub struct SqliteSettingsStore {
    conn: Mutex<Connection>,
}

impl SqliteSettingsStore {
    /// Open (or create) a settings database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        log::debug!("opened settings database {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("settings connection lock poisoned"))
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("settings map lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("settings map lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value)
    }
}
