//! SQL schema for the settings database.

/// Returns the schema as a single batch string.
///
/// - `settings` - one row per key, values stored as text (JSON or `true`/`false`)
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#
}
