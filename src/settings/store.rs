use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::CrateCostError;

/// Number of saved versions retained in history.
pub const HISTORY_LIMIT: usize = 30;

/// Backing storage for the settings catalog.
///
/// Stores deal in serialized settings documents; parsing and validation stay
/// in the catalog so that a store holding garbage can still be detected and
/// reseeded.
pub trait SettingsStore {
    /// The current settings document, if one was ever committed.
    fn current(&self) -> Result<Option<String>, CrateCostError>;

    /// Saved documents, newest first.
    fn history(&self) -> Result<Vec<String>, CrateCostError>;

    /// Make `settings_json` current and prepend it to history, keeping at
    /// most `keep` history entries. Must be all-or-nothing.
    fn commit(&mut self, settings_json: &str, keep: usize) -> Result<(), CrateCostError>;
}

/// Process-local store, mostly for tests and hosts that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    current: Option<String>,
    history: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose current document is `settings_json` with empty history.
    /// Useful for simulating a store that holds a hand-edited document.
    pub fn with_current(settings_json: &str) -> Self {
        Self {
            current: Some(settings_json.to_string()),
            history: Vec::new(),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn current(&self) -> Result<Option<String>, CrateCostError> {
        Ok(self.current.clone())
    }

    fn history(&self) -> Result<Vec<String>, CrateCostError> {
        Ok(self.history.clone())
    }

    fn commit(&mut self, settings_json: &str, keep: usize) -> Result<(), CrateCostError> {
        self.current = Some(settings_json.to_string());
        self.history.insert(0, settings_json.to_string());
        self.history.truncate(keep);
        Ok(())
    }
}

/// SQLite store for the settings catalog.
/// All operations are synchronous (rusqlite is blocking).
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create or open the settings database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, CrateCostError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| store_err("Failed to create data dir", e))?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| store_err("Failed to open settings db", e))?;
        let store = Self::init(conn)?;

        info!("Opened settings database at {:?}", db_path);
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, CrateCostError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| store_err("Failed to open in-memory settings db", e))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, CrateCostError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings_current (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                settings_json TEXT NOT NULL,
                saved_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE TABLE IF NOT EXISTS settings_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                settings_json TEXT NOT NULL,
                saved_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e| store_err("Failed to create settings tables", e))?;

        Ok(Self { conn })
    }
}

impl SettingsStore for SqliteStore {
    fn current(&self) -> Result<Option<String>, CrateCostError> {
        let result = self.conn.query_row(
            "SELECT settings_json FROM settings_current WHERE slot = 0",
            [],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(Some(json)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(store_err("Failed to read current settings", e)),
        }
    }

    fn history(&self) -> Result<Vec<String>, CrateCostError> {
        let mut stmt = self
            .conn
            .prepare("SELECT settings_json FROM settings_history ORDER BY id DESC")
            .map_err(|e| store_err("Failed to prepare history query", e))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| store_err("Failed to query history", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| store_err("Failed to collect history", e))
    }

    fn commit(&mut self, settings_json: &str, keep: usize) -> Result<(), CrateCostError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| store_err("Failed to begin transaction", e))?;

        tx.execute(
            "INSERT OR REPLACE INTO settings_current (slot, settings_json, saved_at)
             VALUES (0, ?1, datetime('now'))",
            params![settings_json],
        )
        .map_err(|e| store_err("Failed to write current settings", e))?;

        tx.execute(
            "INSERT INTO settings_history (settings_json) VALUES (?1)",
            params![settings_json],
        )
        .map_err(|e| store_err("Failed to append history", e))?;

        let pruned = tx
            .execute(
                "DELETE FROM settings_history WHERE id NOT IN (
                    SELECT id FROM settings_history ORDER BY id DESC LIMIT ?1
                )",
                params![keep as i64],
            )
            .map_err(|e| store_err("Failed to prune history", e))?;

        tx.commit()
            .map_err(|e| store_err("Failed to commit settings", e))?;

        if pruned > 0 {
            debug!("Pruned {} old settings versions", pruned);
        }
        Ok(())
    }
}

/// Default location of the settings database: `<data_dir>/cratecost/settings.db`.
/// `None` when the platform has no per-user data directory.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("cratecost").join("settings.db"))
}

fn store_err(context: &str, e: impl std::fmt::Display) -> CrateCostError {
    CrateCostError::Store(format!("{}: {}", context, e))
}
