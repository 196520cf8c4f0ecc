//! Versioned, schema-validated crate settings.
//!
//! # Architecture
//!
//! - **Schema**: [`CrateSettings`] and its sub-structures (`types`)
//! - **Defaults**: embedded TOML baseline (`defaults`)
//! - **Validation**: every violated bound reported at once (`validation`)
//! - **Catalog**: stamp, validate, persist, bounded history (`catalog`)
//! - **Stores**: in-memory and SQLite backends behind [`SettingsStore`]
//!
//! # Example
//!
//! ```ignore
//! use cratecost::settings::{SettingsCatalog, SqliteStore, default_db_path};
//!
//! let store = SqliteStore::open(&default_db_path().unwrap())?;
//! let mut catalog = SettingsCatalog::new(store);
//!
//! let mut settings = catalog.load()?;
//! settings.nesting.max_items_per_box = 4;
//! let saved = catalog.save(&settings, "dispatch@example.com")?;
//! println!("now at version {}", saved.meta.version);
//! ```

mod catalog;
mod defaults;
mod file;
mod ids;
mod store;
mod types;
mod validation;

pub use catalog::{SettingsCatalog, SYSTEM_ACTOR};
pub use defaults::{default_settings, load_settings_toml};
pub use file::{export_json, import_json, read_settings_file, write_settings_file};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use store::{default_db_path, MemoryStore, SettingsStore, SqliteStore, HISTORY_LIMIT};
pub use types::*;
pub use validation::{validate, violations, ValidationError, Violation};
