//! Crate engineering and costing.
//!
//! Turns a shipment draft into physical crates with a bill of materials and
//! a sell price, driven by a versioned settings catalog:
//!
//! `Settings -> nesting::nest -> engineering::RuleEngine -> costing::CostEngine`
//!
//! [`Pipeline`] runs the whole chain with draft validation up front.

pub mod costing;
pub mod diagnostics;
pub mod draft;
pub mod engineering;
mod error;
pub mod nesting;
pub mod pipeline;
pub mod settings;
pub mod units;

pub use costing::{CostEngine, CostTotals, CostedBox};
pub use diagnostics::ConfigGap;
pub use draft::{CrateDraft, DraftError, Item};
pub use engineering::{EngineeredBox, ProfileOverrides, RuleEngine};
pub use error::CrateCostError;
pub use nesting::{nest, NestingBox};
pub use pipeline::{Pipeline, Quote};
pub use settings::{default_settings, CrateSettings, Profile, SettingsCatalog};

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
