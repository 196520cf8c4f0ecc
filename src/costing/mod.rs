//! Waste, rounding, unit prices, adders and markup.
//!
//! # Example
//!
//! ```ignore
//! use cratecost::costing::CostEngine;
//!
//! let outcome = CostEngine::new(&settings).cost(&engineered.boxes);
//! println!("sell price {:.2}", outcome.totals.sell_price);
//! ```

mod engine;
mod types;

pub use engine::{round_up, CostEngine};
pub use types::{AdderBreakdown, BomRounded, CostBreakdown, CostTotals, CostedBox, CostingOutcome};
