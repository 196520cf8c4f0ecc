//! Manufacturing specifications for nested crates.
//!
//! # Architecture
//!
//! - **Profile**: per-box override, else inferred from the draft's service type
//! - **Padding**: protection level for the effective fragility
//! - **Structure**: lumber gauge, skid, ribs and x-bracing from thresholds
//! - **Raw BOM**: plywood, lumber, foam and cardboard before waste/rounding
//!
//! # Example
//!
//! ```ignore
//! use cratecost::engineering::{ProfileOverrides, RuleEngine};
//!
//! let boxes = cratecost::nesting::nest(&draft, &settings);
//! let outcome = RuleEngine::new(&settings).engineer(&draft, &boxes, &ProfileOverrides::new());
//! for gap in &outcome.gaps {
//!     eprintln!("{gap}");
//! }
//! ```

mod engine;
mod liner;
mod types;

pub use engine::{infer_profile, RuleEngine};
pub use liner::{box_surface_in2, ContentSurface, LinerInput, LinerSurface, OuterSurface};
pub use types::{BomRaw, Dimensions, EngineeredBox, EngineeringOutcome, ProfileOverrides};
