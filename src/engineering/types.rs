use serde::Serialize;
use std::collections::BTreeMap;

use crate::diagnostics::ConfigGap;
use crate::nesting::NestingBox;
use crate::settings::{LumberType, Profile};
use crate::units::{cm_to_in, volume_m3};

/// Caller-assigned profiles keyed by nesting box index. Boxes without an
/// entry use the profile inferred from the draft's service type.
pub type ProfileOverrides = BTreeMap<usize, Profile>;

/// Padded crate interior in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub face_a_cm: f64,
    pub face_b_cm: f64,
    pub depth_cm: f64,
}

impl Dimensions {
    /// `(face_a, face_b, depth)` in inches.
    pub fn in_inches(&self) -> (f64, f64, f64) {
        (
            cm_to_in(self.face_a_cm),
            cm_to_in(self.face_b_cm),
            cm_to_in(self.depth_cm),
        )
    }

    pub fn volume_m3(&self) -> f64 {
        volume_m3(self.face_a_cm, self.face_b_cm, self.depth_cm)
    }
}

/// Material quantities before waste and rounding.
///
/// Plywood and cardboard are in plywood-sized sheets; foam is in foam-sized
/// sheets (`materials.foam`), which only differ from plywood when the foam
/// sheet size is configured differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomRaw {
    pub plywood_sheets: f64,
    pub lumber_sticks: f64,
    pub foam_sheets: f64,
    pub cardboard_sheets: f64,
}

/// A nesting box with its manufacturing specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeredBox {
    #[serde(flatten)]
    pub nesting: NestingBox,
    pub profile: Profile,
    /// Member fragility raised to the profile minimum.
    pub effective_fragility: u8,
    pub padding_perimeter_cm: f64,
    pub padding_between_cm: f64,
    pub internal_final_cm: Dimensions,
    pub plywood_thickness_in: f64,
    /// Perimeter foam thickness, used as the foam price key.
    pub foam_thickness_in: f64,
    pub lumber_type: LumberType,
    pub skid: bool,
    pub ribs: bool,
    pub x_bracing: bool,
    pub weight_lb: f64,
    pub longest_side_in: f64,
    pub bom_raw: BomRaw,
}

/// Engineered boxes plus any settings lookups that missed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringOutcome {
    pub boxes: Vec<EngineeredBox>,
    pub gaps: Vec<ConfigGap>,
}
