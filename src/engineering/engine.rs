//! Structural rules for nested boxes.
//!
//! The `RuleEngine` takes nesting output and settings, assigns each box a
//! profile, padding, lumber gauge, skid/rib/bracing flags and raw material
//! estimates. Missing settings entries degrade to zero quantities and are
//! reported as [`ConfigGap`]s.

use tracing::{debug, warn};

use crate::diagnostics::ConfigGap;
use crate::draft::CrateDraft;
use crate::nesting::NestingBox;
use crate::settings::{CrateSettings, LumberType, Profile};
use crate::units::{cm_to_in, in_to_cm, kg_to_lb};

use super::liner::{box_surface_in2, LinerInput, LinerSurface, OuterSurface};
use super::types::{BomRaw, Dimensions, EngineeredBox, EngineeringOutcome, ProfileOverrides};

/// Default profile for a free-text service type.
///
/// Case-insensitive substring match, first hit wins: `export`/`ispm`, then
/// `maquin`, then `arte`/`it`/`premium`. The bare `it` matches loosely
/// (e.g. "kit"); callers override per box when that matters.
pub fn infer_profile(service_type: &str) -> Profile {
    let lower = service_type.to_lowercase();

    if lower.contains("export") || lower.contains("ispm") {
        Profile::ExportIspm15
    } else if lower.contains("maquin") {
        Profile::MachineryIspm15
    } else if lower.contains("arte") || lower.contains("it") || lower.contains("premium") {
        Profile::PremiumArtIt
    } else {
        Profile::StandardLocal
    }
}

/// The engineering rule engine.
pub struct RuleEngine<'a> {
    settings: &'a CrateSettings,
    liner: Box<dyn LinerSurface>,
}

impl<'a> RuleEngine<'a> {
    /// Create an engine over `settings` using the outer-surface liner estimate.
    pub fn new(settings: &'a CrateSettings) -> Self {
        Self {
            settings,
            liner: Box::new(OuterSurface),
        }
    }

    /// Swap the liner surface estimate used for foam and cardboard sheets.
    pub fn with_liner(mut self, liner: Box<dyn LinerSurface>) -> Self {
        self.liner = liner;
        self
    }

    /// Engineer every box. Profiles come from `overrides` by box index, else
    /// from the draft's service type.
    pub fn engineer(
        &self,
        draft: &CrateDraft,
        boxes: &[NestingBox],
        overrides: &ProfileOverrides,
    ) -> EngineeringOutcome {
        let inferred = infer_profile(&draft.service_type);
        let mut gaps = Vec::new();

        let engineered = boxes
            .iter()
            .map(|nesting_box| {
                let profile = overrides
                    .get(&nesting_box.index)
                    .copied()
                    .unwrap_or(inferred);
                self.engineer_box(nesting_box, profile, &mut gaps)
            })
            .collect();

        EngineeringOutcome {
            boxes: engineered,
            gaps,
        }
    }

    /// Engineer a single box under `profile`, appending any lookup misses to `gaps`.
    ///
    /// Foam sheets divide the liner surface by the foam sheet area; plywood and
    /// cardboard divide by the plywood sheet area.
    pub fn engineer_box(
        &self,
        nesting_box: &NestingBox,
        profile: Profile,
        gaps: &mut Vec<ConfigGap>,
    ) -> EngineeredBox {
        let settings = self.settings;
        let defaults = settings.engineering.profile_defaults.get(profile);
        let thresholds = &settings.engineering.thresholds;
        let box_index = nesting_box.index;

        // A profile can raise the protection level, never lower it.
        let effective_fragility = nesting_box.max_fragility.max(defaults.min_fragility);

        let (perimeter_in, between_in, foam_thickness_in) =
            match settings.protection_for(effective_fragility) {
                Some(level) => {
                    let foam = if level.double_perimeter {
                        level.perimeter_foam_in * 2.0
                    } else {
                        level.perimeter_foam_in
                    };
                    (
                        foam + level.cardboard_in,
                        level.between_items_foam_in,
                        level.perimeter_foam_in,
                    )
                }
                None => {
                    let gap = ConfigGap::MissingProtection {
                        box_index,
                        fragility: effective_fragility,
                    };
                    warn!("{}", gap);
                    gaps.push(gap);
                    (0.0, 0.0, 0.0)
                }
            };

        let padding_perimeter_cm = in_to_cm(perimeter_in);
        let padding_between_cm = in_to_cm(between_in);
        let gaps_between = nesting_box.item_count().saturating_sub(1) as f64;

        let content_depth_cm = nesting_box.depth_cm + gaps_between * padding_between_cm;
        let internal_final_cm = Dimensions {
            face_a_cm: nesting_box.face_a_cm + 2.0 * padding_perimeter_cm,
            face_b_cm: nesting_box.face_b_cm + 2.0 * padding_perimeter_cm,
            depth_cm: content_depth_cm + 2.0 * padding_perimeter_cm,
        };

        let (w, h, d) = internal_final_cm.in_inches();
        let weight_lb = kg_to_lb(nesting_box.total_weight_kg);
        let longest_side_in = w.max(h).max(d);

        let lumber_type = if weight_lb > thresholds.use_2x4_if_weight_lb_above
            || longest_side_in > thresholds.use_2x4_if_longest_side_in_above
        {
            LumberType::TwoByFour
        } else {
            defaults.default_lumber
        };
        let skid = defaults.prefer_skid
            || weight_lb > thresholds.skid_if_weight_lb_above
            || longest_side_in > thresholds.skid_if_longest_side_in_above;
        let ribs = longest_side_in > thresholds.add_ribs_if_longest_side_in_above;
        let x_bracing = h > 0.0 && w / h > thresholds.add_x_bracing_if_aspect_ratio_above;

        // Raw quantities
        let surface_in2 = box_surface_in2((w, h, d));
        let liner_in2 = self.liner.inner_surface_in2(&LinerInput {
            internal_in: (w, h, d),
            content_in: (
                cm_to_in(nesting_box.face_a_cm),
                cm_to_in(nesting_box.face_b_cm),
                cm_to_in(content_depth_cm),
            ),
        });

        let mut lumber_in = 4.0 * (w + h) + 4.0 * d;
        if skid {
            lumber_in += 2.0 * w + 3.0 * h;
        }
        if ribs {
            lumber_in += 2.0 * (w + h);
        }
        if x_bracing {
            lumber_in += 2.0 * (w * w + h * h).sqrt();
        }

        let stick_length_in = match settings.materials.lumber.first() {
            Some(stick) if stick.length_in > 0.0 && stick.length_in.is_finite() => stick.length_in,
            _ => {
                let gap = ConfigGap::NoLumberStock { box_index };
                warn!("{}", gap);
                gaps.push(gap);
                0.0
            }
        };

        let plywood_area = sheet_area(settings.materials.plywood.sheet_area_in2(), "plywood", box_index, gaps);
        let foam_area = sheet_area(settings.materials.foam.sheet_area_in2(), "foam", box_index, gaps);

        let bom_raw = BomRaw {
            plywood_sheets: per_unit(surface_in2, plywood_area),
            lumber_sticks: per_unit(lumber_in, stick_length_in),
            foam_sheets: per_unit(liner_in2, foam_area),
            // Cardboard has no sheet size of its own and is bought in plywood-sized sheets.
            cardboard_sheets: per_unit(liner_in2, plywood_area),
        };

        debug!(
            "Box {}: {} fragility {} -> {} lumber, skid={}, ribs={}, x_bracing={}",
            box_index, profile, effective_fragility, lumber_type, skid, ribs, x_bracing
        );

        EngineeredBox {
            nesting: nesting_box.clone(),
            profile,
            effective_fragility,
            padding_perimeter_cm,
            padding_between_cm,
            internal_final_cm,
            plywood_thickness_in: *settings.engineering.plywood_thickness_by_profile.get(profile),
            foam_thickness_in,
            lumber_type,
            skid,
            ribs,
            x_bracing,
            weight_lb,
            longest_side_in,
            bom_raw,
        }
    }
}

fn sheet_area(area: f64, material: &'static str, box_index: usize, gaps: &mut Vec<ConfigGap>) -> f64 {
    if area > 0.0 && area.is_finite() {
        area
    } else {
        let gap = ConfigGap::ZeroSheetArea { box_index, material };
        warn!("{}", gap);
        gaps.push(gap);
        0.0
    }
}

/// `amount / unit`, or zero when the unit is unusable.
fn per_unit(amount: f64, unit: f64) -> f64 {
    if unit > 0.0 {
        amount / unit
    } else {
        0.0
    }
}
