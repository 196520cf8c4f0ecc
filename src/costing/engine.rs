//! Bill of materials and price for engineered boxes.
//!
//! Raw quantities get their waste allowance, are rounded up to whole
//! purchasable steps and priced from the settings unit costs. Adders and
//! markup are applied per box; run totals are a fold over the costed boxes.

use tracing::{debug, warn};

use crate::diagnostics::ConfigGap;
use crate::engineering::EngineeredBox;
use crate::settings::{CrateSettings, FastenerMode, Fasteners, FumigationMode, ThicknessTable};
use crate::units::volume_in3;

use super::types::{AdderBreakdown, BomRounded, CostBreakdown, CostTotals, CostedBox, CostingOutcome};

/// Round `quantity` up to the next multiple of `step_units`.
///
/// A step of 0 counts as 1. Non-finite and non-positive quantities round to 0.
pub fn round_up(quantity: f64, step_units: u32) -> u32 {
    if !quantity.is_finite() || quantity <= 0.0 {
        return 0;
    }
    let step = f64::from(step_units.max(1));
    let rounded = (quantity / step).ceil() * step;
    rounded.min(f64::from(u32::MAX)) as u32
}

pub struct CostEngine<'a> {
    settings: &'a CrateSettings,
}

impl<'a> CostEngine<'a> {
    pub fn new(settings: &'a CrateSettings) -> Self {
        Self { settings }
    }

    /// Cost every box and total the run.
    pub fn cost(&self, boxes: &[EngineeredBox]) -> CostingOutcome {
        if self.settings.pricing.labor.enabled {
            debug!("Labor is enabled in settings but is not costed; labor stays at 0");
        }

        let mut gaps = Vec::new();
        let costed: Vec<CostedBox> = boxes
            .iter()
            .map(|engineered| self.cost_box(engineered, &mut gaps))
            .collect();
        let totals = CostTotals::of(&costed);

        debug!(
            "Costed {} boxes: total {:.2}, sell {:.2}",
            costed.len(),
            totals.total_cost,
            totals.sell_price
        );

        CostingOutcome {
            boxes: costed,
            totals,
            gaps,
        }
    }

    /// Cost a single box, appending any price lookup misses to `gaps`.
    pub fn cost_box(&self, engineered: &EngineeredBox, gaps: &mut Vec<ConfigGap>) -> CostedBox {
        let pricing = &self.settings.pricing;
        let waste = &pricing.waste_pct_by_material;
        let step = pricing.rounding.step_units;
        let raw = &engineered.bom_raw;
        let box_index = engineered.nesting.index;

        let bom_rounded = BomRounded {
            plywood_sheets: round_up(raw.plywood_sheets * (1.0 + waste.plywood), step),
            lumber_sticks: round_up(raw.lumber_sticks * (1.0 + waste.lumber), step),
            foam_sheets: round_up(raw.foam_sheets * (1.0 + waste.foam), step),
            cardboard_sheets: round_up(raw.cardboard_sheets, step),
        };

        let costs = &pricing.unit_costs;
        let plywood_price = sheet_price(
            bom_rounded.plywood_sheets,
            &costs.plywood_per_sheet,
            engineered.plywood_thickness_in,
            || ConfigGap::MissingPlywoodPrice {
                box_index,
                profile: engineered.profile,
                thickness_in: engineered.plywood_thickness_in,
            },
            gaps,
        );
        let foam_price = sheet_price(
            bom_rounded.foam_sheets,
            &costs.foam_per_sheet,
            engineered.foam_thickness_in,
            || ConfigGap::MissingFoamPrice {
                box_index,
                thickness_in: engineered.foam_thickness_in,
            },
            gaps,
        );

        let plywood = f64::from(bom_rounded.plywood_sheets) * plywood_price;
        let lumber = f64::from(bom_rounded.lumber_sticks)
            * costs.lumber_per_stick.price_for(engineered.lumber_type);
        let foam = f64::from(bom_rounded.foam_sheets) * foam_price;
        let cardboard = f64::from(bom_rounded.cardboard_sheets) * costs.cardboard_per_sheet;
        let materials = plywood + lumber + foam + cardboard;

        let adders = self.adders(engineered, &bom_rounded);
        let labor = 0.0;

        let total_cost = materials + labor + adders.total;
        let markup = *pricing.markup_pct_by_profile.get(engineered.profile);
        let sell_price = total_cost * (1.0 + markup);

        CostedBox {
            engineered: engineered.clone(),
            bom_rounded,
            cost: CostBreakdown {
                plywood,
                lumber,
                foam,
                cardboard,
                materials,
                labor,
                adders,
            },
            total_cost,
            sell_price,
        }
    }

    fn adders(&self, engineered: &EngineeredBox, bom: &BomRounded) -> AdderBreakdown {
        let adders = &self.settings.adders;

        let fumigation = self.fumigation(engineered);

        let fasteners = if adders.fasteners.enabled {
            match adders.fasteners.mode {
                FastenerMode::PerSheet => {
                    adders.fasteners.per_sheet_rate * f64::from(bom.plywood_sheets)
                }
                FastenerMode::FixedPerBox => {
                    let nesting = &engineered.nesting;
                    let volume = volume_in3(nesting.face_a_cm, nesting.face_b_cm, nesting.depth_cm);
                    size_rate(volume, &adders.fasteners)
                }
            }
        } else {
            0.0
        };

        let corner_protectors = if adders.corner_protectors.enabled {
            adders.corner_protectors.rate_per_box
        } else {
            0.0
        };

        AdderBreakdown {
            fumigation,
            fasteners,
            corner_protectors,
            total: fumigation + fasteners + corner_protectors,
        }
    }

    /// Fumigation applies only to boxes whose profile requires ISPM-15.
    fn fumigation(&self, engineered: &EngineeredBox) -> f64 {
        let fumigation = &self.settings.adders.fumigation;
        let requires_ispm15 = self
            .settings
            .engineering
            .profile_defaults
            .get(engineered.profile)
            .requires_ispm15;

        if !fumigation.enabled || !requires_ispm15 {
            return 0.0;
        }

        let treatment = match fumigation.mode {
            FumigationMode::Fixed | FumigationMode::PerBox => fumigation.rate,
            FumigationMode::PerM3 => fumigation.rate * engineered.internal_final_cm.volume_m3(),
        };

        treatment
            + fumigation.transport_to_plant_fee.unwrap_or(0.0)
            + fumigation.ippc_marking_fee.unwrap_or(0.0)
    }
}

/// Flat fastener rate for a box of `volume_in3`.
fn size_rate(volume_in3: f64, fasteners: &Fasteners) -> f64 {
    let thresholds = &fasteners.volume_thresholds_in3;
    let rates = &fasteners.rates_by_size;

    if volume_in3 <= thresholds.small_max {
        rates.small
    } else if volume_in3 <= thresholds.medium_max {
        rates.medium
    } else {
        rates.large
    }
}

/// Per-sheet price by thickness. Nothing is looked up when no sheets are bought.
fn sheet_price(
    sheets: u32,
    table: &ThicknessTable,
    thickness_in: f64,
    gap: impl FnOnce() -> ConfigGap,
    gaps: &mut Vec<ConfigGap>,
) -> f64 {
    if sheets == 0 {
        return 0.0;
    }
    match table.price_for(thickness_in) {
        Some(price) => price,
        None => {
            let gap = gap();
            warn!("{}", gap);
            gaps.push(gap);
            0.0
        }
    }
}
