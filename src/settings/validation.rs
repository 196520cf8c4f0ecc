use serde::Serialize;
use thiserror::Error;

use super::types::{CrateSettings, Profile, SheetStock, ThicknessTable};

/// One violated constraint. `field` is the dotted camelCase path of the
/// offending value, e.g. `pricing.wastePctByMaterial.foam`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
    pub value: String,
}

/// Settings failed schema checks. Carries every violation found, not just
/// the first.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("settings failed validation with {} violation(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Field paths of all violations, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate settings, returning them unchanged when every constraint holds.
pub fn validate(settings: CrateSettings) -> Result<CrateSettings, ValidationError> {
    let violations = violations(&settings);
    if violations.is_empty() {
        Ok(settings)
    } else {
        Err(ValidationError { violations })
    }
}

/// Collect every violated constraint. An empty list means the settings are valid.
pub fn violations(settings: &CrateSettings) -> Vec<Violation> {
    let mut check = Checker::default();

    if settings.meta.version.trim().is_empty() {
        check.push("meta.version", "Version id must not be empty", "");
    }

    // Materials
    let materials = &settings.materials;
    if materials.lumber.is_empty() {
        check.push("materials.lumber", "At least one lumber stick length is required", "[]");
    }
    for (i, stick) in materials.lumber.iter().enumerate() {
        check.positive(&format!("materials.lumber[{}].lengthIn", i), stick.length_in);
    }
    check.sheet("materials.plywood", &materials.plywood);
    check.sheet("materials.foam", &materials.foam);
    check.non_negative("materials.cardboard.thicknessIn", materials.cardboard.thickness_in);

    // Nesting
    let nesting = &settings.nesting;
    check.non_negative("nesting.maxDepthForNestingCm", nesting.max_depth_for_nesting_cm);
    if nesting.max_items_per_box < 1 {
        check.push(
            "nesting.maxItemsPerBox",
            "At least one item per box is required",
            &nesting.max_items_per_box.to_string(),
        );
    }
    check.bounded("nesting.similarityTolerancePct", nesting.similarity_tolerance_pct, 100.0);

    // Protection: exactly one entry per fragility level 1..=5
    let protection = &settings.protection_by_fragility;
    if protection.len() != 5 {
        check.push(
            "protectionByFragility",
            &format!("Expected exactly 5 entries, found {}", protection.len()),
            &protection.len().to_string(),
        );
    }
    for level in 1..=5u8 {
        let count = protection.iter().filter(|p| p.fragility == level).count();
        if count != 1 {
            check.push(
                "protectionByFragility",
                &format!("Fragility {} must appear exactly once, found {}", level, count),
                &level.to_string(),
            );
        }
    }
    for (i, level) in protection.iter().enumerate() {
        let base = format!("protectionByFragility[{}]", i);
        if !(1..=5).contains(&level.fragility) {
            check.push(
                &format!("{}.fragility", base),
                "Fragility must be between 1 and 5",
                &level.fragility.to_string(),
            );
        }
        check.non_negative(&format!("{}.perimeterFoamIn", base), level.perimeter_foam_in);
        check.non_negative(&format!("{}.betweenItemsFoamIn", base), level.between_items_foam_in);
        check.non_negative(&format!("{}.cardboardIn", base), level.cardboard_in);
        check.priced(
            &format!("{}.perimeterFoamIn", base),
            level.perimeter_foam_in,
            &settings.pricing.unit_costs.foam_per_sheet,
            "pricing.unitCosts.foamPerSheet",
        );
    }

    // Engineering
    let t = &settings.engineering.thresholds;
    check.non_negative("engineering.thresholds.use2x4IfWeightLbAbove", t.use_2x4_if_weight_lb_above);
    check.non_negative(
        "engineering.thresholds.use2x4IfLongestSideInAbove",
        t.use_2x4_if_longest_side_in_above,
    );
    check.non_negative("engineering.thresholds.skidIfWeightLbAbove", t.skid_if_weight_lb_above);
    check.non_negative(
        "engineering.thresholds.skidIfLongestSideInAbove",
        t.skid_if_longest_side_in_above,
    );
    check.non_negative(
        "engineering.thresholds.addRibsIfLongestSideInAbove",
        t.add_ribs_if_longest_side_in_above,
    );
    check.non_negative(
        "engineering.thresholds.addXBracingIfAspectRatioAbove",
        t.add_x_bracing_if_aspect_ratio_above,
    );

    for (profile, thickness) in settings.engineering.plywood_thickness_by_profile.iter() {
        let field = format!("engineering.plywoodThicknessByProfile.{}", profile);
        check.non_negative(&field, *thickness);
        check.priced(
            &field,
            *thickness,
            &settings.pricing.unit_costs.plywood_per_sheet,
            "pricing.unitCosts.plywoodPerSheet",
        );
    }
    for (profile, defaults) in settings.engineering.profile_defaults.iter() {
        if !(1..=5).contains(&defaults.min_fragility) {
            check.push(
                &format!("engineering.profileDefaults.{}.minFragility", profile),
                "Minimum fragility must be between 1 and 5",
                &defaults.min_fragility.to_string(),
            );
        }
    }

    // Pricing
    let pricing = &settings.pricing;
    if pricing.rounding.step_units < 1 {
        check.push(
            "pricing.rounding.stepUnits",
            "Rounding step must be at least 1",
            &pricing.rounding.step_units.to_string(),
        );
    }
    check.bounded("pricing.wastePctByMaterial.plywood", pricing.waste_pct_by_material.plywood, 1.0);
    check.bounded("pricing.wastePctByMaterial.lumber", pricing.waste_pct_by_material.lumber, 1.0);
    check.bounded("pricing.wastePctByMaterial.foam", pricing.waste_pct_by_material.foam, 1.0);
    check.non_negative("pricing.labor.ratePerHour", pricing.labor.rate_per_hour);

    let costs = &pricing.unit_costs;
    check.non_negative("pricing.unitCosts.lumberPerStick.1x4", costs.lumber_per_stick.one_by_four);
    check.non_negative("pricing.unitCosts.lumberPerStick.2x4", costs.lumber_per_stick.two_by_four);
    check.table("pricing.unitCosts.plywoodPerSheet", &costs.plywood_per_sheet);
    check.table("pricing.unitCosts.foamPerSheet", &costs.foam_per_sheet);
    check.non_negative("pricing.unitCosts.cardboardPerSheet", costs.cardboard_per_sheet);

    for profile in Profile::ALL {
        check.bounded(
            &format!("pricing.markupPctByProfile.{}", profile),
            *pricing.markup_pct_by_profile.get(profile),
            1.0,
        );
    }

    // Adders
    let fumigation = &settings.adders.fumigation;
    check.non_negative("adders.fumigation.rate", fumigation.rate);
    if let Some(fee) = fumigation.transport_to_plant_fee {
        check.non_negative("adders.fumigation.transportToPlantFee", fee);
    }
    if let Some(fee) = fumigation.ippc_marking_fee {
        check.non_negative("adders.fumigation.ippcMarkingFee", fee);
    }

    let fasteners = &settings.adders.fasteners;
    let thresholds = &fasteners.volume_thresholds_in3;
    check.non_negative("adders.fasteners.volumeThresholdsIn3.smallMax", thresholds.small_max);
    check.non_negative("adders.fasteners.volumeThresholdsIn3.mediumMax", thresholds.medium_max);
    if thresholds.small_max > thresholds.medium_max {
        check.push(
            "adders.fasteners.volumeThresholdsIn3",
            &format!(
                "smallMax ({}) must not exceed mediumMax ({})",
                thresholds.small_max, thresholds.medium_max
            ),
            &thresholds.small_max.to_string(),
        );
    }
    check.non_negative("adders.fasteners.ratesBySize.small", fasteners.rates_by_size.small);
    check.non_negative("adders.fasteners.ratesBySize.medium", fasteners.rates_by_size.medium);
    check.non_negative("adders.fasteners.ratesBySize.large", fasteners.rates_by_size.large);
    check.non_negative("adders.fasteners.perSheetRate", fasteners.per_sheet_rate);
    check.non_negative(
        "adders.cornerProtectors.ratePerBox",
        settings.adders.corner_protectors.rate_per_box,
    );

    check.violations
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn push(&mut self, field: &str, message: &str, value: &str) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.to_string(),
            value: value.to_string(),
        });
    }

    /// Finite and >= 0. Returns whether the value passed.
    fn non_negative(&mut self, field: &str, value: f64) -> bool {
        if !value.is_finite() {
            self.push(field, &format!("{} must be a finite number", field), &value.to_string());
            false
        } else if value < 0.0 {
            self.push(field, &format!("{} must not be negative", field), &value.to_string());
            false
        } else {
            true
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        if self.non_negative(field, value) && value == 0.0 {
            self.push(field, &format!("{} must be greater than 0", field), "0");
        }
    }

    fn bounded(&mut self, field: &str, value: f64, max: f64) {
        if self.non_negative(field, value) && value > max {
            self.push(
                field,
                &format!("{} out of range (0-{})", value, max),
                &value.to_string(),
            );
        }
    }

    fn sheet(&mut self, base: &str, sheet: &SheetStock) {
        self.positive(&format!("{}.sheetWidthIn", base), sheet.sheet_width_in);
        self.positive(&format!("{}.sheetHeightIn", base), sheet.sheet_height_in);
        for (i, thickness) in sheet.thickness_options_in.iter().enumerate() {
            self.positive(&format!("{}.thicknessOptionsIn[{}]", base, i), *thickness);
        }
    }

    fn table(&mut self, base: &str, table: &ThicknessTable) {
        for (thickness, price) in table.iter() {
            self.non_negative(&format!("{}.{}", base, thickness), price);
        }
    }

    /// A thickness used by the engineering stage must have a sheet price.
    fn priced(&mut self, field: &str, thickness: f64, table: &ThicknessTable, table_name: &str) {
        if thickness.is_finite() && thickness >= 0.0 && !table.contains(thickness) {
            self.push(
                field,
                &format!("No price for thickness {} in {}", thickness, table_name),
                &thickness.to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::defaults::default_settings;

    #[test]
    fn test_valid_defaults_no_violations() {
        let settings = default_settings();
        assert!(validate(settings).is_ok());
    }

    #[test]
    fn test_missing_protection_level() {
        let mut settings = default_settings();
        settings.protection_by_fragility.retain(|p| p.fragility != 3);

        let err = validate(settings).unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.field == "protectionByFragility" && v.message.contains("exactly 5")));
        assert!(err
            .violations
            .iter()
            .any(|v| v.message.contains("Fragility 3 must appear exactly once")));
    }

    #[test]
    fn test_duplicate_protection_level() {
        let mut settings = default_settings();
        settings.protection_by_fragility[4].fragility = 4;

        let err = validate(settings).unwrap_err();
        let messages: Vec<&str> = err.violations.iter().map(|v| v.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("Fragility 4")));
        assert!(messages.iter().any(|m| m.contains("Fragility 5")));
    }

    #[test]
    fn test_waste_out_of_range() {
        let mut settings = default_settings();
        settings.pricing.waste_pct_by_material.foam = 1.5;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["pricing.wastePctByMaterial.foam"]);
        assert!(err.violations[0].message.contains("1.5"));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut settings = default_settings();
        settings.nesting.max_depth_for_nesting_cm = f64::NAN;
        settings.adders.fumigation.rate = f64::INFINITY;

        let err = validate(settings).unwrap_err();
        let fields = err.fields();
        assert!(fields.contains(&"nesting.maxDepthForNestingCm"));
        assert!(fields.contains(&"adders.fumigation.rate"));
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut settings = default_settings();
        settings.pricing.unit_costs.cardboard_per_sheet = -1.0;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["pricing.unitCosts.cardboardPerSheet"]);
        assert!(err.violations[0].message.contains("must not be negative"));
    }

    #[test]
    fn test_tolerance_bounded_to_100() {
        let mut settings = default_settings();
        settings.nesting.similarity_tolerance_pct = 150.0;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["nesting.similarityTolerancePct"]);
    }

    #[test]
    fn test_zero_items_per_box_and_zero_step() {
        let mut settings = default_settings();
        settings.nesting.max_items_per_box = 0;
        settings.pricing.rounding.step_units = 0;

        let err = validate(settings).unwrap_err();
        let fields = err.fields();
        assert!(fields.contains(&"nesting.maxItemsPerBox"));
        assert!(fields.contains(&"pricing.rounding.stepUnits"));
    }

    #[test]
    fn test_unpriced_plywood_thickness() {
        let mut settings = default_settings();
        *settings
            .engineering
            .plywood_thickness_by_profile
            .get_mut(Profile::PremiumArtIt) = 0.625;

        let err = validate(settings).unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["engineering.plywoodThicknessByProfile.PREMIUM_ART_IT"]
        );
        assert!(err.violations[0].message.contains("plywoodPerSheet"));
    }

    #[test]
    fn test_unpriced_foam_thickness() {
        let mut settings = default_settings();
        settings.protection_by_fragility[0].perimeter_foam_in = 0.25;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["protectionByFragility[0].perimeterFoamIn"]);
    }

    #[test]
    fn test_empty_lumber_list() {
        let mut settings = default_settings();
        settings.materials.lumber.clear();

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["materials.lumber"]);
    }

    #[test]
    fn test_fastener_thresholds_inverted() {
        let mut settings = default_settings();
        settings.adders.fasteners.volume_thresholds_in3.small_max = 200_000.0;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["adders.fasteners.volumeThresholdsIn3"]);
    }

    #[test]
    fn test_markup_out_of_range() {
        let mut settings = default_settings();
        *settings
            .pricing
            .markup_pct_by_profile
            .get_mut(Profile::ExportIspm15) = 2.0;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.fields(), vec!["pricing.markupPctByProfile.EXPORT_ISPM15"]);
    }

    #[test]
    fn test_multiple_violations_collected() {
        let mut settings = default_settings();
        settings.meta.version = String::new();
        settings.materials.plywood.sheet_width_in = 0.0;
        settings.engineering.profile_defaults.standard_local.min_fragility = 9;

        let err = validate(settings).unwrap_err();
        assert_eq!(err.violations.len(), 3);
        let text = err.to_string();
        assert!(text.contains("3 violation(s)"), "got: {}", text);
        assert!(text.contains("materials.plywood.sheetWidthIn"));
    }
}
