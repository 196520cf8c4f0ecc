//! Type definitions for the crate settings catalog.
//!
//! Field names serialize in camelCase and enum values in the upper-case forms
//! used by the settings editor, so an exported document can be re-imported
//! by any host that speaks the same schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// ROOT
// =============================================================================

/// The single versioned configuration object consumed by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateSettings {
    pub meta: SettingsMeta,
    pub materials: Materials,
    pub nesting: NestingSettings,
    /// One entry per fragility level 1..=5.
    pub protection_by_fragility: Vec<ProtectionLevel>,
    pub engineering: EngineeringSettings,
    pub pricing: Pricing,
    pub adders: Adders,
}

impl CrateSettings {
    /// Protection entry for a fragility level, if configured.
    pub fn protection_for(&self, fragility: u8) -> Option<&ProtectionLevel> {
        self.protection_by_fragility
            .iter()
            .find(|p| p.fragility == fragility)
    }
}

/// Version stamp written on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsMeta {
    pub version: String,
    /// RFC 3339 timestamp of the save that produced this version.
    pub updated_at: String,
    pub updated_by: String,
}

// =============================================================================
// ENUMS
// =============================================================================

/// Named packaging standard bundling structural and compliance defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "STANDARD_LOCAL")]
    StandardLocal,
    #[serde(rename = "EXPORT_ISPM15")]
    ExportIspm15,
    #[serde(rename = "PREMIUM_ART_IT")]
    PremiumArtIt,
    #[serde(rename = "MACHINERY_ISPM15")]
    MachineryIspm15,
}

impl Profile {
    pub const ALL: [Profile; 4] = [
        Profile::StandardLocal,
        Profile::ExportIspm15,
        Profile::PremiumArtIt,
        Profile::MachineryIspm15,
    ];

    /// Schema key for this profile.
    pub fn key(self) -> &'static str {
        match self {
            Profile::StandardLocal => "STANDARD_LOCAL",
            Profile::ExportIspm15 => "EXPORT_ISPM15",
            Profile::PremiumArtIt => "PREMIUM_ART_IT",
            Profile::MachineryIspm15 => "MACHINERY_ISPM15",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Nominal lumber gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LumberType {
    #[serde(rename = "1x4")]
    OneByFour,
    #[serde(rename = "2x4")]
    TwoByFour,
}

impl LumberType {
    pub fn key(self) -> &'static str {
        match self {
            LumberType::OneByFour => "1x4",
            LumberType::TwoByFour => "2x4",
        }
    }
}

impl fmt::Display for LumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// PROFILE-KEYED MAP
// =============================================================================

/// A map with exactly one value per [`Profile`].
///
/// Serializes as an object keyed by the profile names. Missing keys fail
/// deserialization, so a lookup can never miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMap<T> {
    #[serde(rename = "STANDARD_LOCAL")]
    pub standard_local: T,
    #[serde(rename = "EXPORT_ISPM15")]
    pub export_ispm15: T,
    #[serde(rename = "PREMIUM_ART_IT")]
    pub premium_art_it: T,
    #[serde(rename = "MACHINERY_ISPM15")]
    pub machinery_ispm15: T,
}

impl<T> ProfileMap<T> {
    pub fn get(&self, profile: Profile) -> &T {
        match profile {
            Profile::StandardLocal => &self.standard_local,
            Profile::ExportIspm15 => &self.export_ispm15,
            Profile::PremiumArtIt => &self.premium_art_it,
            Profile::MachineryIspm15 => &self.machinery_ispm15,
        }
    }

    pub fn get_mut(&mut self, profile: Profile) -> &mut T {
        match profile {
            Profile::StandardLocal => &mut self.standard_local,
            Profile::ExportIspm15 => &mut self.export_ispm15,
            Profile::PremiumArtIt => &mut self.premium_art_it,
            Profile::MachineryIspm15 => &mut self.machinery_ispm15,
        }
    }

    /// `(profile, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Profile, &T)> {
        Profile::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

// =============================================================================
// THICKNESS-KEYED PRICE TABLE
// =============================================================================

/// Sheet price table keyed by material thickness in inches.
///
/// On the wire this is an object keyed by the stringified thickness
/// (`{"0.5": 32.0, "0.75": 41.5}`). Keys are parsed when the table is built;
/// a key that is not a finite, non-negative number is rejected, as are two
/// keys naming the same thickness (`"0.5"` and `"0.50"`). Thicknesses keep
/// full precision and are written back in their shortest form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ThicknessTable {
    /// Keyed by the thickness bit pattern, which orders like the value for
    /// non-negative floats.
    entries: BTreeMap<u64, f64>,
}

impl ThicknessTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_for(thickness_in: f64) -> Option<u64> {
        if !thickness_in.is_finite() || thickness_in < 0.0 {
            return None;
        }
        // -0.0 and 0.0 are the same thickness.
        let thickness_in = if thickness_in == 0.0 { 0.0 } else { thickness_in };
        Some(thickness_in.to_bits())
    }

    /// Insert or replace the price for a thickness. Returns `false` and leaves
    /// the table unchanged when the thickness is not a usable key.
    pub fn insert(&mut self, thickness_in: f64, price: f64) -> bool {
        match Self::key_for(thickness_in) {
            Some(key) => {
                self.entries.insert(key, price);
                true
            }
            None => false,
        }
    }

    /// Price per sheet for exactly this thickness.
    pub fn price_for(&self, thickness_in: f64) -> Option<f64> {
        Self::key_for(thickness_in).and_then(|k| self.entries.get(&k).copied())
    }

    pub fn contains(&self, thickness_in: f64) -> bool {
        self.price_for(thickness_in).is_some()
    }

    /// `(thickness_in, price)` pairs, thinnest first.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (f64::from_bits(*k), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical string form of a thickness key ("0.5", "0.1875", "1").
pub fn thickness_key(thickness_in: f64) -> String {
    format!("{}", thickness_in)
}

impl TryFrom<BTreeMap<String, f64>> for ThicknessTable {
    type Error = String;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut table = ThicknessTable::new();
        let mut seen: BTreeMap<u64, String> = BTreeMap::new();

        for (key, price) in raw {
            let thickness: f64 = key
                .trim()
                .parse()
                .map_err(|_| format!("thickness key '{}' is not a number", key))?;
            let bits = Self::key_for(thickness).ok_or_else(|| {
                format!(
                    "thickness key '{}' must be a finite, non-negative number",
                    key
                )
            })?;
            if let Some(previous) = seen.get(&bits) {
                return Err(format!(
                    "thickness keys '{}' and '{}' name the same thickness",
                    previous, key
                ));
            }
            seen.insert(bits, key);
            table.entries.insert(bits, price);
        }
        Ok(table)
    }
}

impl From<ThicknessTable> for BTreeMap<String, f64> {
    fn from(table: ThicknessTable) -> Self {
        table
            .iter()
            .map(|(thickness, price)| (thickness_key(thickness), price))
            .collect()
    }
}

// =============================================================================
// MATERIALS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Materials {
    /// Purchasable lumber sticks. The first entry's length is the stick
    /// length used for BOM estimates.
    pub lumber: Vec<LumberStock>,
    pub plywood: SheetStock,
    pub foam: SheetStock,
    pub cardboard: CardboardStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumberStock {
    #[serde(rename = "type")]
    pub lumber_type: LumberType,
    pub length_in: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetStock {
    pub sheet_width_in: f64,
    pub sheet_height_in: f64,
    pub thickness_options_in: Vec<f64>,
}

impl SheetStock {
    pub fn sheet_area_in2(&self) -> f64 {
        self.sheet_width_in * self.sheet_height_in
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardboardStock {
    pub thickness_in: f64,
}

// =============================================================================
// NESTING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestingSettings {
    /// Units whose shortest side is at most this value may share a crate.
    pub max_depth_for_nesting_cm: f64,
    pub max_items_per_box: u32,
    /// Face similarity tolerance, 0-100, relative to the base unit.
    pub similarity_tolerance_pct: f64,
    /// Whether a candidate may match the base with its faces swapped.
    pub allow_rotation_default: bool,
}

// =============================================================================
// PROTECTION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionLevel {
    pub fragility: u8,
    pub perimeter_foam_in: f64,
    pub between_items_foam_in: f64,
    pub cardboard_in: f64,
    pub double_perimeter: bool,
}

// =============================================================================
// ENGINEERING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringSettings {
    pub thresholds: Thresholds,
    pub plywood_thickness_by_profile: ProfileMap<f64>,
    pub profile_defaults: ProfileMap<ProfileDefaults>,
}

/// Cutoffs in inches and pounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(rename = "use2x4IfWeightLbAbove")]
    pub use_2x4_if_weight_lb_above: f64,
    #[serde(rename = "use2x4IfLongestSideInAbove")]
    pub use_2x4_if_longest_side_in_above: f64,
    #[serde(rename = "skidIfWeightLbAbove")]
    pub skid_if_weight_lb_above: f64,
    #[serde(rename = "skidIfLongestSideInAbove")]
    pub skid_if_longest_side_in_above: f64,
    #[serde(rename = "addRibsIfLongestSideInAbove")]
    pub add_ribs_if_longest_side_in_above: f64,
    #[serde(rename = "addXBracingIfAspectRatioAbove")]
    pub add_x_bracing_if_aspect_ratio_above: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDefaults {
    pub min_fragility: u8,
    #[serde(rename = "requiresISPM15")]
    pub requires_ispm15: bool,
    pub default_lumber: LumberType,
    pub prefer_skid: bool,
}

// =============================================================================
// PRICING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub rounding: Rounding,
    pub waste_pct_by_material: WastePct,
    pub labor: Labor,
    pub unit_costs: UnitCosts,
    /// Markup fraction (0-1) applied on top of total cost.
    pub markup_pct_by_profile: ProfileMap<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Round up to the next multiple of the step. Quantities never round down.
    Ceil,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rounding {
    pub step_units: u32,
    pub mode: RoundingMode,
}

/// Waste fractions (0-1). Cardboard carries no waste allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WastePct {
    pub plywood: f64,
    pub lumber: f64,
    pub foam: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Labor {
    pub enabled: bool,
    pub rate_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCosts {
    pub lumber_per_stick: LumberPrices,
    pub plywood_per_sheet: ThicknessTable,
    pub foam_per_sheet: ThicknessTable,
    pub cardboard_per_sheet: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumberPrices {
    #[serde(rename = "1x4")]
    pub one_by_four: f64,
    #[serde(rename = "2x4")]
    pub two_by_four: f64,
}

impl LumberPrices {
    pub fn price_for(&self, lumber: LumberType) -> f64 {
        match lumber {
            LumberType::OneByFour => self.one_by_four,
            LumberType::TwoByFour => self.two_by_four,
        }
    }
}

// =============================================================================
// ADDERS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adders {
    pub fumigation: Fumigation,
    pub fasteners: Fasteners,
    pub corner_protectors: CornerProtectors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FumigationMode {
    Fixed,
    #[serde(rename = "PER_M3")]
    PerM3,
    PerBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fumigation {
    pub enabled: bool,
    pub mode: FumigationMode,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_to_plant_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ippc_marking_fee: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FastenerMode {
    FixedPerBox,
    PerSheet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fasteners {
    pub enabled: bool,
    pub mode: FastenerMode,
    pub volume_thresholds_in3: VolumeThresholds,
    pub rates_by_size: SizeRates,
    pub per_sheet_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeThresholds {
    pub small_max: f64,
    pub medium_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRates {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerProtectors {
    pub enabled: bool,
    pub rate_per_box: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness_table_lookup_is_exact() {
        let mut table = ThicknessTable::new();
        assert!(table.insert(0.5, 32.0));
        assert!(table.insert(0.5004, 99.0));
        assert!(table.insert(-0.0, 1.0));

        assert_eq!(table.price_for(0.5), Some(32.0));
        assert_eq!(table.price_for(0.5004), Some(99.0));
        assert_eq!(table.price_for(0.0), Some(1.0));
        assert_eq!(table.price_for(0.625), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_thickness_table_rejects_bad_keys() {
        let mut table = ThicknessTable::new();
        assert!(!table.insert(f64::NAN, 1.0));
        assert!(!table.insert(-0.5, 1.0));
        assert!(table.is_empty());

        let raw: BTreeMap<String, f64> = [("thick".to_string(), 3.0)].into_iter().collect();
        let err = ThicknessTable::try_from(raw).unwrap_err();
        assert!(err.contains("thick"), "unexpected error: {}", err);
    }

    #[test]
    fn test_thickness_table_json_shape() {
        let json = r#"{"0.5": 32.0, "0.75": 41.5}"#;
        let table: ThicknessTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.price_for(0.75), Some(41.5));

        let out = serde_json::to_value(&table).unwrap();
        assert_eq!(out["0.5"], 32.0);
        assert_eq!(out["0.75"], 41.5);
    }

    #[test]
    fn test_thickness_table_keeps_fine_keys_on_round_trip() {
        let json = r#"{"0.0625": 9.0, "0.1875": 20.0, "0.5": 32.0, "0.5004": 99.0, "1.0": 18.0}"#;
        let table: ThicknessTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.price_for(0.1875), Some(20.0));
        assert_eq!(table.price_for(0.5), Some(32.0));
        assert_eq!(table.price_for(0.5004), Some(99.0));

        let out = serde_json::to_string(&table).unwrap();
        assert_eq!(
            out,
            r#"{"0.0625":9.0,"0.1875":20.0,"0.5":32.0,"0.5004":99.0,"1":18.0}"#
        );
        let back: ThicknessTable = serde_json::from_str(&out).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_thickness_table_rejects_duplicate_thickness() {
        let json = r#"{"0.5": 32.0, "0.50": 99.0}"#;
        let err = serde_json::from_str::<ThicknessTable>(json).unwrap_err();
        assert!(err.to_string().contains("same thickness"), "unexpected error: {}", err);
    }

    #[test]
    fn test_profile_enum_wire_names() {
        let names: Vec<String> = Profile::ALL
            .iter()
            .map(|p| serde_json::to_string(p).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "\"STANDARD_LOCAL\"",
                "\"EXPORT_ISPM15\"",
                "\"PREMIUM_ART_IT\"",
                "\"MACHINERY_ISPM15\""
            ]
        );
        assert_eq!(
            serde_json::to_string(&FumigationMode::PerM3).unwrap(),
            "\"PER_M3\""
        );
        assert_eq!(
            serde_json::to_string(&FastenerMode::FixedPerBox).unwrap(),
            "\"FIXED_PER_BOX\""
        );
        assert_eq!(
            serde_json::to_string(&LumberType::TwoByFour).unwrap(),
            "\"2x4\""
        );
    }

    #[test]
    fn test_profile_map_requires_every_profile() {
        let json = r#"{"STANDARD_LOCAL": 0.5, "EXPORT_ISPM15": 0.75, "PREMIUM_ART_IT": 0.75}"#;
        let result: Result<ProfileMap<f64>, _> = serde_json::from_str(json);
        assert!(result.is_err(), "missing MACHINERY_ISPM15 must not parse");
    }
}
