use serde::{Deserialize, Serialize};

use crate::draft::Item;

/// One physical instance of an item with its dimensions sorted
/// (`depth <= face_b <= face_a`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestingUnit {
    /// Position of the source item in the draft.
    pub item_index: usize,
    /// Shortest side.
    pub depth_cm: f64,
    /// Middle side.
    pub face_b_cm: f64,
    /// Longest side.
    pub face_a_cm: f64,
    pub weight_kg: f64,
    pub fragility: u8,
}

impl NestingUnit {
    pub fn from_item(item_index: usize, item: &Item) -> Self {
        let mut dims = [item.length_cm, item.width_cm, item.height_cm];
        dims.sort_by(|a, b| a.total_cmp(b));
        Self {
            item_index,
            depth_cm: dims[0],
            face_b_cm: dims[1],
            face_a_cm: dims[2],
            weight_kg: item.weight_kg,
            fragility: item.fragility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoxType {
    /// A single unit in its own crate.
    Individual,
    /// Several units stacked along their depth in one crate.
    Consolidated,
}

/// A candidate crate produced by the nesting stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestingBox {
    /// Position in the nesting output (largest footprint first).
    pub index: usize,
    #[serde(rename = "type")]
    pub box_type: BoxType,
    pub units: Vec<NestingUnit>,
    pub face_a_cm: f64,
    pub face_b_cm: f64,
    /// Sum of member depths.
    pub depth_cm: f64,
    pub total_weight_kg: f64,
    pub max_fragility: u8,
}

impl NestingBox {
    /// Aggregate a group of units. Faces take the largest member, depth is
    /// the stacked sum.
    pub fn from_units(units: Vec<NestingUnit>) -> Self {
        let box_type = if units.len() > 1 {
            BoxType::Consolidated
        } else {
            BoxType::Individual
        };
        let face_a_cm = units.iter().map(|u| u.face_a_cm).fold(0.0, f64::max);
        let face_b_cm = units.iter().map(|u| u.face_b_cm).fold(0.0, f64::max);
        let depth_cm = units.iter().map(|u| u.depth_cm).sum();
        let total_weight_kg = units.iter().map(|u| u.weight_kg).sum();
        let max_fragility = units.iter().map(|u| u.fragility).max().unwrap_or(0);

        Self {
            index: 0,
            box_type,
            units,
            face_a_cm,
            face_b_cm,
            depth_cm,
            total_weight_kg,
            max_fragility,
        }
    }

    pub fn item_count(&self) -> usize {
        self.units.len()
    }

    pub fn footprint_cm2(&self) -> f64 {
        self.face_a_cm * self.face_b_cm
    }
}
