use serde::Serialize;
use thiserror::Error;

use crate::settings::Profile;

/// A settings lookup that missed during engineering or costing.
///
/// Gaps never abort a run: the affected quantity or price falls back to zero
/// and the gap is reported alongside the output. Settings that pass
/// validation do not produce gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConfigGap {
    #[error("Box {box_index}: no protection entry for fragility {fragility}")]
    MissingProtection { box_index: usize, fragility: u8 },

    #[error("Box {box_index}: no plywood price for {thickness_in} in ({profile})")]
    MissingPlywoodPrice {
        box_index: usize,
        profile: Profile,
        thickness_in: f64,
    },

    #[error("Box {box_index}: no foam price for {thickness_in} in")]
    MissingFoamPrice { box_index: usize, thickness_in: f64 },

    #[error("Box {box_index}: no lumber stock configured")]
    NoLumberStock { box_index: usize },

    #[error("Box {box_index}: {material} sheet area is zero")]
    ZeroSheetArea {
        box_index: usize,
        material: &'static str,
    },
}

impl ConfigGap {
    pub fn box_index(&self) -> usize {
        match self {
            ConfigGap::MissingProtection { box_index, .. }
            | ConfigGap::MissingPlywoodPrice { box_index, .. }
            | ConfigGap::MissingFoamPrice { box_index, .. }
            | ConfigGap::NoLumberStock { box_index }
            | ConfigGap::ZeroSheetArea { box_index, .. } => *box_index,
        }
    }
}
