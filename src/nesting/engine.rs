//! Greedy footprint grouping.
//!
//! Units thin enough to stack are grouped with later units whose faces are
//! within tolerance of the group's first (largest) unit. Processing order is
//! largest `face_a` first and ties keep draft order, so the result is fully
//! determined by the input. There is no rebalancing once a group closes.

use tracing::debug;

use crate::draft::CrateDraft;
use crate::settings::CrateSettings;

use super::types::{NestingBox, NestingUnit};

/// Absolute slack on tolerance comparisons so a face exactly at the limit is
/// not rejected by float rounding.
const TOLERANCE_SLACK_CM: f64 = 1e-9;

/// Expand every item into `qty` units with sorted axes.
pub fn expand_units(draft: &CrateDraft) -> Vec<NestingUnit> {
    draft
        .items
        .iter()
        .enumerate()
        .flat_map(|(index, item)| {
            (0..item.qty).map(move |_| NestingUnit::from_item(index, item))
        })
        .collect()
}

/// Whether `candidate` may share a crate with `base`.
///
/// The tolerance is a percentage of the base's faces only, so the relation
/// is not symmetric: a 100 cm base accepts a 90 cm candidate at 10%, but a
/// 90 cm base rejects a 100 cm candidate.
pub fn is_compatible(
    base: &NestingUnit,
    candidate: &NestingUnit,
    tolerance_pct: f64,
    allow_rotation: bool,
) -> bool {
    let within = |value: f64, reference: f64| {
        (value - reference).abs() <= reference * tolerance_pct / 100.0 + TOLERANCE_SLACK_CM
    };

    let straight = within(candidate.face_a_cm, base.face_a_cm)
        && within(candidate.face_b_cm, base.face_b_cm);
    if straight {
        return true;
    }

    allow_rotation
        && within(candidate.face_b_cm, base.face_a_cm)
        && within(candidate.face_a_cm, base.face_b_cm)
}

/// Partition the draft's units into crates.
///
/// Output is sorted by footprint (`face_a * face_b`) descending and each box
/// carries its position in `index`.
pub fn nest(draft: &CrateDraft, settings: &CrateSettings) -> Vec<NestingBox> {
    let config = &settings.nesting;
    let max_items = config.max_items_per_box.max(1) as usize;

    let (mut candidates, non_candidates): (Vec<NestingUnit>, Vec<NestingUnit>) =
        expand_units(draft)
            .into_iter()
            .partition(|u| u.depth_cm <= config.max_depth_for_nesting_cm);

    candidates.sort_by(|a, b| b.face_a_cm.total_cmp(&a.face_a_cm));

    let mut consumed = vec![false; candidates.len()];
    let mut boxes = Vec::new();

    for base_idx in 0..candidates.len() {
        if consumed[base_idx] {
            continue;
        }
        consumed[base_idx] = true;
        let base = &candidates[base_idx];
        let mut group = vec![base.clone()];

        for idx in (base_idx + 1)..candidates.len() {
            if group.len() >= max_items {
                break;
            }
            if consumed[idx] {
                continue;
            }
            if is_compatible(
                base,
                &candidates[idx],
                config.similarity_tolerance_pct,
                config.allow_rotation_default,
            ) {
                consumed[idx] = true;
                group.push(candidates[idx].clone());
            }
        }

        boxes.push(NestingBox::from_units(group));
    }

    let grouped = boxes.len();
    boxes.extend(
        non_candidates
            .into_iter()
            .map(|unit| NestingBox::from_units(vec![unit])),
    );

    boxes.sort_by(|a, b| b.footprint_cm2().total_cmp(&a.footprint_cm2()));
    for (index, nesting_box) in boxes.iter_mut().enumerate() {
        nesting_box.index = index;
    }

    debug!(
        "Nested {} units into {} boxes ({} from stackable units)",
        draft.unit_count(),
        boxes.len(),
        grouped
    );
    boxes
}
