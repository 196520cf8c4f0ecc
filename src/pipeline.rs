//! The full quote chain: nesting, engineering, costing.
//!
//! Each stage stays callable on its own; the pipeline adds boundary
//! validation of the draft and merges the stages' configuration gaps.

use serde::Serialize;
use tracing::{info, warn};

use crate::costing::{CostEngine, CostTotals, CostedBox};
use crate::diagnostics::ConfigGap;
use crate::draft::CrateDraft;
use crate::engineering::{LinerSurface, ProfileOverrides, RuleEngine};
use crate::error::CrateCostError;
use crate::nesting::{nest, NestingBox};
use crate::settings::CrateSettings;

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub nesting: Vec<NestingBox>,
    pub boxes: Vec<CostedBox>,
    pub totals: CostTotals,
    /// Engineering gaps first, then costing gaps.
    pub gaps: Vec<ConfigGap>,
}

pub struct Pipeline<'a> {
    settings: &'a CrateSettings,
    overrides: ProfileOverrides,
    liner: Option<Box<dyn LinerSurface>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a CrateSettings) -> Self {
        Self {
            settings,
            overrides: ProfileOverrides::new(),
            liner: None,
        }
    }

    /// Per-box profiles, keyed by nesting box index.
    pub fn with_overrides(mut self, overrides: ProfileOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_liner(mut self, liner: Box<dyn LinerSurface>) -> Self {
        self.liner = Some(liner);
        self
    }

    /// Validate `draft` and run every stage. Only draft defects are errors;
    /// settings gaps are reported on the quote.
    pub fn run(self, draft: &CrateDraft) -> Result<Quote, CrateCostError> {
        draft.validate()?;

        let nesting = nest(draft, self.settings);

        let mut rules = RuleEngine::new(self.settings);
        if let Some(liner) = self.liner {
            rules = rules.with_liner(liner);
        }
        let engineered = rules.engineer(draft, &nesting, &self.overrides);

        let costed = CostEngine::new(self.settings).cost(&engineered.boxes);

        let mut gaps = engineered.gaps;
        gaps.extend(costed.gaps);
        if !gaps.is_empty() {
            warn!("Quote has {} configuration gap(s)", gaps.len());
        }

        info!(
            "Quoted {} units in {} boxes: cost {:.2}, sell {:.2}",
            draft.unit_count(),
            costed.boxes.len(),
            costed.totals.total_cost,
            costed.totals.sell_price
        );

        Ok(Quote {
            nesting,
            boxes: costed.boxes,
            totals: costed.totals,
            gaps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Item;
    use crate::engineering::ContentSurface;
    use crate::settings::{default_settings, Profile};

    #[test]
    fn test_run_rejects_bad_draft() {
        let settings = default_settings();
        let draft = CrateDraft::new("Local", vec![Item::new(50.0, -1.0, 10.0, 1.0, 1, 1)]);

        let err = Pipeline::new(&settings).run(&draft).unwrap_err();
        match err {
            CrateCostError::Draft(e) => {
                assert_eq!(e.item_index, 0);
                assert_eq!(e.field, "widthCm");
            }
            other => panic!("expected draft error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_empty_draft() {
        let settings = default_settings();
        let quote = Pipeline::new(&settings).run(&CrateDraft::default()).unwrap();
        assert!(quote.nesting.is_empty());
        assert!(quote.boxes.is_empty());
        assert_eq!(quote.totals, CostTotals::default());
    }

    #[test]
    fn test_run_keeps_nesting_order() {
        let settings = default_settings();
        let draft = CrateDraft::new(
            "Local",
            vec![
                Item::new(40.0, 30.0, 20.0, 3.0, 1, 1),
                Item::new(200.0, 100.0, 50.0, 20.0, 1, 1),
            ],
        );
        let quote = Pipeline::new(&settings).run(&draft).unwrap();
        assert_eq!(quote.nesting.len(), 2);
        for (nested, costed) in quote.nesting.iter().zip(&quote.boxes) {
            assert_eq!(nested, &costed.engineered.nesting);
        }
    }

    #[test]
    fn test_overrides_and_liner_are_applied() {
        let settings = default_settings();
        let draft = CrateDraft::new("Local", vec![Item::new(100.0, 80.0, 60.0, 5.0, 4, 1)]);

        let plain = Pipeline::new(&settings).run(&draft).unwrap();
        let tuned = Pipeline::new(&settings)
            .with_overrides([(0, Profile::ExportIspm15)].into_iter().collect())
            .with_liner(Box::new(ContentSurface))
            .run(&draft)
            .unwrap();

        assert_eq!(plain.boxes[0].engineered.profile, Profile::StandardLocal);
        assert_eq!(tuned.boxes[0].engineered.profile, Profile::ExportIspm15);
        assert!(tuned.boxes[0].cost.adders.fumigation > 0.0);
        assert!(
            tuned.boxes[0].engineered.bom_raw.foam_sheets
                < plain.boxes[0].engineered.bom_raw.foam_sheets
        );
    }

    #[test]
    fn test_gaps_merged_from_both_stages() {
        let mut settings = default_settings();
        settings.materials.lumber.clear();
        settings.engineering.plywood_thickness_by_profile.standard_local = 0.625;
        let draft = CrateDraft::new("Local", vec![Item::new(60.0, 40.0, 30.0, 5.0, 1, 1)]);

        let quote = Pipeline::new(&settings).run(&draft).unwrap();
        assert_eq!(quote.gaps.len(), 2);
        assert_eq!(quote.gaps[0], ConfigGap::NoLumberStock { box_index: 0 });
        assert!(matches!(quote.gaps[1], ConfigGap::MissingPlywoodPrice { .. }));
    }
}
