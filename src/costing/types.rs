use serde::Serialize;

use crate::diagnostics::ConfigGap;
use crate::engineering::EngineeredBox;

/// Purchasable quantities after waste and rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomRounded {
    pub plywood_sheets: u32,
    pub lumber_sticks: u32,
    pub foam_sheets: u32,
    pub cardboard_sheets: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdderBreakdown {
    pub fumigation: f64,
    pub fasteners: f64,
    pub corner_protectors: f64,
    pub total: f64,
}

/// Cost per material category for one box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub plywood: f64,
    pub lumber: f64,
    pub foam: f64,
    pub cardboard: f64,
    /// Sum of the four material lines.
    pub materials: f64,
    pub labor: f64,
    pub adders: AdderBreakdown,
}

/// An engineered box with its bill of materials and price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostedBox {
    #[serde(flatten)]
    pub engineered: EngineeredBox,
    pub bom_rounded: BomRounded,
    pub cost: CostBreakdown,
    pub total_cost: f64,
    pub sell_price: f64,
}

/// Sums across every costed box in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTotals {
    pub materials: f64,
    pub labor: f64,
    pub adders: f64,
    pub total_cost: f64,
    pub sell_price: f64,
}

impl CostTotals {
    /// A new total with `costed` added.
    pub fn add(self, costed: &CostedBox) -> Self {
        Self {
            materials: self.materials + costed.cost.materials,
            labor: self.labor + costed.cost.labor,
            adders: self.adders + costed.cost.adders.total,
            total_cost: self.total_cost + costed.total_cost,
            sell_price: self.sell_price + costed.sell_price,
        }
    }

    pub fn of(boxes: &[CostedBox]) -> Self {
        boxes.iter().fold(Self::default(), Self::add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostingOutcome {
    pub boxes: Vec<CostedBox>,
    pub totals: CostTotals,
    pub gaps: Vec<ConfigGap>,
}
