use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One shippable unit type, repeated `qty` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// 1 (robust) to 5 (most fragile).
    pub fragility: u8,
    pub qty: u32,
}

impl Item {
    pub fn new(length_cm: f64, width_cm: f64, height_cm: f64, weight_kg: f64, fragility: u8, qty: u32) -> Self {
        Self {
            length_cm,
            width_cm,
            height_cm,
            weight_kg,
            fragility,
            qty,
        }
    }
}

/// Items for one shipment plus the free-text service type used to infer a
/// packaging profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateDraft {
    pub items: Vec<Item>,
    #[serde(default)]
    pub service_type: String,
}

/// A draft item that cannot be crated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Item {item_index}: {field} {reason}")]
pub struct DraftError {
    pub item_index: usize,
    pub field: &'static str,
    pub reason: String,
}

impl CrateDraft {
    pub fn new(service_type: &str, items: Vec<Item>) -> Self {
        Self {
            items,
            service_type: service_type.to_string(),
        }
    }

    /// Total number of physical units (sum of quantities).
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.qty)).sum()
    }

    /// Reject items with dimensions, weight, fragility or quantity that would
    /// make nesting and costing meaningless. Stops at the first bad item.
    pub fn validate(&self) -> Result<(), DraftError> {
        for (index, item) in self.items.iter().enumerate() {
            let fail = |field: &'static str, reason: String| DraftError {
                item_index: index,
                field,
                reason,
            };

            for (field, value) in [
                ("lengthCm", item.length_cm),
                ("widthCm", item.width_cm),
                ("heightCm", item.height_cm),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(fail(field, format!("must be a positive number, got {}", value)));
                }
            }
            if !item.weight_kg.is_finite() || item.weight_kg < 0.0 {
                return Err(fail(
                    "weightKg",
                    format!("must be zero or positive, got {}", item.weight_kg),
                ));
            }
            if !(1..=5).contains(&item.fragility) {
                return Err(fail(
                    "fragility",
                    format!("must be between 1 and 5, got {}", item.fragility),
                ));
            }
            if item.qty == 0 {
                return Err(fail("qty", "must be at least 1".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_item() -> Item {
        Item::new(120.0, 80.0, 10.0, 25.0, 2, 3)
    }

    #[test]
    fn test_valid_draft() {
        let draft = CrateDraft::new("Local", vec![valid_item(), valid_item()]);
        assert!(draft.validate().is_ok());
        assert_eq!(draft.unit_count(), 6);
    }

    #[test]
    fn test_empty_draft_is_valid() {
        assert!(CrateDraft::default().validate().is_ok());
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let mut bad = valid_item();
        bad.width_cm = -4.0;
        let draft = CrateDraft::new("Local", vec![valid_item(), bad]);

        let err = draft.validate().unwrap_err();
        assert_eq!(err.item_index, 1);
        assert_eq!(err.field, "widthCm");
        assert_eq!(err.to_string(), "Item 1: widthCm must be a positive number, got -4");
    }

    #[test]
    fn test_zero_and_nan_dimensions_rejected() {
        let mut zero = valid_item();
        zero.height_cm = 0.0;
        assert_eq!(
            CrateDraft::new("", vec![zero]).validate().unwrap_err().field,
            "heightCm"
        );

        let mut nan = valid_item();
        nan.length_cm = f64::NAN;
        assert_eq!(
            CrateDraft::new("", vec![nan]).validate().unwrap_err().field,
            "lengthCm"
        );
    }

    #[test]
    fn test_weight_fragility_qty_rejected() {
        let mut heavy = valid_item();
        heavy.weight_kg = -1.0;
        assert_eq!(CrateDraft::new("", vec![heavy]).validate().unwrap_err().field, "weightKg");

        let mut fragile = valid_item();
        fragile.fragility = 6;
        assert_eq!(CrateDraft::new("", vec![fragile]).validate().unwrap_err().field, "fragility");

        let mut none = valid_item();
        none.qty = 0;
        assert_eq!(CrateDraft::new("", vec![none]).validate().unwrap_err().field, "qty");
    }

    #[test]
    fn test_zero_weight_allowed() {
        let mut light = valid_item();
        light.weight_kg = 0.0;
        assert!(CrateDraft::new("", vec![light]).validate().is_ok());
    }

    #[test]
    fn test_draft_json_shape() {
        let json = r#"{
            "serviceType": "Export ISPM",
            "items": [{"lengthCm": 50, "widthCm": 40, "heightCm": 10,
                       "weightKg": 4.5, "fragility": 3, "qty": 2}]
        }"#;
        let draft: CrateDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.service_type, "Export ISPM");
        assert_eq!(draft.items[0].qty, 2);
        assert_eq!(draft.items[0].length_cm, 50.0);
    }
}
