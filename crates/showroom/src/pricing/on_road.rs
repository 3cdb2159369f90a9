use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{FeeFormula, FeeRule, OnRoadCostSchema};

/// Computed amount for one fee of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeLine {
    pub label: String,
    pub formula: FeeFormula,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Itemized on-the-road cost in schedule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnRoadEstimate {
    pub base_price: Decimal,
    pub fees: Vec<FeeLine>,
    pub fees_total: Decimal,
    pub total: Decimal,
}

/// The schedule cannot be applied without leaving the representable range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnRoadError {
    #[error("fee '{label}' is out of range for a base price of {base_price}")]
    AmountOutOfRange { label: String, base_price: Decimal },
    #[error("on-road total is out of range for a base price of {base_price}")]
    TotalOutOfRange { base_price: Decimal },
}

impl FeeRule {
    /// `None` when the amount overflows.
    pub fn amount_for(&self, base_price: Decimal) -> Option<Decimal> {
        match self.formula {
            FeeFormula::Fixed => Some(self.value),
            FeeFormula::PercentOfBase => base_price.checked_mul(self.value),
        }
    }
}

/// Apply `schema` to `base_price`. A missing schedule or a missing/zero base
/// price yields no estimate.
pub fn estimate_on_road(
    schema: Option<&OnRoadCostSchema>,
    base_price: Option<Decimal>,
) -> Result<Option<OnRoadEstimate>, OnRoadError> {
    let (Some(schema), Some(base_price)) = (schema, base_price.filter(|price| !price.is_zero()))
    else {
        return Ok(None);
    };

    let mut fees = Vec::with_capacity(schema.fees.len());
    let mut fees_total = Decimal::ZERO;
    for fee in &schema.fees {
        let out_of_range = || OnRoadError::AmountOutOfRange {
            label: fee.label.clone(),
            base_price,
        };
        let amount = fee.amount_for(base_price).ok_or_else(out_of_range)?;
        fees_total = fees_total.checked_add(amount).ok_or_else(out_of_range)?;
        fees.push(FeeLine {
            label: fee.label.clone(),
            formula: fee.formula,
            amount,
            note: fee.tooltip.clone(),
        });
    }

    let total = base_price
        .checked_add(fees_total)
        .ok_or(OnRoadError::TotalOutOfRange { base_price })?;

    Ok(Some(OnRoadEstimate {
        base_price,
        fees,
        fees_total,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(label: &str, formula: FeeFormula, value: Decimal) -> FeeRule {
        FeeRule {
            label: label.to_string(),
            formula,
            value,
            tooltip: None,
        }
    }

    fn schedule(fees: Vec<FeeRule>) -> OnRoadCostSchema {
        OnRoadCostSchema {
            fees,
            ..OnRoadCostSchema::default()
        }
    }

    #[test]
    fn fixed_and_percent_fees_sum_onto_base() {
        let schema = schedule(vec![
            fee("Plate", FeeFormula::Fixed, Decimal::from(5_000_000u64)),
            fee("Registration", FeeFormula::PercentOfBase, Decimal::new(2, 2)),
        ]);

        let estimate = estimate_on_road(Some(&schema), Some(Decimal::from(1_000_000_000u64)))
            .expect("amounts in range")
            .expect("estimate produced");

        let amounts: Vec<Decimal> = estimate.fees.iter().map(|fee| fee.amount).collect();
        assert_eq!(
            amounts,
            vec![Decimal::from(5_000_000u64), Decimal::from(20_000_000u64)]
        );
        assert_eq!(estimate.fees_total, Decimal::from(25_000_000u64));
        assert_eq!(estimate.total, Decimal::from(1_025_000_000u64));
    }

    #[test]
    fn preserves_schedule_order_and_notes() {
        let mut insurance = fee("Insurance", FeeFormula::Fixed, Decimal::from(480_700u64));
        insurance.tooltip = Some("Mandatory civil liability".to_string());
        let schema = schedule(vec![
            fee("Tax", FeeFormula::PercentOfBase, Decimal::new(10, 2)),
            insurance,
            fee("Plate", FeeFormula::Fixed, Decimal::from(20_000_000u64)),
        ]);

        let estimate =
            estimate_on_road(Some(&schema), Some(Decimal::from(1_000u64)))
                .expect("amounts in range")
                .expect("estimate");

        let labels: Vec<&str> = estimate.fees.iter().map(|fee| fee.label.as_str()).collect();
        assert_eq!(labels, ["Tax", "Insurance", "Plate"]);
        assert_eq!(
            estimate.fees[1].note.as_deref(),
            Some("Mandatory civil liability")
        );
        assert_eq!(estimate.fees[0].amount, Decimal::from(100u64));
    }

    #[test]
    fn percent_fees_keep_exact_fractions() {
        let schema = schedule(vec![fee(
            "Tax",
            FeeFormula::PercentOfBase,
            Decimal::new(15, 3),
        )]);

        let estimate =
            estimate_on_road(Some(&schema), Some(Decimal::from(333u64)))
                .expect("amounts in range")
                .expect("estimate");
        assert_eq!(estimate.fees[0].amount, Decimal::new(4995, 3));
        assert_eq!(estimate.total, Decimal::new(337995, 3));
    }

    #[test]
    fn missing_inputs_produce_no_estimate() {
        let schema = schedule(vec![fee("Plate", FeeFormula::Fixed, Decimal::ONE)]);
        assert_eq!(estimate_on_road(None, Some(Decimal::ONE)), Ok(None));
        assert_eq!(estimate_on_road(Some(&schema), None), Ok(None));
        assert_eq!(estimate_on_road(Some(&schema), Some(Decimal::ZERO)), Ok(None));
    }

    #[test]
    fn empty_schedule_totals_to_base() {
        let schema = schedule(Vec::new());
        let estimate =
            estimate_on_road(Some(&schema), Some(Decimal::from(42u64)))
                .expect("amounts in range")
                .expect("estimate");
        assert!(estimate.fees.is_empty());
        assert_eq!(estimate.total, Decimal::from(42u64));
    }

    #[test]
    fn oversized_percent_fee_is_rejected_instead_of_overflowing() {
        let schema = schedule(vec![
            fee("Plate", FeeFormula::Fixed, Decimal::from(20_000_000u64)),
            fee("Tax", FeeFormula::PercentOfBase, Decimal::MAX),
        ]);

        let err = estimate_on_road(Some(&schema), Some(Decimal::from(1_090_000_000u64)))
            .expect_err("multiplication leaves the decimal range");

        assert!(matches!(err, OnRoadError::AmountOutOfRange { ref label, .. } if label == "Tax"));
    }

    #[test]
    fn fixed_fees_summing_past_the_range_are_rejected() {
        let schema = schedule(vec![
            fee("Plate", FeeFormula::Fixed, Decimal::MAX),
            fee("Inspection", FeeFormula::Fixed, Decimal::MAX),
        ]);

        let err = estimate_on_road(Some(&schema), Some(Decimal::ONE))
            .expect_err("fee total leaves the decimal range");
        assert!(
            matches!(err, OnRoadError::AmountOutOfRange { ref label, .. } if label == "Inspection")
        );

        let single = schedule(vec![fee("Plate", FeeFormula::Fixed, Decimal::MAX)]);
        assert_eq!(
            estimate_on_road(Some(&single), Some(Decimal::ONE)),
            Err(OnRoadError::TotalOutOfRange {
                base_price: Decimal::ONE
            })
        );
    }
}
