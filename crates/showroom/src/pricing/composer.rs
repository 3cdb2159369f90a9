use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{CarDetail, ColorOption, Currency, Trim};
use crate::format::format_currency;

/// One surcharge line shown under the color adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorNote {
    pub label: String,
    pub amount: Decimal,
}

/// Performance attributes shown alongside the selected price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimPerformance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_wltp_km: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_to_100: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powertrain: Option<String>,
}

impl From<&Trim> for TrimPerformance {
    fn from(trim: &Trim) -> Self {
        Self {
            range_wltp_km: trim.range_wltp_km,
            zero_to_100: trim.zero_to_100,
            powertrain: trim.powertrain.clone(),
        }
    }
}

/// Composed price for a trim and its color choices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub trim_code: String,
    pub trim_name: String,
    pub currency: Currency,
    pub base_price: Decimal,
    pub color_adjustment: Decimal,
    pub total: Decimal,
    pub notes: Vec<ColorNote>,
    pub performance: TrimPerformance,
}

impl PriceSummary {
    pub fn includes_premium_upgrades(&self) -> bool {
        self.color_adjustment > Decimal::ZERO
    }

    pub fn color_adjustment_label(&self) -> String {
        if self.includes_premium_upgrades() {
            format_currency(Some(self.color_adjustment), self.currency)
        } else {
            "Included".to_string()
        }
    }

    pub fn headline(&self) -> &'static str {
        if self.includes_premium_upgrades() {
            "Includes premium color upgrades"
        } else {
            "Includes selected colors"
        }
    }
}

/// Compose the displayed price; without a trim there is nothing to show.
pub fn compose_price(
    trim: Option<&Trim>,
    exterior: Option<&ColorOption>,
    interior: Option<&ColorOption>,
) -> Option<PriceSummary> {
    let trim = trim?;

    let lines = [(exterior, "exterior"), (interior, "interior")];
    let color_adjustment = lines
        .iter()
        .filter_map(|(color, _)| color.map(ColorOption::surcharge))
        .sum::<Decimal>();

    let notes = lines
        .iter()
        .filter_map(|(color, axis)| {
            color.map(|color| ColorNote {
                label: format!("{} {axis}", color.name),
                amount: color.surcharge(),
            })
        })
        .filter(|note| note.amount > Decimal::ZERO)
        .collect();

    Some(PriceSummary {
        trim_code: trim.code.clone(),
        trim_name: trim.name.clone(),
        currency: trim.price.currency,
        base_price: trim.price.value,
        color_adjustment,
        total: trim.price.value + color_adjustment,
        notes,
        performance: TrimPerformance::from(trim),
    })
}

/// Code-based composition; codes missing from the record count as no selection.
pub fn compose_for_codes(
    detail: &CarDetail,
    trim_code: Option<&str>,
    exterior_code: Option<&str>,
    interior_code: Option<&str>,
) -> Option<PriceSummary> {
    compose_price(
        trim_code.and_then(|code| detail.trim(code)),
        exterior_code.and_then(|code| detail.exterior(code)),
        interior_code.and_then(|code| detail.interior(code)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PriceTag;

    fn trim(value: u64) -> Trim {
        Trim {
            code: "vf8-plus".to_string(),
            name: "VF 8 Plus".to_string(),
            price: PriceTag {
                currency: Currency::Vnd,
                value: Decimal::from(value),
                note: None,
            },
            powertrain: Some("Dual motor AWD".to_string()),
            transmission: None,
            range_wltp_km: Some(457),
            zero_to_100: Some(5.5),
            images: Vec::new(),
            highlight_features: Vec::new(),
        }
    }

    fn color(code: &str, name: &str, surcharge: Option<u64>) -> ColorOption {
        ColorOption {
            code: code.to_string(),
            name: name.to_string(),
            hex: None,
            image: None,
            is_premium: surcharge.is_some(),
            price: surcharge.map(|value| PriceTag {
                currency: Currency::Vnd,
                value: Decimal::from(value),
                note: None,
            }),
        }
    }

    #[test]
    fn premium_exterior_adds_single_itemized_line() {
        let trim = trim(1_200_000_000);
        let exterior = color("crimson-red", "Crimson Red", Some(20_000_000));
        let interior = color("black", "Black", Some(0));

        let summary =
            compose_price(Some(&trim), Some(&exterior), Some(&interior)).expect("trim selected");

        assert_eq!(summary.base_price, Decimal::from(1_200_000_000u64));
        assert_eq!(summary.color_adjustment, Decimal::from(20_000_000u64));
        assert_eq!(summary.total, Decimal::from(1_220_000_000u64));
        assert_eq!(
            summary.notes,
            vec![ColorNote {
                label: "Crimson Red exterior".to_string(),
                amount: Decimal::from(20_000_000u64),
            }]
        );
        assert_eq!(summary.headline(), "Includes premium color upgrades");
    }

    #[test]
    fn colors_without_surcharge_are_included() {
        let trim = trim(1_090_000_000);
        let exterior = color("jet-black", "Jet Black", None);

        let summary = compose_price(Some(&trim), Some(&exterior), None).expect("trim selected");

        assert_eq!(summary.total, summary.base_price);
        assert!(summary.notes.is_empty());
        assert_eq!(summary.color_adjustment_label(), "Included");
        assert_eq!(summary.headline(), "Includes selected colors");
    }

    #[test]
    fn total_is_base_plus_both_surcharges() {
        let trim = trim(1_000);
        for (ext, int) in [(None, None), (Some(5), None), (None, Some(7)), (Some(5), Some(7))] {
            let exterior = color("e", "E", ext);
            let interior = color("i", "I", int);
            let summary =
                compose_price(Some(&trim), Some(&exterior), Some(&interior)).expect("trim");
            let expected = 1_000 + ext.unwrap_or(0) + int.unwrap_or(0);
            assert_eq!(summary.total, Decimal::from(expected));
        }
    }

    #[test]
    fn missing_trim_produces_no_summary() {
        let exterior = color("crimson-red", "Crimson Red", Some(20_000_000));
        assert!(compose_price(None, Some(&exterior), None).is_none());
    }

    #[test]
    fn carries_trim_performance() {
        let trim = trim(1_270_000_000);
        let summary = compose_price(Some(&trim), None, None).expect("trim selected");
        assert_eq!(summary.performance.range_wltp_km, Some(457));
        assert_eq!(
            summary.performance.powertrain.as_deref(),
            Some("Dual motor AWD")
        );
    }
}
