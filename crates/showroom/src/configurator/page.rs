use serde::Serialize;

use super::quote::{build_quote, Quote};
use super::selection::Selection;
use crate::catalog::{Brochure, CarDetail, ColorOption, FeatureItem, MediaAsset, SpecSection};
use crate::format::{format_currency, format_date_label, is_long_text, DEFAULT_LONG_TEXT_LIMIT};
use crate::leads::LeadIntent;
use crate::pricing::OnRoadError;

pub const UNAVAILABLE_MESSAGE: &str = "Car detail unavailable";
pub const MISSING_VALUE: &str = "—";

/// Everything the model detail page renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub title: String,
    pub brand: String,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_year: Option<u16>,
    pub description: DescriptionView,
    pub hero_media: MediaAsset,
    pub gallery: Vec<MediaAsset>,
    pub trims: Vec<TrimOptionView>,
    pub exterior_colors: Vec<ColorOptionView>,
    pub interior_colors: Vec<ColorOptionView>,
    pub quote: Quote,
    pub specifications: Vec<SpecSection>,
    pub key_features: Vec<FeatureItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonView>,
    pub promotions: Vec<PromotionView>,
    pub accessories: Vec<AccessoryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brochure: Option<Brochure>,
    pub mobile_cta: MobileCta,
    pub lead_actions: Vec<LeadAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionView {
    pub text: String,
    pub collapsible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimOptionView {
    pub code: String,
    pub name: String,
    pub price_label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorOptionView {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    pub premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surcharge_label: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonColumnView {
    pub trim_code: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRowView {
    pub label: String,
    pub cells: Vec<String>,
}

/// Trim comparison grid; `cells` line up with `columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonView {
    pub columns: Vec<ComparisonColumnView>,
    pub rows: Vec<ComparisonRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionView {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Sticky summary bar shown on narrow screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobileCta {
    pub trim_name: String,
    pub price_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadAction {
    pub intent: LeadIntent,
    pub label: String,
}

/// Shown instead of the page when the record cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailablePage {
    pub message: String,
    pub recovery_label: String,
    pub recovery_href: String,
}

impl Default for UnavailablePage {
    fn default() -> Self {
        Self {
            message: UNAVAILABLE_MESSAGE.to_string(),
            recovery_label: "Back to home".to_string(),
            recovery_href: "/".to_string(),
        }
    }
}

/// Assemble the page for `selection`, reconciling it against `detail` first.
pub fn build_page(detail: &CarDetail, selection: &Selection) -> Result<PageView, OnRoadError> {
    let quote = build_quote(detail, selection, None)?;
    let current = &quote.selection;
    let currency = quote
        .price
        .as_ref()
        .map(|price| price.currency)
        .or_else(|| detail.currency())
        .unwrap_or_default();

    let trims = detail
        .trims
        .iter()
        .map(|trim| TrimOptionView {
            code: trim.code.clone(),
            name: trim.name.clone(),
            price_label: format_currency(Some(trim.price.value), trim.price.currency),
            selected: current.trim_code.as_deref() == Some(trim.code.as_str()),
        })
        .collect();

    let mobile_cta = MobileCta {
        trim_name: quote
            .price
            .as_ref()
            .map(|price| price.trim_name.clone())
            .unwrap_or_default(),
        price_label: format_currency(quote.display_price(), currency),
    };

    Ok(PageView {
        title: detail.page_title(),
        brand: detail.brand.clone(),
        model_name: detail.model_name.clone(),
        model_year: detail.model_year,
        description: DescriptionView {
            text: detail.short_description.clone(),
            collapsible: is_long_text(&detail.short_description, DEFAULT_LONG_TEXT_LIMIT),
        },
        hero_media: detail.hero_media.clone(),
        gallery: detail.media.clone(),
        trims,
        exterior_colors: color_views(&detail.colors.exterior, current.exterior_code.as_deref()),
        interior_colors: color_views(&detail.colors.interior, current.interior_code.as_deref()),
        specifications: detail.specifications.clone(),
        key_features: detail.key_features.clone(),
        comparison: comparison_view(detail, current.trim_code.as_deref()),
        promotions: detail
            .promotions
            .iter()
            .map(|promotion| PromotionView {
                title: promotion.title.clone(),
                description: promotion.description.clone(),
                badge: promotion.badge.clone(),
                valid_until_label: promotion
                    .valid_until
                    .as_deref()
                    .map(|raw| format_date_label(Some(raw))),
            })
            .collect(),
        accessories: detail
            .accessories
            .iter()
            .map(|accessory| AccessoryView {
                name: accessory.name.clone(),
                price_label: accessory
                    .price
                    .map(|price| format_currency(Some(price), currency)),
                note: accessory.note.clone(),
            })
            .collect(),
        brochure: detail.brochure.clone(),
        mobile_cta,
        lead_actions: [LeadIntent::TestDrive, LeadIntent::PreOrder]
            .into_iter()
            .map(|intent| LeadAction {
                intent,
                label: intent.call_to_action(&detail.model_name),
            })
            .collect(),
        quote,
    })
}

fn color_views(options: &[ColorOption], selected: Option<&str>) -> Vec<ColorOptionView> {
    options
        .iter()
        .map(|color| ColorOptionView {
            code: color.code.clone(),
            name: color.name.clone(),
            hex: color.hex.clone(),
            premium: color.is_premium,
            surcharge_label: color.price.as_ref().map(|price| {
                format!("+{}", format_currency(Some(price.value), price.currency))
            }),
            selected: selected == Some(color.code.as_str()),
        })
        .collect()
}

fn comparison_view(detail: &CarDetail, selected: Option<&str>) -> Option<ComparisonView> {
    let grid = detail.comparisons.as_ref()?;

    let columns = grid
        .columns
        .iter()
        .map(|column| ComparisonColumnView {
            trim_code: column.trim_code.clone(),
            label: column.label.clone(),
            selected: selected == Some(column.trim_code.as_str()),
        })
        .collect();

    let rows = grid
        .rows
        .iter()
        .map(|row| ComparisonRowView {
            label: row.label.clone(),
            cells: grid
                .columns
                .iter()
                .map(|column| {
                    row.values
                        .get(&column.trim_code)
                        .filter(|value| !value.trim().is_empty())
                        .cloned()
                        .unwrap_or_else(|| MISSING_VALUE.to_string())
                })
                .collect(),
        })
        .collect();

    Some(ComparisonView { columns, rows })
}
