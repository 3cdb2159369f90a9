use serde::Serialize;

use super::selection::Selection;
use crate::catalog::{CarDetail, OnRoadCostSchema};
use crate::pricing::{compose_price, estimate_on_road, OnRoadError, OnRoadEstimate, PriceSummary};

/// Price and on-road breakdown for one reconciled selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub model_id: String,
    pub model_name: String,
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_road: Option<OnRoadEstimate>,
}

impl Quote {
    /// Amount the mobile call-to-action shows: the composed total when known.
    pub fn display_price(&self) -> Option<rust_decimal::Decimal> {
        self.price.as_ref().map(|price| price.total)
    }
}

/// Build a quote for `selection` against `detail`.
///
/// Stale or missing codes are reconciled first, so the quote always describes
/// a trim the record actually offers. The on-road estimate is based on the
/// total vehicle price. `schedule` replaces the record's own fee schedule when
/// given; fees that overflow the amount range fail the quote.
pub fn build_quote(
    detail: &CarDetail,
    selection: &Selection,
    schedule: Option<&OnRoadCostSchema>,
) -> Result<Quote, OnRoadError> {
    let selection = selection.reconcile(detail);
    let price = compose_price(
        selection.trim(detail),
        selection.exterior(detail),
        selection.interior(detail),
    );

    let schedule = schedule.or(detail.on_road_cost_schema.as_ref());
    let on_road = estimate_on_road(schedule, price.as_ref().map(|price| price.total))?;

    Ok(Quote {
        model_id: detail.id.clone(),
        model_name: detail.model_name.clone(),
        selection,
        price,
        on_road,
    })
}
