//! Page-level composition: reconciling the shopper's selection against a
//! record, quoting it, and assembling the view model the page renders.

pub mod page;
pub mod quote;
pub mod selection;

pub use page::{
    build_page, AccessoryView, ColorOptionView, ComparisonColumnView, ComparisonRowView,
    ComparisonView, DescriptionView, LeadAction, MobileCta, PageView, PromotionView,
    TrimOptionView, UnavailablePage, MISSING_VALUE, UNAVAILABLE_MESSAGE,
};
pub use quote::{build_quote, Quote};
pub use selection::Selection;
