//! Price composition and on-the-road cost estimation.
//!
//! Both computations are pure: they borrow reference data, never mutate it,
//! and keep amounts exact. Rounding to the currency's minor unit happens only
//! when values are formatted for display.

pub mod composer;
pub mod on_road;
pub mod schedule;

pub use composer::{compose_for_codes, compose_price, ColorNote, PriceSummary, TrimPerformance};
pub use on_road::{estimate_on_road, FeeLine, OnRoadError, OnRoadEstimate};
pub use schedule::{FeeScheduleImportError, FeeScheduleImporter};
