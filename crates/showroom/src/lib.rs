//! Pricing, on-road estimation and lead capture behind a car model detail page.

pub mod catalog;
pub mod config;
pub mod configurator;
pub mod error;
pub mod format;
pub mod leads;
pub mod pricing;
pub mod telemetry;

pub use error::AppError;
