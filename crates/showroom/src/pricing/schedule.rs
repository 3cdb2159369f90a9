use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::catalog::{BasePriceSource, FeeFormula, FeeRule, OnRoadCostSchema};

#[derive(Debug, thiserror::Error)]
pub enum FeeScheduleImportError {
    #[error("failed to read fee schedule: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid fee schedule CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown formula '{formula}' (expected fixed or percentOfBase)")]
    UnknownFormula { row: usize, formula: String },
    #[error("row {row}: '{value}' is not a decimal amount")]
    InvalidValue { row: usize, value: String },
    #[error("row {row}: fee amounts must not be negative")]
    NegativeValue { row: usize },
    #[error("row {row}: fee label is empty")]
    MissingLabel { row: usize },
}

#[derive(Debug, Deserialize)]
struct FeeRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Formula")]
    formula: String,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Tooltip", default, deserialize_with = "empty_string_as_none")]
    tooltip: Option<String>,
}

/// Reads provincial fee schedules maintained as spreadsheets.
///
/// Expected header: `Label,Formula,Value,Tooltip`. Percent values may be given
/// either as fractions (`0.02`) or with a percent sign (`2%`).
pub struct FeeScheduleImporter;

impl FeeScheduleImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OnRoadCostSchema, FeeScheduleImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<OnRoadCostSchema, FeeScheduleImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut fees = Vec::new();
        for (index, row) in csv_reader.deserialize::<FeeRow>().enumerate() {
            let row_number = index + 1;
            let row = row?;
            fees.push(parse_row(row_number, row)?);
        }

        Ok(OnRoadCostSchema {
            base_price_source: BasePriceSource::SelectedTrim,
            fees,
        })
    }
}

fn parse_row(row_number: usize, row: FeeRow) -> Result<FeeRule, FeeScheduleImportError> {
    if row.label.is_empty() {
        return Err(FeeScheduleImportError::MissingLabel { row: row_number });
    }

    let formula = parse_formula(&row.formula).ok_or_else(|| FeeScheduleImportError::UnknownFormula {
        row: row_number,
        formula: row.formula.clone(),
    })?;

    let value = parse_value(formula, &row.value).ok_or_else(|| FeeScheduleImportError::InvalidValue {
        row: row_number,
        value: row.value.clone(),
    })?;

    if value < Decimal::ZERO {
        return Err(FeeScheduleImportError::NegativeValue { row: row_number });
    }

    Ok(FeeRule {
        label: row.label,
        formula,
        value,
        tooltip: row.tooltip,
    })
}

fn parse_formula(raw: &str) -> Option<FeeFormula> {
    match raw.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
        "fixed" => Some(FeeFormula::Fixed),
        "percentofbase" | "percent" => Some(FeeFormula::PercentOfBase),
        _ => None,
    }
}

fn parse_value(formula: FeeFormula, raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|ch| *ch != ',' && *ch != '_').collect();

    match (formula, cleaned.strip_suffix('%')) {
        (FeeFormula::PercentOfBase, Some(percent)) => {
            Decimal::from_str(percent.trim()).ok().map(|value| value / Decimal::ONE_HUNDRED)
        }
        (FeeFormula::Fixed, Some(_)) => None,
        (_, None) => Decimal::from_str(cleaned.trim()).ok(),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_rows_in_order() {
        let csv = "Label,Formula,Value,Tooltip\n\
                   Licence plate fee,fixed,\"20,000,000\",Hanoi\n\
                   Registration tax,percentOfBase,2%,\n\
                   Inspection fee,fixed,340000,\n";

        let schema = FeeScheduleImporter::from_reader(csv.as_bytes()).expect("schedule parses");

        assert_eq!(schema.fees.len(), 3);
        assert_eq!(schema.fees[0].value, Decimal::from(20_000_000u64));
        assert_eq!(schema.fees[0].tooltip.as_deref(), Some("Hanoi"));
        assert_eq!(schema.fees[1].formula, FeeFormula::PercentOfBase);
        assert_eq!(schema.fees[1].value, Decimal::new(2, 2));
        assert!(schema.fees[1].tooltip.is_none());
        assert_eq!(schema.fees[2].label, "Inspection fee");
    }

    #[test]
    fn accepts_fractional_percent_values() {
        let csv = "Label,Formula,Value,Tooltip\nTax,percent-of-base,0.015,\n";
        let schema = FeeScheduleImporter::from_reader(csv.as_bytes()).expect("schedule parses");
        assert_eq!(schema.fees[0].value, Decimal::new(15, 3));
    }

    #[test]
    fn rejects_unknown_formula() {
        let csv = "Label,Formula,Value,Tooltip\nTax,tiered,0.1,\n";
        match FeeScheduleImporter::from_reader(csv.as_bytes()) {
            Err(FeeScheduleImportError::UnknownFormula { row, formula }) => {
                assert_eq!(row, 1);
                assert_eq!(formula, "tiered");
            }
            other => panic!("expected unknown formula, got {other:?}"),
        }
    }

    #[test]
    fn rejects_percent_sign_on_fixed_fees_and_negative_values() {
        let percent_fixed = "Label,Formula,Value,Tooltip\nPlate,fixed,5%,\n";
        assert!(matches!(
            FeeScheduleImporter::from_reader(percent_fixed.as_bytes()),
            Err(FeeScheduleImportError::InvalidValue { row: 1, .. })
        ));

        let negative = "Label,Formula,Value,Tooltip\nOk,fixed,1,\nRebate,fixed,-100,\n";
        assert!(matches!(
            FeeScheduleImporter::from_reader(negative.as_bytes()),
            Err(FeeScheduleImportError::NegativeValue { row: 2 })
        ));
    }
}
