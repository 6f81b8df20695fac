//! Sale records and row-level data-quality warnings.
//!
//! A `SaleRecord` is one historical transaction as handed over by the
//! record normalizer (spreadsheet/CSV ingestion lives outside the core).
//! Rows are immutable; problems with individual rows surface as
//! `DataQualityWarning`s and never abort the pipeline.

use crate::types::CustomerId;
use serde::{Deserialize, Serialize};

/// Raw content of the sale-date column: either a textual date or a
/// numeric spreadsheet serial. Untagged so both shapes deserialize from
/// upstream JSON without a discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Serial(f64),
    Text(String),
}

impl DateInput {
    /// The raw value as uploaded, for warning messages.
    pub fn raw(&self) -> String {
        match self {
            DateInput::Serial(n) => n.to_string(),
            DateInput::Text(s) => s.clone(),
        }
    }
}

/// One transaction. `sale_value` is `None` when the upstream cell was
/// not numeric — such rows still count toward cohort membership but are
/// excluded from revenue and ticket sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub customer_id: CustomerId,
    pub sale_date:   DateInput,
    pub sale_value:  Option<f64>,
}

impl SaleRecord {
    pub fn new(customer_id: impl Into<CustomerId>, sale_date: impl Into<String>, sale_value: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            sale_date:   DateInput::Text(sale_date.into()),
            sale_value:  Some(sale_value),
        }
    }

    pub fn from_serial(customer_id: impl Into<CustomerId>, serial: f64, sale_value: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            sale_date:   DateInput::Serial(serial),
            sale_value:  Some(sale_value),
        }
    }
}

/// Non-fatal row-level issues, surfaced to the caller alongside the
/// cohort table. An unparseable date drops the row; value problems only
/// exclude the row from revenue sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataQualityWarning {
    UnparseableDate { row: usize, raw: String },
    MissingSaleValue { row: usize },
    NegativeSaleValue { row: usize, value: f64 },
}
