//! Dataset-level metrics — the versioned summary blob handed to the
//! metrics store for presentation collaborators (KPI cards, monthly
//! activity charts).

use crate::{dates, month::YearMonth, record::SaleRecord, types::CustomerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Schema version of the persisted blob.
pub const DATA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    /// Customers whose chronologically first purchase falls in this month.
    pub new_customers:    usize,
    pub repeat_customers: usize,
    pub revenue:          f64,
    pub average_ticket:   f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetrics {
    pub data_version:    String,
    pub total_customers: usize,
    pub total_revenue:   f64,
    pub average_ticket:  f64,
    pub monthly:         BTreeMap<YearMonth, MonthlyActivity>,
}

impl DatasetMetrics {
    /// Compute the summary over all rows with a resolvable date. Rows the
    /// cohort builder would warn about are skipped silently here — the
    /// builder owns warning collection.
    pub fn compute(records: &[SaleRecord]) -> Self {
        struct Bucket {
            actives: HashSet<CustomerId>,
            revenue: f64,
        }

        let mut buckets: BTreeMap<YearMonth, Bucket> = BTreeMap::new();
        let mut total_revenue = 0.0;
        let mut total_purchases: u64 = 0;

        for record in records {
            let Some(date) = dates::parse_date(&record.sale_date) else {
                continue;
            };
            let bucket = buckets
                .entry(YearMonth::from_date(date))
                .or_insert_with(|| Bucket {
                    actives: HashSet::new(),
                    revenue: 0.0,
                });
            bucket.actives.insert(record.customer_id.clone());
            total_purchases += 1;
            if let Some(v) = record.sale_value {
                if v >= 0.0 {
                    bucket.revenue += v;
                    total_revenue += v;
                }
            }
        }

        // Ascending month order, so "first seen" is chronological rather
        // than upload-order dependent.
        let mut seen: HashSet<CustomerId> = HashSet::new();
        let mut monthly = BTreeMap::new();
        for (month, bucket) in &buckets {
            let new_customers = bucket
                .actives
                .iter()
                .filter(|c| !seen.contains(*c))
                .count();
            monthly.insert(
                *month,
                MonthlyActivity {
                    new_customers,
                    repeat_customers: bucket.actives.len() - new_customers,
                    revenue: bucket.revenue,
                    average_ticket: bucket.revenue / bucket.actives.len() as f64,
                },
            );
            seen.extend(bucket.actives.iter().cloned());
        }

        DatasetMetrics {
            data_version: DATA_VERSION.to_string(),
            total_customers: seen.len(),
            total_revenue,
            average_ticket: if total_purchases > 0 {
                total_revenue / total_purchases as f64
            } else {
                0.0
            },
            monthly,
        }
    }
}
