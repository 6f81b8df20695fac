//! Cohort builder — groups sale records into monthly cohorts and derives
//! empirical per-period retention.
//!
//! A cohort is the set of distinct customers who transacted in a given
//! calendar month. For cohort month B and every later month B+k present
//! in the data (k = true calendar distance, up to `RETENTION_PERIODS`):
//!
//!   retention_rates[k] = |customers(B) ∩ customers(B+k)| / |customers(B)|
//!
//! Periods with no later data are absent from the map, not zero. Rows
//! whose date cannot be resolved are dropped with a warning; rows with a
//! missing or negative sale value still count toward membership and
//! purchase counts but contribute nothing to revenue.

use crate::{
    dates,
    month::YearMonth,
    record::{DataQualityWarning, SaleRecord},
    types::{CustomerId, Period},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Longest retention horizon tracked per cohort, in calendar months.
pub const RETENTION_PERIODS: Period = 12;

/// Revenue and purchase count contributed by a cohort's members in one
/// retention period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodActivity {
    pub revenue:   f64,
    pub purchases: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub month:             YearMonth,
    pub initial_customers: usize,
    pub average_ticket:    f64,
    pub total_revenue:     f64,
    pub total_purchases:   u64,
    pub retention_rates:   BTreeMap<Period, f64>,
    pub retention_data:    BTreeMap<Period, PeriodActivity>,
}

impl Cohort {
    /// Rate of the first period that has data, if any. The historical
    /// aggregator blends this across recent cohorts.
    pub fn first_retention_rate(&self) -> Option<f64> {
        self.retention_rates.values().next().copied()
    }
}

struct MonthBucket {
    customers: HashSet<CustomerId>,
    revenue:   f64,
    /// Per-row (customer, validated value) pairs, kept for the
    /// retention-period revenue pass.
    rows:      Vec<(CustomerId, Option<f64>)>,
}

impl MonthBucket {
    fn new() -> Self {
        Self {
            customers: HashSet::new(),
            revenue:   0.0,
            rows:      Vec::new(),
        }
    }
}

/// Build the ordered cohort table from raw sale records.
///
/// Returns the cohorts (chronologically ordered, unique by month) plus
/// the row-level warnings collected along the way.
pub fn build_cohorts(records: &[SaleRecord]) -> (Vec<Cohort>, Vec<DataQualityWarning>) {
    let mut warnings = Vec::new();
    let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();

    for (row, record) in records.iter().enumerate() {
        let Some(date) = dates::parse_date(&record.sale_date) else {
            warnings.push(DataQualityWarning::UnparseableDate {
                row,
                raw: record.sale_date.raw(),
            });
            continue;
        };

        let value = match record.sale_value {
            Some(v) if v >= 0.0 => Some(v),
            Some(v) => {
                warnings.push(DataQualityWarning::NegativeSaleValue { row, value: v });
                None
            }
            None => {
                warnings.push(DataQualityWarning::MissingSaleValue { row });
                None
            }
        };

        let bucket = buckets
            .entry(YearMonth::from_date(date))
            .or_insert_with(MonthBucket::new);
        bucket.customers.insert(record.customer_id.clone());
        if let Some(v) = value {
            bucket.revenue += v;
        }
        bucket.rows.push((record.customer_id.clone(), value));
    }

    let months: Vec<YearMonth> = buckets.keys().copied().collect();
    let mut cohorts = Vec::with_capacity(months.len());

    for &base in &months {
        let base_bucket = &buckets[&base];
        let initial = base_bucket.customers.len();
        if initial == 0 {
            // Cannot normally happen (every row adds its customer), but a
            // zero-customer cohort must never reach the aggregators.
            log::warn!("skipping empty cohort {base}");
            continue;
        }

        let mut retention_rates = BTreeMap::new();
        let mut retention_data = BTreeMap::new();

        for &target in months.iter().filter(|&&m| m > base) {
            let period = base.months_until(target);
            if period < 1 || period as Period > RETENTION_PERIODS {
                continue;
            }
            let period = period as Period;
            let target_bucket = &buckets[&target];

            let retained = base_bucket
                .customers
                .intersection(&target_bucket.customers)
                .count();
            retention_rates.insert(period, retained as f64 / initial as f64);

            let mut activity = PeriodActivity {
                revenue:   0.0,
                purchases: 0,
            };
            for (customer, value) in &target_bucket.rows {
                if !base_bucket.customers.contains(customer) {
                    continue;
                }
                activity.purchases += 1;
                if let Some(v) = value {
                    activity.revenue += v;
                }
            }
            retention_data.insert(period, activity);
        }

        cohorts.push(Cohort {
            month: base,
            initial_customers: initial,
            average_ticket: base_bucket.revenue / initial as f64,
            total_revenue: base_bucket.revenue,
            total_purchases: base_bucket.rows.len() as u64,
            retention_rates,
            retention_data,
        });
    }

    log::debug!(
        "built {} cohorts from {} records ({} warnings)",
        cohorts.len(),
        records.len(),
        warnings.len()
    );

    (cohorts, warnings)
}
