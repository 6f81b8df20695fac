//! Historical aggregator — blends recent cohorts into scalar baselines
//! for the projector.
//!
//! Sparse uploads produce unusable ratios (a single thin cohort, or no
//! cohorts at all), so every output carries a defensive floor. With an
//! empty cohort table the floors are returned directly.

use crate::cohort::Cohort;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_WINDOW: usize = 3;

pub const RETENTION_FLOOR: f64 = 0.10;
pub const REPEAT_PURCHASE_FLOOR: f64 = 0.05;
pub const AVERAGE_TICKET_FLOOR: f64 = 50.0;

/// Ticket substituted when the selected cohorts contain no purchases.
const AVERAGE_TICKET_DEFAULT: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    pub average_ticket:       f64,
    pub retention_rate:       f64,
    pub repeat_purchase_rate: f64,
}

impl HistoricalSummary {
    /// The floor values, returned as-is when no history exists.
    pub fn floor() -> Self {
        Self {
            average_ticket:       AVERAGE_TICKET_FLOOR,
            retention_rate:       RETENTION_FLOOR,
            repeat_purchase_rate: REPEAT_PURCHASE_FLOOR,
        }
    }
}

/// Summarize the last `window` cohorts (typically 3).
///
/// - `retention_rate`: mean of each cohort's first available retention
///   period, 0 contribution when a cohort has none.
/// - `repeat_purchase_rate`: total retention-period purchases over total
///   initial customers.
/// - `average_ticket`: all revenue (initial + retention periods) over
///   all purchases (initial + retention periods).
pub fn aggregate_history(cohorts: &[Cohort], window: usize) -> HistoricalSummary {
    let start = cohorts.len().saturating_sub(window);
    let recent = &cohorts[start..];

    if recent.is_empty() {
        return HistoricalSummary::floor();
    }

    let retention_sum: f64 = recent
        .iter()
        .map(|c| c.first_retention_rate().unwrap_or(0.0))
        .sum();
    let retention_rate = retention_sum / recent.len() as f64;

    let total_customers: usize = recent.iter().map(|c| c.initial_customers).sum();
    let repeat_purchases: u64 = recent
        .iter()
        .flat_map(|c| c.retention_data.values())
        .map(|a| a.purchases)
        .sum();
    let repeat_purchase_rate = if total_customers > 0 {
        repeat_purchases as f64 / total_customers as f64
    } else {
        0.0
    };

    let mut total_revenue: f64 = recent.iter().map(|c| c.total_revenue).sum();
    let mut total_purchases: u64 = recent.iter().map(|c| c.total_purchases).sum();
    for activity in recent.iter().flat_map(|c| c.retention_data.values()) {
        total_revenue += activity.revenue;
        total_purchases += activity.purchases;
    }
    let average_ticket = if total_purchases > 0 {
        total_revenue / total_purchases as f64
    } else {
        AVERAGE_TICKET_DEFAULT
    };

    HistoricalSummary {
        average_ticket:       average_ticket.max(AVERAGE_TICKET_FLOOR),
        retention_rate:       retention_rate.max(RETENTION_FLOOR),
        repeat_purchase_rate: repeat_purchase_rate.max(REPEAT_PURCHASE_FLOOR),
    }
}
