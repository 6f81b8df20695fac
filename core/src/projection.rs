//! Growth projector — simulates a rolling horizon of compounding cohorts.
//!
//! Each simulated month acquires `floor(investment / cac)` new customers
//! and retains customers from every earlier simulated cohort according to
//! that cohort's age and the retention curve. The cohort accumulator is
//! explicit state threaded through the loop, so the whole projection is a
//! pure function of `(params, curve, ticket, anchor)`.

use crate::{
    error::{EngineError, EngineResult},
    finance,
    month::YearMonth,
};
use serde::{Deserialize, Serialize};

/// Hard cap on the simulated horizon. Work is O(cohorts × horizon); the
/// cap is an input-validation guard, not a cancellation mechanism.
pub const MAX_PROJECTION_MONTHS: u32 = 60;

/// Acquisition-economics parameters, supplied by the caller and validated
/// before any simulation state is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialParams {
    /// Customer acquisition cost. Must be positive — it divides the
    /// monthly investment.
    pub cac: f64,
    /// Per-customer monetization/servicing cost per month.
    pub cpv: f64,
    pub monthly_investment: f64,
    /// Contribution margin as a fraction in [0, 1].
    pub margin: f64,
    pub monetization_investment: f64,
    pub projection_months: u32,
}

impl Default for FinancialParams {
    fn default() -> Self {
        Self {
            cac: 100.0,
            cpv: 10.0,
            monthly_investment: 10_000.0,
            margin: 0.3,
            monetization_investment: 0.0,
            projection_months: 12,
        }
    }
}

impl FinancialParams {
    pub fn validate(&self) -> EngineResult<()> {
        if !self.cac.is_finite() || self.cac <= 0.0 {
            return Err(EngineError::invalid("cac", "must be a positive number"));
        }
        if !self.cpv.is_finite() || self.cpv < 0.0 {
            return Err(EngineError::invalid("cpv", "must be non-negative"));
        }
        if !self.monthly_investment.is_finite() || self.monthly_investment < 0.0 {
            return Err(EngineError::invalid("monthly_investment", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.margin) {
            return Err(EngineError::invalid("margin", "must be within [0, 1]"));
        }
        if !self.monetization_investment.is_finite() || self.monetization_investment < 0.0 {
            return Err(EngineError::invalid(
                "monetization_investment",
                "must be non-negative",
            ));
        }
        if self.projection_months > MAX_PROJECTION_MONTHS {
            return Err(EngineError::invalid(
                "projection_months",
                format!("horizon capped at {MAX_PROJECTION_MONTHS} months"),
            ));
        }
        Ok(())
    }
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub month: YearMonth,
    pub new_customers: u64,
    pub retained_customers: u64,
    pub total_customers: u64,
    pub revenue: f64,
    pub acquisition_cost: f64,
    pub monetization_cost: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub operational_margin_pct: f64,
    pub roi_pct: f64,
    pub roas: f64,
    /// Echo of the input contribution margin, as a percentage.
    pub margin_pct: f64,
    pub retention_rate_pct: f64,
    pub ltv: f64,
}

/// Simulate `params.projection_months` months starting the month after
/// `anchor`. The retention curve and average ticket are held constant
/// across the horizon.
pub fn project(
    params: &FinancialParams,
    retention_curve: &[f64],
    average_ticket: f64,
    anchor: YearMonth,
) -> EngineResult<Vec<ProjectionRecord>> {
    params.validate()?;
    if !average_ticket.is_finite() || average_ticket < 0.0 {
        return Err(EngineError::invalid("average_ticket", "must be non-negative"));
    }

    let new_customers = (params.monthly_investment / params.cac).floor() as u64;

    // LTV uses the first-period retention only; it is a constant of the
    // scenario, recomputed identically for every month.
    let scenario_ltv = finance::ltv(
        average_ticket,
        params.margin,
        retention_curve.first().copied().unwrap_or(0.0),
    );

    let horizon = params.projection_months;
    let mut cohorts: Vec<(u32, u64)> = Vec::with_capacity(horizon as usize);
    let mut records = Vec::with_capacity(horizon as usize);

    for i in 0..horizon {
        cohorts.push((i, new_customers));

        let mut retained: u64 = 0;
        for &(origin, size) in &cohorts {
            let age = (i - origin) as usize;
            if age == 0 {
                // The cohort created this step is counted as new, not retained.
                continue;
            }
            if let Some(rate) = retention_curve.get(age - 1) {
                retained += (size as f64 * rate).floor() as u64;
            }
        }

        let total = new_customers + retained;
        let revenue = total as f64 * average_ticket;
        let acquisition_cost = params.monthly_investment;
        let monetization_cost = total as f64 * params.cpv;
        let total_cost = acquisition_cost + monetization_cost;
        let profit = revenue * params.margin - total_cost;

        records.push(ProjectionRecord {
            month: anchor.plus_months(i + 1),
            new_customers,
            retained_customers: retained,
            total_customers: total,
            revenue,
            acquisition_cost,
            monetization_cost,
            total_cost,
            profit,
            operational_margin_pct: finance::ratio_pct(profit, revenue),
            roi_pct: finance::ratio_pct(profit, total_cost),
            roas: finance::ratio(revenue, total_cost),
            margin_pct: params.margin * 100.0,
            retention_rate_pct: finance::ratio_pct(
                retained as f64,
                (total - new_customers) as f64,
            ),
            ltv: scenario_ltv,
        });
    }

    log::debug!(
        "projected {} months: {} new customers per month at cac {}",
        records.len(),
        new_customers,
        params.cac
    );

    Ok(records)
}
