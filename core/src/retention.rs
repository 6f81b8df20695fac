//! Retention curve aggregator — blends per-cohort retention into one
//! ordered vector, optionally scaled by a scenario multiplier.

use crate::{
    cohort::{Cohort, RETENTION_PERIODS},
    error::{EngineError, EngineResult},
};

pub const MULTIPLIER_MIN: f64 = 0.5;
pub const MULTIPLIER_MAX: f64 = 2.0;
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

/// For each period 1..=12, the arithmetic mean of the rates defined
/// across cohorts, times `multiplier`. Periods with no contributing
/// cohort are omitted, so the vector may be shorter than 12 — consumers
/// treat indices past the end as fully churned.
pub fn aggregate_retention_curve(cohorts: &[Cohort], multiplier: f64) -> EngineResult<Vec<f64>> {
    if !(MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&multiplier) {
        return Err(EngineError::invalid(
            "retention_multiplier",
            format!("must be within [{MULTIPLIER_MIN}, {MULTIPLIER_MAX}], got {multiplier}"),
        ));
    }

    let mut curve = Vec::new();
    for period in 1..=RETENTION_PERIODS {
        let mut sum = 0.0;
        let mut count = 0usize;
        for cohort in cohorts {
            if let Some(rate) = cohort.retention_rates.get(&period) {
                sum += rate;
                count += 1;
            }
        }
        if count > 0 {
            curve.push(sum / count as f64 * multiplier);
        }
    }

    Ok(curve)
}
