//! The analysis engine — wires the pipeline stages together.
//!
//! STAGE ORDER (fixed, documented, never reordered):
//!   1. Cohort builder
//!   2. Dataset metrics
//!   3. Historical aggregator
//!   4. Retention curve aggregator
//!   5. Growth projector
//!
//! RULES:
//!   - Every stage is a pure function over immutable inputs.
//!   - The engine never reads ambient state; parameters, configuration,
//!     and the anchor month are explicit inputs.
//!   - Parameter problems abort before any simulation state is created;
//!     row problems become warnings and the run continues.
//!   - Persistence happens only through the injected `MetricsStore`.

use crate::{
    cohort::{build_cohorts, Cohort},
    config::AnalysisConfig,
    error::{EngineError, EngineResult},
    history::{aggregate_history, HistoricalSummary},
    metrics::DatasetMetrics,
    month::YearMonth,
    projection::{project, FinancialParams, ProjectionRecord},
    record::{DataQualityWarning, SaleRecord},
    retention::aggregate_retention_curve,
    store::MetricsStore,
};
use serde::{Deserialize, Serialize};

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub cohorts:         Vec<Cohort>,
    pub warnings:        Vec<DataQualityWarning>,
    pub metrics:         DatasetMetrics,
    pub summary:         HistoricalSummary,
    pub retention_curve: Vec<f64>,
    pub projections:     Vec<ProjectionRecord>,
}

pub struct AnalysisEngine<S: MetricsStore> {
    config: AnalysisConfig,
    store:  S,
}

impl<S: MetricsStore> AnalysisEngine<S> {
    pub fn new(config: AnalysisConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Run the full pipeline. Pure with respect to the store — re-running
    /// with identical inputs yields an identical report.
    pub fn analyze(
        &self,
        records: &[SaleRecord],
        params: &FinancialParams,
        anchor: YearMonth,
    ) -> EngineResult<AnalysisReport> {
        if records.is_empty() {
            return Err(EngineError::EmptyDataset);
        }
        params.validate()?;

        let (cohorts, warnings) = build_cohorts(records);
        if !warnings.is_empty() {
            log::warn!(
                "{} of {} rows raised data-quality warnings",
                warnings.len(),
                records.len()
            );
        }
        log::info!("built {} cohorts from {} records", cohorts.len(), records.len());

        let metrics = DatasetMetrics::compute(records);
        let summary = aggregate_history(&cohorts, self.config.history_window);
        let retention_curve =
            aggregate_retention_curve(&cohorts, self.config.retention_multiplier)?;

        let average_ticket = self.config.average_ticket.unwrap_or(summary.average_ticket);
        let projections = project(params, &retention_curve, average_ticket, anchor)?;
        log::info!(
            "projected {} months from anchor {anchor} (ticket {average_ticket:.2})",
            projections.len()
        );

        Ok(AnalysisReport {
            cohorts,
            warnings,
            metrics,
            summary,
            retention_curve,
            projections,
        })
    }

    /// `analyze`, then persist the dataset metrics through the store.
    pub fn analyze_and_store(
        &mut self,
        records: &[SaleRecord],
        params: &FinancialParams,
        anchor: YearMonth,
    ) -> EngineResult<AnalysisReport> {
        let report = self.analyze(records, params, anchor)?;
        let snapshot_id = self.store.save(&report.metrics)?;
        log::info!("dataset metrics persisted (snapshot {snapshot_id})");
        Ok(report)
    }

    /// Previously persisted metrics, or `MetricsNotFound`.
    pub fn stored_metrics(&self) -> EngineResult<DatasetMetrics> {
        self.store.load()?.ok_or(EngineError::MetricsNotFound)
    }

    pub fn clear_stored_metrics(&mut self) -> EngineResult<()> {
        self.store.clear()
    }
}
