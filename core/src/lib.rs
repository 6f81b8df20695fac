//! growthlens-core — cohort retention and growth projection engine.
//!
//! Ingests historical per-customer sale records and produces:
//!   1. Empirical monthly cohort retention curves
//!   2. Forward-looking growth projections (customer counts, revenue,
//!      cost, profit, ROI/ROAS, lifetime value) under configurable
//!      acquisition-economics parameters
//!
//! Every stage is a pure, synchronous function over immutable in-memory
//! collections. Re-running the pipeline with identical inputs yields
//! identical outputs; the projection anchor month is an explicit input,
//! never the wall clock. Persistence of derived metrics goes through the
//! injected store in `store`, nothing else does I/O.

pub mod cohort;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod finance;
pub mod history;
pub mod metrics;
pub mod month;
pub mod projection;
pub mod record;
pub mod retention;
pub mod store;
pub mod types;

pub use cohort::{build_cohorts, Cohort, PeriodActivity};
pub use config::AnalysisConfig;
pub use engine::{AnalysisEngine, AnalysisReport};
pub use error::{EngineError, EngineResult};
pub use history::{aggregate_history, HistoricalSummary};
pub use metrics::DatasetMetrics;
pub use month::YearMonth;
pub use projection::{project, FinancialParams, ProjectionRecord};
pub use record::{DataQualityWarning, DateInput, SaleRecord};
pub use retention::aggregate_retention_curve;
pub use store::{MemoryMetricsStore, MetricsStore, SqliteMetricsStore};
