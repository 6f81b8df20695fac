//! Analysis configuration — tuning knobs for the pipeline stages.
//!
//! Deserializable so runners can load it from a JSON file; every field
//! defaults to the documented policy value.

use crate::{history::DEFAULT_HISTORY_WINDOW, retention::DEFAULT_MULTIPLIER};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How many trailing cohorts the historical aggregator blends.
    pub history_window: usize,

    /// Scenario multiplier applied to the blended retention curve,
    /// valid range [0.5, 2.0].
    pub retention_multiplier: f64,

    /// When set, overrides the historically derived average ticket as
    /// the projector's revenue-per-customer input.
    pub average_ticket: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            retention_multiplier: DEFAULT_MULTIPLIER,
            average_ticket: None,
        }
    }
}
