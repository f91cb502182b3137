//! Span aggregation engine: configuration shape and factory
//!
//! The engine that turns spans into metrics lives outside this crate. What
//! lives here is the configuration it accepts and the factory entry point
//! the connector hands that configuration to.

mod factory;

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use crate::component::syntax::duration_list;
use crate::error::ConfigError;

pub use factory::{SpanMetricsFactory, SpanMetricsInstance};

/// Engine type name
pub const TYPE_NAME: &str = "spanmetrics";

/// Engine literal for cumulative temporality
pub const AGGREGATION_TEMPORALITY_CUMULATIVE: &str = "AGGREGATION_TEMPORALITY_CUMULATIVE";

/// Engine literal for delta temporality
pub const AGGREGATION_TEMPORALITY_DELTA: &str = "AGGREGATION_TEMPORALITY_DELTA";

/// Dimensions the engine always emits
pub const DEFAULT_DIMENSIONS: [&str; 4] = ["service.name", "span.name", "span.kind", "status.code"];

/// Unit of histogram observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricsUnit {
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
}

/// One extra label taken from a span attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplicitHistogramConfig {
    #[serde(with = "duration_list")]
    pub buckets: Vec<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExponentialHistogramConfig {
    pub max_size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramConfig {
    pub disable: bool,
    pub unit: MetricsUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponential: Option<ExponentialHistogramConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<ExplicitHistogramConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExemplarsConfig {
    pub enabled: bool,
    /// `None` means no per-data-point limit
    pub max_per_data_point: Option<usize>,
}

/// Engine-native configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub dimensions: Vec<Dimension>,
    pub exclude_dimensions: Vec<String>,
    pub dimensions_cache_size: usize,
    pub aggregation_temporality: String,
    pub histogram: HistogramConfig,
    #[serde(with = "humantime_serde")]
    pub metrics_flush_interval: Duration,
    pub namespace: String,
    pub exemplars: ExemplarsConfig,
}

impl Config {
    /// The engine's own checks, run before an instance is created
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions_cache_size == 0 {
            return Err(ConfigError::invalid(
                "dimensions_cache_size must be a positive number",
            ));
        }

        if self.metrics_flush_interval.is_zero() {
            return Err(ConfigError::invalid(
                "metrics_flush_interval must be greater than 0",
            ));
        }

        if !matches!(
            self.aggregation_temporality.as_str(),
            AGGREGATION_TEMPORALITY_CUMULATIVE | AGGREGATION_TEMPORALITY_DELTA
        ) {
            return Err(ConfigError::invalid(format!(
                "unsupported aggregation temporality: {}",
                self.aggregation_temporality
            )));
        }

        if self.histogram.explicit.is_some() && self.histogram.exponential.is_some() {
            return Err(ConfigError::invalid(
                "use either `explicit` or `exponential` buckets histogram",
            ));
        }

        let mut seen: HashSet<&str> = DEFAULT_DIMENSIONS.iter().copied().collect();
        for dimension in &self.dimensions {
            if !seen.insert(dimension.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "failed validating dimensions: duplicate dimension name {}",
                    dimension.name
                )));
            }
        }

        Ok(())
    }
}
