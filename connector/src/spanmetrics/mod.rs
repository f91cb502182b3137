//! Span metrics connector (`otelcol.connector.spanmetrics`)
//!
//! Accepts traces and emits request/error/duration metrics aggregated from
//! spans. The aggregation is done by the engine; this module owns the
//! user-facing arguments, their defaults and checks, and the translation into
//! [`engine::Config`].
//!
//! Every emitted metric carries `service.name`, `span.name`, `span.kind` and
//! `status.code`, plus one label per configured `dimension` in declaration order.

mod dimension;
mod exemplars;
mod histogram;
pub mod temporality;

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::component::connector::{self, ComponentId, ConnectorArguments, ConnectorType};
use crate::component::registry::{Component, Options, Registration, Registry, Stability};
use crate::component::syntax::{Defaulter, Validator, required};
use crate::component::{ConsumerArguments, ConsumerExports, DataType};
use crate::core::constants::{
    DEFAULT_DIMENSIONS_CACHE_SIZE, DEFAULT_METRICS_FLUSH_INTERVAL, SPANMETRICS_COMPONENT_NAME,
};
use crate::engine::{self, SpanMetricsFactory};
use crate::error::{ComponentError, ConfigError};

pub use dimension::Dimension;
pub use exemplars::ExemplarsConfig;
pub use histogram::{
    ExplicitHistogramConfig, ExponentialHistogramConfig, HistogramConfig, UNIT_MILLISECONDS,
    UNIT_SECONDS,
};
pub use temporality::{AggregationTemporality, CUMULATIVE, DELTA};

/// Add the span metrics connector to a registry
pub fn register(registry: &mut Registry) -> Result<(), ComponentError> {
    registry.register(Registration::new::<Arguments>(
        SPANMETRICS_COMPONENT_NAME,
        Stability::GenerallyAvailable,
        ConsumerExports,
        build,
    ))
}

fn build(opts: Options, args: Arguments) -> Result<Box<dyn Component>, ComponentError> {
    let factory = SpanMetricsFactory::new();
    Ok(Box::new(connector::new(opts, &factory, &args)?))
}

/// Arguments of the span metrics connector.
///
/// `Default` is the zero value. Absent optional attributes in a document take
/// the same values [`Defaulter::set_to_default`] installs. `histogram` and
/// `output` must be present in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Arguments {
    /// Extra dimensions on top of `service.name`, `span.name`, `span.kind`
    /// and `status.code`, read from span attributes
    #[serde(rename = "dimension", default)]
    pub dimensions: Vec<Dimension>,

    /// Default dimensions to drop
    #[serde(default)]
    pub exclude_dimensions: Vec<String>,

    /// Bounds the engine's dimension cache so memory does not grow
    /// for the lifetime of the process
    #[serde(default = "default_dimensions_cache_size")]
    pub dimensions_cache_size: i64,

    #[serde(default = "default_aggregation_temporality")]
    pub aggregation_temporality: String,

    pub histogram: HistogramConfig,

    /// How often metrics are flushed to downstream components
    #[serde(default = "default_metrics_flush_interval", with = "humantime_serde")]
    pub metrics_flush_interval: Duration,

    /// Namespace prefixed to emitted metric names
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub exemplars: ExemplarsConfig,

    /// Where emitted metrics go
    #[serde(deserialize_with = "required")]
    pub output: Option<ConsumerArguments>,
}

fn default_dimensions_cache_size() -> i64 {
    DEFAULT_DIMENSIONS_CACHE_SIZE
}

fn default_aggregation_temporality() -> String {
    CUMULATIVE.to_string()
}

fn default_metrics_flush_interval() -> Duration {
    DEFAULT_METRICS_FLUSH_INTERVAL
}

impl Defaulter for Arguments {
    fn set_to_default(&mut self) {
        *self = Arguments {
            dimensions_cache_size: DEFAULT_DIMENSIONS_CACHE_SIZE,
            aggregation_temporality: CUMULATIVE.to_string(),
            metrics_flush_interval: DEFAULT_METRICS_FLUSH_INTERVAL,
            ..Default::default()
        };
    }
}

impl Validator for Arguments {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions_cache_size <= 0 {
            return Err(ConfigError::invalid(format!(
                "invalid cache size: {}, the maximum number of the items in the cache should be positive",
                self.dimensions_cache_size
            )));
        }

        if self.metrics_flush_interval.is_zero() {
            return Err(ConfigError::invalid(
                "metrics_flush_interval must be greater than 0",
            ));
        }

        if AggregationTemporality::parse(&self.aggregation_temporality).is_none() {
            return Err(ConfigError::invalid(format!(
                "invalid aggregation_temporality: {}",
                self.aggregation_temporality
            )));
        }

        Ok(())
    }

    fn nested(&self) -> Vec<&dyn Validator> {
        let mut nested: Vec<&dyn Validator> = self
            .dimensions
            .iter()
            .map(|d| d as &dyn Validator)
            .collect();
        nested.push(&self.histogram);
        nested.push(&self.exemplars);
        nested
    }
}

impl ConnectorArguments for Arguments {
    type Config = engine::Config;

    fn convert(&self) -> Result<engine::Config, ConfigError> {
        let dimensions = self.dimensions.iter().map(Dimension::convert).collect();

        let histogram = self.histogram.convert()?;

        let aggregation_temporality = temporality::to_engine(&self.aggregation_temporality)?;

        let dimensions_cache_size = usize::try_from(self.dimensions_cache_size).map_err(|_| {
            ConfigError::invalid(format!(
                "invalid cache size: {}, the maximum number of the items in the cache should be positive",
                self.dimensions_cache_size
            ))
        })?;

        Ok(engine::Config {
            dimensions,
            exclude_dimensions: self.exclude_dimensions.clone(),
            dimensions_cache_size,
            aggregation_temporality: aggregation_temporality.to_string(),
            histogram,
            metrics_flush_interval: self.metrics_flush_interval,
            namespace: self.namespace.clone(),
            exemplars: self.exemplars.convert(),
        })
    }

    fn extensions(&self) -> Vec<ComponentId> {
        Vec::new()
    }

    fn exporters(&self) -> BTreeMap<DataType, Vec<ComponentId>> {
        BTreeMap::new()
    }

    fn next_consumers(&self) -> Option<&ConsumerArguments> {
        self.output.as_ref()
    }

    fn connector_type(&self) -> ConnectorType {
        ConnectorType::TracesToMetrics
    }
}
