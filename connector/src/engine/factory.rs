use crate::component::{ConsumerArguments, CreateSettings, Factory, TracesToMetrics};
use crate::core::constants::{
    DEFAULT_DIMENSIONS_CACHE_SIZE, DEFAULT_EXPLICIT_BUCKETS, DEFAULT_METRICS_FLUSH_INTERVAL,
};
use crate::error::ComponentError;

use super::{
    AGGREGATION_TEMPORALITY_CUMULATIVE, Config, ExemplarsConfig, ExplicitHistogramConfig,
    HistogramConfig, MetricsUnit, TYPE_NAME,
};

/// Factory for span metrics engine instances
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanMetricsFactory;

impl SpanMetricsFactory {
    pub fn new() -> Self {
        Self
    }
}

impl Factory for SpanMetricsFactory {
    type Config = Config;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn create_default_config(&self) -> Config {
        Config {
            dimensions: Vec::new(),
            exclude_dimensions: Vec::new(),
            dimensions_cache_size: DEFAULT_DIMENSIONS_CACHE_SIZE as usize,
            aggregation_temporality: AGGREGATION_TEMPORALITY_CUMULATIVE.to_string(),
            histogram: HistogramConfig {
                disable: false,
                unit: MetricsUnit::Milliseconds,
                exponential: None,
                explicit: Some(ExplicitHistogramConfig {
                    buckets: DEFAULT_EXPLICIT_BUCKETS.to_vec(),
                }),
            },
            metrics_flush_interval: DEFAULT_METRICS_FLUSH_INTERVAL,
            namespace: String::new(),
            exemplars: ExemplarsConfig {
                enabled: false,
                max_per_data_point: None,
            },
        }
    }

    fn create_traces_to_metrics(
        &self,
        settings: CreateSettings,
        config: Config,
        next: ConsumerArguments,
    ) -> Result<Box<dyn TracesToMetrics>, ComponentError> {
        config.validate()?;

        tracing::info!(
            id = %settings.id,
            dimensions = config.dimensions.len(),
            cache_size = config.dimensions_cache_size,
            temporality = %config.aggregation_temporality,
            flush_interval = ?config.metrics_flush_interval,
            "Created span metrics engine"
        );

        Ok(Box::new(SpanMetricsInstance {
            settings,
            config,
            next,
        }))
    }
}

/// A configured span metrics engine. It owns its configuration.
#[derive(Debug)]
pub struct SpanMetricsInstance {
    settings: CreateSettings,
    config: Config,
    next: ConsumerArguments,
}

impl SpanMetricsInstance {
    pub fn id(&self) -> &str {
        &self.settings.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl TracesToMetrics for SpanMetricsInstance {
    fn next_consumers(&self) -> &ConsumerArguments {
        &self.next
    }

    fn effective_config(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ConsumerRef;
    use crate::engine::tests::sample_config;

    fn settings() -> CreateSettings {
        CreateSettings {
            id: "otelcol.connector.spanmetrics.default".to_string(),
        }
    }

    #[test]
    fn test_create_traces_to_metrics() {
        let next = ConsumerArguments {
            metrics: vec![ConsumerRef::new("otelcol.exporter.otlp.default")],
            ..Default::default()
        };
        let instance = SpanMetricsFactory::new()
            .create_traces_to_metrics(settings(), sample_config(), next.clone())
            .unwrap();

        assert_eq!(instance.next_consumers(), &next);
        let config = instance.effective_config().unwrap();
        assert_eq!(config["dimensions_cache_size"], 1000);
        assert_eq!(config["aggregation_temporality"], "AGGREGATION_TEMPORALITY_CUMULATIVE");
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let mut config = sample_config();
        config.dimensions_cache_size = 0;
        let err = SpanMetricsFactory::new()
            .create_traces_to_metrics(settings(), config, ConsumerArguments::default())
            .unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_instance_accessors() {
        let instance = SpanMetricsInstance {
            settings: settings(),
            config: sample_config(),
            next: ConsumerArguments::default(),
        };
        assert_eq!(instance.id(), "otelcol.connector.spanmetrics.default");
        assert_eq!(instance.config(), &sample_config());
    }

    #[test]
    fn test_default_config_is_valid() {
        let factory = SpanMetricsFactory::new();
        let config = factory.create_default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.dimensions_cache_size, 1000);
        assert_eq!(config.histogram.explicit.unwrap().buckets.len(), 16);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(SpanMetricsFactory.type_name(), "spanmetrics");
    }
}
