//! Generic connector construction
//!
//! A connector consumes one signal and produces another. The component's
//! arguments convert themselves into the engine-native configuration through
//! [`ConnectorArguments`], and an engine [`Factory`] turns that configuration
//! into a running instance. The associated `Config` type ties both sides
//! together at compile time.

use std::collections::BTreeMap;
use std::fmt;

use super::consumer::{ConsumerArguments, DataType};
use super::registry::{Component, Options};
use crate::error::{ComponentError, ConfigError};

/// Direction of a connector: which signal it consumes and which it emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorType {
    TracesToMetrics,
    TracesToLogs,
    MetricsToLogs,
}

impl ConnectorType {
    /// Signal consumed by the connector
    pub fn input(&self) -> DataType {
        match self {
            Self::TracesToMetrics | Self::TracesToLogs => DataType::Traces,
            Self::MetricsToLogs => DataType::Metrics,
        }
    }

    /// Signal emitted by the connector
    pub fn output(&self) -> DataType {
        match self {
            Self::TracesToMetrics => DataType::Metrics,
            Self::TracesToLogs | Self::MetricsToLogs => DataType::Logs,
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_to_{}", self.input(), self.output())
    }
}

/// Identifier of a host-managed component (extension or exporter)
pub type ComponentId = String;

/// Arguments of a connector component
pub trait ConnectorArguments {
    /// Engine-native configuration produced by [`convert`](Self::convert)
    type Config;

    /// Translate the arguments into the engine's configuration
    fn convert(&self) -> Result<Self::Config, ConfigError>;

    /// Extensions the connector needs from the host
    fn extensions(&self) -> Vec<ComponentId>;

    /// Exporters the connector needs, per signal
    fn exporters(&self) -> BTreeMap<DataType, Vec<ComponentId>>;

    /// Downstream consumers declared in the `output` block
    fn next_consumers(&self) -> Option<&ConsumerArguments>;

    /// Fixed direction of the connector
    fn connector_type(&self) -> ConnectorType;
}

/// Settings handed to an engine factory when creating an instance
#[derive(Debug, Clone)]
pub struct CreateSettings {
    pub id: String,
}

/// A running traces-to-metrics engine instance
pub trait TracesToMetrics: fmt::Debug + Send + Sync {
    /// Downstream consumers the instance feeds
    fn next_consumers(&self) -> &ConsumerArguments;

    /// The configuration the instance runs with, for display
    fn effective_config(&self) -> Result<serde_json::Value, serde_json::Error>;
}

/// Construction entry point of an external engine
pub trait Factory {
    type Config;

    /// Engine type name, e.g. `spanmetrics`
    fn type_name(&self) -> &'static str;

    /// The engine's configuration when nothing is set by the user
    fn create_default_config(&self) -> Self::Config;

    fn create_traces_to_metrics(
        &self,
        settings: CreateSettings,
        config: Self::Config,
        next: ConsumerArguments,
    ) -> Result<Box<dyn TracesToMetrics>, ComponentError>;
}

/// A constructed connector component
#[derive(Debug)]
pub struct Connector {
    id: String,
    connector_type: ConnectorType,
    engine: &'static str,
    instance: Box<dyn TracesToMetrics>,
}

impl Connector {
    pub fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    /// Type name of the engine backing this connector
    pub fn engine(&self) -> &'static str {
        self.engine
    }

    pub fn next_consumers(&self) -> &ConsumerArguments {
        self.instance.next_consumers()
    }
}

impl Component for Connector {
    fn id(&self) -> &str {
        &self.id
    }

    fn effective_config(&self) -> Result<serde_json::Value, serde_json::Error> {
        self.instance.effective_config()
    }
}

/// Build a connector from its arguments and an engine factory.
///
/// The declared output is cloned for the engine; the arguments keep their own copy.
pub fn new<F, A>(opts: Options, factory: &F, args: &A) -> Result<Connector, ComponentError>
where
    A: ConnectorArguments,
    F: Factory<Config = A::Config>,
{
    let next = args
        .next_consumers()
        .cloned()
        .ok_or_else(|| ComponentError::MissingOutput(opts.id.clone()))?;

    let connector_type = args.connector_type();
    let extensions = args.extensions();
    let exporters = args.exporters();
    tracing::debug!(
        id = %opts.id,
        engine = factory.type_name(),
        connector_type = %connector_type,
        extensions = extensions.len(),
        exporters = exporters.len(),
        consumers = next.len(),
        "Building connector"
    );

    if next.for_type(connector_type.output()).is_empty() {
        tracing::warn!(
            id = %opts.id,
            signal = %connector_type.output(),
            "Connector output declares no consumers for the emitted signal"
        );
    }

    let config = args.convert()?;
    let settings = CreateSettings { id: opts.id.clone() };

    let instance = match connector_type {
        ConnectorType::TracesToMetrics => factory.create_traces_to_metrics(settings, config, next)?,
        other => {
            return Err(ComponentError::UnsupportedConnector {
                engine: factory.type_name(),
                connector_type: other.to_string(),
            });
        }
    };

    Ok(Connector {
        id: opts.id,
        connector_type,
        engine: factory.type_name(),
        instance,
    })
}
