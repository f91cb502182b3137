//! Downstream consumer handles
//!
//! A connector never routes data itself. It declares which downstream
//! components receive its output and the host wires them up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Telemetry signal carried between components
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Traces,
    Metrics,
    Logs,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traces => "traces",
            Self::Metrics => "metrics",
            Self::Logs => "logs",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque reference to another component's exported consumer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumerRef(String);

impl ConsumerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConsumerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `output` block: downstream consumers per signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerArguments {
    #[serde(default)]
    pub metrics: Vec<ConsumerRef>,
    #[serde(default)]
    pub logs: Vec<ConsumerRef>,
    #[serde(default)]
    pub traces: Vec<ConsumerRef>,
}

impl ConsumerArguments {
    /// Consumers declared for a signal
    pub fn for_type(&self, data_type: DataType) -> &[ConsumerRef] {
        match data_type {
            DataType::Traces => &self.traces,
            DataType::Metrics => &self.metrics,
            DataType::Logs => &self.logs,
        }
    }

    /// Total number of declared consumers across signals
    pub fn len(&self) -> usize {
        self.metrics.len() + self.logs.len() + self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Values a component exposes to the rest of the pipeline
pub trait Exports: fmt::Debug + Send + Sync {
    /// Names of the exported fields
    fn fields(&self) -> &'static [&'static str];
}

/// Exports of components that accept telemetry through an `input` consumer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerExports;

impl Exports for ConsumerExports {
    fn fields(&self) -> &'static [&'static str] {
        &["input"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_arguments_parse() {
        let json = r#"{ "metrics": ["otelcol.exporter.otlp.default"] }"#;
        let output: ConsumerArguments = serde_json::from_str(json).unwrap();

        assert_eq!(output.metrics, vec![ConsumerRef::new("otelcol.exporter.otlp.default")]);
        assert!(output.logs.is_empty());
        assert!(output.traces.is_empty());
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_consumer_arguments_unknown_signal() {
        let json = r#"{ "profiles": ["x"] }"#;
        assert!(serde_json::from_str::<ConsumerArguments>(json).is_err());
    }

    #[test]
    fn test_consumer_arguments_for_type() {
        let output = ConsumerArguments {
            metrics: vec![ConsumerRef::new("a")],
            logs: vec![],
            traces: vec![ConsumerRef::new("b"), ConsumerRef::new("c")],
        };
        assert_eq!(output.for_type(DataType::Metrics).len(), 1);
        assert_eq!(output.for_type(DataType::Traces)[1].as_str(), "c");
        assert!(output.for_type(DataType::Logs).is_empty());
    }

    #[test]
    fn test_empty_output() {
        assert!(ConsumerArguments::default().is_empty());
    }

    #[test]
    fn test_consumer_exports_fields() {
        assert_eq!(ConsumerExports.fields(), &["input"]);
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Metrics.to_string(), "metrics");
    }
}
