//! Error types for component configuration and construction
//!
//! `ConfigError` is what defaulting, validation and conversion produce.
//! `ComponentError` wraps it with the failures the host registry can hit
//! while turning a document into a running component.

use thiserror::Error;

/// Error raised while validating or converting a component configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration violates a field constraint
    #[error("{0}")]
    InvalidConfiguration(String),
}

impl ConfigError {
    /// Create an invalid configuration error from a message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Error raised by the component registry and connector constructors
#[derive(Error, Debug)]
pub enum ComponentError {
    /// A component with the same name is already registered
    #[error("component {0} is already registered")]
    AlreadyRegistered(String),

    /// No component is registered under the given name
    #[error("unknown component type: {0}")]
    UnknownComponent(String),

    /// The configuration document could not be decoded into arguments
    #[error("decoding arguments for {component}: {source}")]
    Decode {
        component: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration was decoded but is not valid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The component has no downstream consumers declared
    #[error("component {0} has no output block; at least one downstream consumer is required")]
    MissingOutput(String),

    /// The engine cannot run in the requested direction
    #[error("engine {engine} does not support {connector_type} connectors")]
    UnsupportedConnector {
        engine: &'static str,
        connector_type: String,
    },
}

impl ComponentError {
    /// Create a decode error for a component
    pub fn decode(component: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            component: component.to_string(),
            source,
        }
    }

    /// Whether this error came from a configuration constraint
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::Config(ConfigError::InvalidConfiguration(_)))
    }
}
