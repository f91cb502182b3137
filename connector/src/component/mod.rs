//! Host framework seams
//!
//! - `syntax` - defaulting and validation traits for argument blocks
//! - `consumer` - downstream consumer handles and exports
//! - `connector` - generic connector construction over an engine factory
//! - `registry` - explicit component registry

pub mod connector;
pub mod consumer;
pub mod registry;
pub mod syntax;

pub use connector::{
    ComponentId, Connector, ConnectorArguments, ConnectorType, CreateSettings, Factory,
    TracesToMetrics,
};
pub use consumer::{ConsumerArguments, ConsumerExports, ConsumerRef, DataType, Exports};
pub use registry::{Component, Options, Registration, Registry, Stability};
pub use syntax::{Defaulter, Validator, validate_tree};
