//! Component registry
//!
//! The registry is an ordinary value owned by the composition root. Components
//! are added with an explicit [`Registry::register`] call at startup; nothing
//! registers itself at load time.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::consumer::Exports;
use super::syntax::{Validator, validate_tree};
use crate::error::ComponentError;

/// Maturity tier of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stability {
    Experimental,
    PublicPreview,
    GenerallyAvailable,
}

impl Stability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experimental => "experimental",
            Self::PublicPreview => "public-preview",
            Self::GenerallyAvailable => "generally-available",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-instance options handed to a build function
#[derive(Debug, Clone)]
pub struct Options {
    /// Fully qualified instance id, e.g. `otelcol.connector.spanmetrics.default`
    pub id: String,
}

/// A built component instance
pub trait Component: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    /// The configuration the component ended up running with
    fn effective_config(&self) -> Result<serde_json::Value, serde_json::Error>;
}

/// Typed build function of a component
pub type BuildFn<A> = fn(Options, A) -> Result<Box<dyn Component>, ComponentError>;

type ErasedBuild =
    Box<dyn Fn(Options, &serde_json::Value) -> Result<Box<dyn Component>, ComponentError> + Send + Sync>;

type ErasedPrototype = Box<dyn Fn() -> Result<serde_json::Value, serde_json::Error> + Send + Sync>;

/// Everything the host needs to know about a component type
pub struct Registration {
    name: &'static str,
    stability: Stability,
    exports: Box<dyn Exports>,
    prototype: ErasedPrototype,
    build: ErasedBuild,
}

impl Registration {
    /// Describe a component whose arguments decode from a document.
    ///
    /// `A::default()` is the zero-value prototype. Building decodes the
    /// document into `A`, validates the whole block tree, then calls `build`.
    pub fn new<A>(
        name: &'static str,
        stability: Stability,
        exports: impl Exports + 'static,
        build: BuildFn<A>,
    ) -> Self
    where
        A: Default + Validator + Serialize + DeserializeOwned + 'static,
    {
        let erased = move |opts: Options,
                           document: &serde_json::Value|
              -> Result<Box<dyn Component>, ComponentError> {
            let args: A = serde_json::from_value(document.clone())
                .map_err(|e| ComponentError::decode(name, e))?;
            validate_tree(&args)?;
            build(opts, args)
        };

        Self {
            name,
            stability,
            exports: Box::new(exports),
            prototype: Box::new(|| serde_json::to_value(A::default())),
            build: Box::new(erased),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    pub fn exports(&self) -> &dyn Exports {
        self.exports.as_ref()
    }

    /// Zero-value arguments, serialized
    pub fn prototype(&self) -> Result<serde_json::Value, serde_json::Error> {
        (self.prototype)()
    }

    /// Decode, validate and build an instance from a document
    pub fn build(
        &self,
        opts: Options,
        document: &serde_json::Value,
    ) -> Result<Box<dyn Component>, ComponentError> {
        (self.build)(opts, document)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("stability", &self.stability)
            .field("exports", &self.exports)
            .finish_non_exhaustive()
    }
}

/// Set of known component types, keyed by name
#[derive(Debug, Default)]
pub struct Registry {
    components: BTreeMap<&'static str, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component type. Names must be unique.
    pub fn register(&mut self, registration: Registration) -> Result<(), ComponentError> {
        let name = registration.name();
        if self.components.contains_key(name) {
            return Err(ComponentError::AlreadyRegistered(name.to_string()));
        }
        tracing::debug!(
            name,
            stability = %registration.stability(),
            "Registered component"
        );
        self.components.insert(name, registration);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.components.get(name)
    }

    /// Registered component names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.keys().copied()
    }

    /// Build an instance of the named component type from a document
    pub fn build(
        &self,
        name: &str,
        opts: Options,
        document: &serde_json::Value,
    ) -> Result<Box<dyn Component>, ComponentError> {
        let registration = self
            .get(name)
            .ok_or_else(|| ComponentError::UnknownComponent(name.to_string()))?;
        registration.build(opts, document)
    }
}
