//! Aggregation temporality vocabulary
//!
//! Users write `CUMULATIVE` or `DELTA`; the engine expects
//! `AGGREGATION_TEMPORALITY_*`. Mapping into the engine fails on unknown
//! input. Mapping back never fails and yields `""` for anything unknown,
//! since display code reads engine configs it did not produce.

use std::fmt;

use crate::engine::{AGGREGATION_TEMPORALITY_CUMULATIVE, AGGREGATION_TEMPORALITY_DELTA};
use crate::error::ConfigError;

/// User-facing literal for cumulative temporality
pub const CUMULATIVE: &str = "CUMULATIVE";

/// User-facing literal for delta temporality
pub const DELTA: &str = "DELTA";

/// Aggregation temporality of emitted metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationTemporality {
    Cumulative,
    Delta,
}

impl AggregationTemporality {
    /// Parse a user-facing literal. Case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            CUMULATIVE => Some(Self::Cumulative),
            DELTA => Some(Self::Delta),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cumulative => CUMULATIVE,
            Self::Delta => DELTA,
        }
    }

    pub fn engine_str(&self) -> &'static str {
        match self {
            Self::Cumulative => AGGREGATION_TEMPORALITY_CUMULATIVE,
            Self::Delta => AGGREGATION_TEMPORALITY_DELTA,
        }
    }
}

impl fmt::Display for AggregationTemporality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a user-facing literal to the engine literal
pub fn to_engine(value: &str) -> Result<&'static str, ConfigError> {
    AggregationTemporality::parse(value)
        .map(|t| t.engine_str())
        .ok_or_else(|| ConfigError::invalid(format!("invalid aggregation_temporality: {}", value)))
}

/// Map an engine literal back to the user-facing literal, `""` if unknown
pub fn from_engine(value: &str) -> &'static str {
    match value {
        AGGREGATION_TEMPORALITY_DELTA => DELTA,
        AGGREGATION_TEMPORALITY_CUMULATIVE => CUMULATIVE,
        _ => "",
    }
}
