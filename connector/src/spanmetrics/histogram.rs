//! Histogram block
//!
//! Exactly one of `explicit` or `exponential` selects the bucketing strategy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::component::syntax::{Defaulter, Validator, defaulted, duration_list};
use crate::core::constants::{
    DEFAULT_EXPLICIT_BUCKETS, DEFAULT_EXPONENTIAL_MAX_SIZE, DEFAULT_HISTOGRAM_UNIT,
};
use crate::engine::{self, MetricsUnit};
use crate::error::ConfigError;

/// Unit literal for milliseconds
pub const UNIT_MILLISECONDS: &str = "ms";

/// Unit literal for seconds
pub const UNIT_SECONDS: &str = "s";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "HistogramConfig::defaults", deny_unknown_fields)]
pub struct HistogramConfig {
    pub disable: bool,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponential: Option<ExponentialHistogramConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<ExplicitHistogramConfig>,
}

impl HistogramConfig {
    fn defaults() -> Self {
        defaulted()
    }

    pub fn convert(&self) -> Result<engine::HistogramConfig, ConfigError> {
        let unit = match self.unit.as_str() {
            UNIT_MILLISECONDS => MetricsUnit::Milliseconds,
            UNIT_SECONDS => MetricsUnit::Seconds,
            other => {
                return Err(ConfigError::invalid(format!(
                    "unknown unit {:?}, allowed values are {:?} and {:?}",
                    other, UNIT_MILLISECONDS, UNIT_SECONDS
                )));
            }
        };

        if self.explicit.is_some() && self.exponential.is_some() {
            return Err(ConfigError::invalid(
                "only one of exponential or explicit histogram configuration can be specified",
            ));
        }

        Ok(engine::HistogramConfig {
            disable: self.disable,
            unit,
            exponential: self.exponential.as_ref().map(|e| e.convert()),
            explicit: self.explicit.as_ref().map(|e| e.convert()),
        })
    }
}

impl Defaulter for HistogramConfig {
    fn set_to_default(&mut self) {
        *self = HistogramConfig {
            unit: DEFAULT_HISTOGRAM_UNIT.to_string(),
            ..Default::default()
        };
    }
}

impl Validator for HistogramConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.unit.as_str() {
            UNIT_MILLISECONDS | UNIT_SECONDS => {}
            other => {
                return Err(ConfigError::invalid(format!(
                    "invalid histogram unit: {:?}, must be {:?} or {:?}",
                    other, UNIT_MILLISECONDS, UNIT_SECONDS
                )));
            }
        }

        match (&self.explicit, &self.exponential) {
            (Some(_), Some(_)) => Err(ConfigError::invalid(
                "only one of exponential or explicit histogram configuration can be specified",
            )),
            (None, None) => Err(ConfigError::invalid(
                "either exponential or explicit histogram configuration must be specified",
            )),
            _ => Ok(()),
        }
    }

    fn nested(&self) -> Vec<&dyn Validator> {
        let mut nested: Vec<&dyn Validator> = Vec::new();
        if let Some(exponential) = &self.exponential {
            nested.push(exponential);
        }
        if let Some(explicit) = &self.explicit {
            nested.push(explicit);
        }
        nested
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "ExponentialHistogramConfig::defaults", deny_unknown_fields)]
pub struct ExponentialHistogramConfig {
    pub max_size: i32,
}

impl ExponentialHistogramConfig {
    fn defaults() -> Self {
        defaulted()
    }

    pub fn convert(&self) -> engine::ExponentialHistogramConfig {
        engine::ExponentialHistogramConfig {
            max_size: self.max_size,
        }
    }
}

impl Defaulter for ExponentialHistogramConfig {
    fn set_to_default(&mut self) {
        *self = ExponentialHistogramConfig {
            max_size: DEFAULT_EXPONENTIAL_MAX_SIZE,
        };
    }
}

impl Validator for ExponentialHistogramConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size <= 0 {
            return Err(ConfigError::invalid(format!(
                "max_size must be greater than 0, got {}",
                self.max_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "ExplicitHistogramConfig::defaults", deny_unknown_fields)]
pub struct ExplicitHistogramConfig {
    #[serde(with = "duration_list")]
    pub buckets: Vec<Duration>,
}

impl ExplicitHistogramConfig {
    fn defaults() -> Self {
        defaulted()
    }

    pub fn convert(&self) -> engine::ExplicitHistogramConfig {
        engine::ExplicitHistogramConfig {
            buckets: self.buckets.clone(),
        }
    }
}

impl Defaulter for ExplicitHistogramConfig {
    fn set_to_default(&mut self) {
        *self = ExplicitHistogramConfig {
            buckets: DEFAULT_EXPLICIT_BUCKETS.to_vec(),
        };
    }
}

impl Validator for ExplicitHistogramConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pair) = self.buckets.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ConfigError::invalid(format!(
                "histogram buckets must be in increasing order, found {:?} before {:?}",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::validate_tree;

    fn explicit() -> HistogramConfig {
        serde_json::from_str(r#"{ "explicit": {} }"#).unwrap()
    }

    #[test]
    fn test_histogram_defaults_from_document() {
        let config = explicit();
        assert_eq!(config.unit, "ms");
        assert!(!config.disable);
        assert_eq!(
            config.explicit.as_ref().unwrap().buckets,
            DEFAULT_EXPLICIT_BUCKETS.to_vec()
        );
        assert!(config.exponential.is_none());
    }

    #[test]
    fn test_exponential_default_max_size() {
        let config: HistogramConfig =
            serde_json::from_str(r#"{ "unit": "s", "exponential": {} }"#).unwrap();
        assert_eq!(config.exponential.as_ref().unwrap().max_size, 160);
        assert!(validate_tree(&config).is_ok());
    }

    #[test]
    fn test_explicit_buckets_parse() {
        let config: HistogramConfig =
            serde_json::from_str(r#"{ "explicit": { "buckets": ["5ms", "1s"] } }"#).unwrap();
        assert_eq!(
            config.explicit.unwrap().buckets,
            vec![Duration::from_millis(5), Duration::from_secs(1)]
        );
    }

    #[test]
    fn test_set_to_default_clobbers() {
        let mut config = explicit();
        config.disable = true;
        config.set_to_default();
        assert_eq!(config.unit, "ms");
        assert!(!config.disable);
        assert!(config.explicit.is_none());
    }

    #[test]
    fn test_validate_unit() {
        let mut config = explicit();
        config.unit = "us".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("\"us\""));
    }

    #[test]
    fn test_validate_requires_one_strategy() {
        let mut config = explicit();
        config.explicit = None;
        assert!(config.validate().unwrap_err().to_string().contains("either"));

        let mut config = explicit();
        config.exponential = Some(ExponentialHistogramConfig { max_size: 10 });
        assert!(config.validate().unwrap_err().to_string().contains("only one"));
    }

    #[test]
    fn test_validate_nested_max_size() {
        let config: HistogramConfig =
            serde_json::from_str(r#"{ "exponential": { "max_size": 0 } }"#).unwrap();
        assert!(config.validate().is_ok());
        let err = validate_tree(&config).unwrap_err();
        assert!(err.to_string().contains("max_size"));
    }

    #[test]
    fn test_validate_bucket_order() {
        let config: HistogramConfig =
            serde_json::from_str(r#"{ "explicit": { "buckets": ["1s", "10ms"] } }"#).unwrap();
        assert!(validate_tree(&config).is_err());
    }

    #[test]
    fn test_convert() {
        let converted = explicit().convert().unwrap();
        assert_eq!(converted.unit, MetricsUnit::Milliseconds);
        assert_eq!(converted.explicit.unwrap().buckets.len(), 16);
        assert!(converted.exponential.is_none());
    }

    #[test]
    fn test_convert_seconds_exponential() {
        let config = HistogramConfig {
            disable: true,
            unit: "s".to_string(),
            exponential: Some(ExponentialHistogramConfig { max_size: 40 }),
            explicit: None,
        };
        let converted = config.convert().unwrap();
        assert!(converted.disable);
        assert_eq!(converted.unit, MetricsUnit::Seconds);
        assert_eq!(converted.exponential.unwrap().max_size, 40);
    }

    #[test]
    fn test_convert_unknown_unit() {
        // zero value has an empty unit
        let err = HistogramConfig::default().convert().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("unknown unit \"\""));
    }

    #[test]
    fn test_convert_both_strategies() {
        let mut config = explicit();
        config.exponential = Some(ExponentialHistogramConfig { max_size: 10 });
        assert!(config.convert().is_err());
    }
}
