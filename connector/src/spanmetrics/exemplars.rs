use serde::{Deserialize, Serialize};

use crate::component::Validator;
use crate::engine;
use crate::error::ConfigError;

/// Exemplar attachment on emitted data points
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExemplarsConfig {
    pub enabled: bool,
    /// Exemplars kept per data point, 0 for no limit
    pub max_per_data_point: i64,
}

impl ExemplarsConfig {
    pub fn convert(&self) -> engine::ExemplarsConfig {
        engine::ExemplarsConfig {
            enabled: self.enabled,
            max_per_data_point: usize::try_from(self.max_per_data_point)
                .ok()
                .filter(|n| *n > 0),
        }
    }
}

impl Validator for ExemplarsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_per_data_point < 0 {
            return Err(ConfigError::invalid(format!(
                "exemplars max_per_data_point must not be negative, got {}",
                self.max_per_data_point
            )));
        }
        Ok(())
    }
}
