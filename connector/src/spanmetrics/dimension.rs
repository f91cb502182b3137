use serde::{Deserialize, Serialize};

use crate::component::Validator;
use crate::engine;
use crate::error::ConfigError;

/// An extra metric label read from a span attribute.
///
/// When the attribute is missing from a span, `default` is used if set;
/// otherwise the label is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dimension {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn convert(&self) -> engine::Dimension {
        engine::Dimension {
            name: self.name.clone(),
            default: self.default.clone(),
        }
    }
}

impl Validator for Dimension {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::invalid("dimension name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse() {
        let dim: Dimension = serde_json::from_str(r#"{ "name": "http.method" }"#).unwrap();
        assert_eq!(dim, Dimension::new("http.method"));

        let dim: Dimension =
            serde_json::from_str(r#"{ "name": "http.status_code", "default": "200" }"#).unwrap();
        assert_eq!(dim.default.as_deref(), Some("200"));
    }

    #[test]
    fn test_dimension_name_required() {
        assert!(serde_json::from_str::<Dimension>(r#"{ "default": "x" }"#).is_err());
    }

    #[test]
    fn test_dimension_convert() {
        let converted = Dimension::new("http.status_code").with_default("200").convert();
        assert_eq!(converted.name, "http.status_code");
        assert_eq!(converted.default.as_deref(), Some("200"));
    }

    #[test]
    fn test_dimension_empty_name() {
        assert!(Dimension::new("").validate().is_err());
        assert!(Dimension::new("db.system").validate().is_ok());
    }
}
