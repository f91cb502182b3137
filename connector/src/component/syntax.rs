//! Configuration block traits
//!
//! Every argument block that has defaults implements [`Defaulter`]; every
//! block with constraints implements [`Validator`]. Blocks list their nested
//! blocks through [`Validator::nested`] so the whole tree is checked in one
//! pass by [`validate_tree`].

use crate::error::ConfigError;

/// A block that can reset itself to its documented baseline
pub trait Defaulter {
    /// Overwrite every field with the baseline value
    fn set_to_default(&mut self);
}

/// A block that can check its own constraints
pub trait Validator {
    /// Check this block's own fields. Nested blocks are not visited.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Nested blocks carrying their own validation
    fn nested(&self) -> Vec<&dyn Validator> {
        Vec::new()
    }
}

/// Validate a block, then each nested block depth-first.
///
/// The first failure is returned unchanged.
pub fn validate_tree(block: &dyn Validator) -> Result<(), ConfigError> {
    block.validate()?;
    for child in block.nested() {
        validate_tree(child)?;
    }
    Ok(())
}

/// Build a block's baseline value through its [`Defaulter`] impl
pub fn defaulted<T: Default + Defaulter>() -> T {
    let mut value = T::default();
    value.set_to_default();
    value
}

/// Serde helpers for `Vec<Duration>` written as humantime strings ("250ms")
pub mod duration_list {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|d| humantime_serde::Serde::from(*d)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Duration>, D::Error> {
        let values: Vec<humantime_serde::Serde<Duration>> = Vec::deserialize(deserializer)?;
        Ok(values.into_iter().map(|d| d.into_inner()).collect())
    }
}

/// Deserialize a required block that is stored as `Option<T>`.
///
/// Serde treats missing `Option` fields as `None`; routing the field through
/// `deserialize_with` makes a missing key a decode error instead.
pub fn required<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Default)]
    struct Leaf {
        limit: i32,
    }

    impl Defaulter for Leaf {
        fn set_to_default(&mut self) {
            *self = Leaf { limit: 10 };
        }
    }

    impl Validator for Leaf {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.limit <= 0 {
                return Err(ConfigError::invalid(format!("leaf limit {}", self.limit)));
            }
            Ok(())
        }
    }

    struct Root {
        ok: bool,
        leaves: Vec<Leaf>,
    }

    impl Validator for Root {
        fn validate(&self) -> Result<(), ConfigError> {
            if !self.ok {
                return Err(ConfigError::invalid("root"));
            }
            Ok(())
        }

        fn nested(&self) -> Vec<&dyn Validator> {
            self.leaves.iter().map(|l| l as &dyn Validator).collect()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Buckets {
        #[serde(with = "duration_list")]
        buckets: Vec<Duration>,
    }

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "required")]
        inner: Option<u32>,
    }

    #[test]
    fn test_defaulted_uses_set_to_default() {
        let leaf: Leaf = defaulted();
        assert_eq!(leaf.limit, 10);
    }

    #[test]
    fn test_validate_tree_root_first() {
        let root = Root {
            ok: false,
            leaves: vec![Leaf { limit: 0 }],
        };
        assert_eq!(validate_tree(&root).unwrap_err().to_string(), "root");
    }

    #[test]
    fn test_validate_tree_reaches_nested() {
        let root = Root {
            ok: true,
            leaves: vec![Leaf { limit: 1 }, Leaf { limit: -3 }],
        };
        assert_eq!(validate_tree(&root).unwrap_err().to_string(), "leaf limit -3");
    }

    #[test]
    fn test_duration_list_parse() {
        let parsed: Buckets = serde_json::from_str(r#"{"buckets": ["2ms", "1s", "1m"]}"#).unwrap();
        assert_eq!(
            parsed.buckets,
            vec![
                Duration::from_millis(2),
                Duration::from_secs(1),
                Duration::from_secs(60)
            ]
        );
    }

    #[test]
    fn test_duration_list_rejects_garbage() {
        let parsed: Result<Buckets, _> = serde_json::from_str(r#"{"buckets": ["fast"]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_required_missing_is_error() {
        let parsed: Result<Wrapper, _> = serde_json::from_str("{}");
        assert!(parsed.unwrap_err().to_string().contains("missing field `inner`"));

        let parsed: Wrapper = serde_json::from_str(r#"{"inner": 3}"#).unwrap();
        assert_eq!(parsed.inner, Some(3));
    }
}
