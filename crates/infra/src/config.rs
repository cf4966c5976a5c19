//! Store configuration.

use serde::{Deserialize, Serialize};

use topology_events::ChildLinking;

use crate::error::StoreError;

/// Environment variable selecting [`ChildLinking`] (`flat` or `nested`).
pub const CHILD_LINKING_ENV: &str = "TOPOLOGY_CHILD_LINKING";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Defaults to [`ChildLinking::Flat`].
    #[serde(default)]
    pub child_linking: ChildLinking,
}

impl StoreConfig {
    pub fn new(child_linking: ChildLinking) -> Self {
        Self { child_linking }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (unset keys fall back to defaults).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let child_linking = match lookup(CHILD_LINKING_ENV) {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse()
                .map_err(|e: topology_events::UnknownChildLinking| StoreError::Config(e.to_string()))?,
            _ => ChildLinking::default(),
        };

        Ok(Self { child_linking })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_falls_back_to_flat() {
        let config = StoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.child_linking, ChildLinking::Flat);
    }

    #[test]
    fn reads_nested_mode() {
        let config = StoreConfig::from_lookup(|key| {
            (key == CHILD_LINKING_ENV).then(|| "NESTED".to_string())
        })
        .unwrap();
        assert_eq!(config.child_linking, ChildLinking::Nested);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = StoreConfig::from_lookup(|_| Some("tree".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.child_linking, ChildLinking::Flat);
        let config: StoreConfig = serde_json::from_str(r#"{"child_linking":"nested"}"#).unwrap();
        assert_eq!(config.child_linking, ChildLinking::Nested);
    }
}
