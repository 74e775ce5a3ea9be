//! # Coordinator Configuration
//!
//! ```yaml
//! require_verifier_for_edge:
//!   "STORED->DELIVERING_LOCAL": true
//! certificate_ttl_secs: 604800
//! ```
//!
//! Both fields are optional. Edges absent from the policy map do not require
//! a witness; an absent TTL means certificates never go stale.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coldchain_state::{BatchStatus, StatusEdge};

/// Errors loading or validating a [`CoordinatorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path as given.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure.
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse failure.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A policy key names a pair that is not a lifecycle edge.
    #[error("{0} is not a lifecycle edge")]
    NotAnEdge(StatusEdge),

    /// A zero TTL would make every certificate stale on issuance.
    #[error("certificate_ttl_secs must be positive")]
    ZeroTtl,
}

/// Policy knobs for the lifecycle coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinatorConfig {
    /// Edges that need a VERIFIER co-signature. Missing edges default to `false`.
    pub require_verifier_for_edge: BTreeMap<StatusEdge, bool>,
    /// Freshness window for presentations, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_ttl_secs: Option<u64>,
}

impl CoordinatorConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. `.json` files parse as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Reject policy entries for non-edges and a zero TTL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(edge) = self
            .require_verifier_for_edge
            .keys()
            .find(|e| !e.is_forward_hop())
        {
            return Err(ConfigError::NotAnEdge(*edge));
        }
        if self.certificate_ttl_secs == Some(0) {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(())
    }

    /// Whether the `from -> to` hop needs a checkpoint witness.
    pub fn requires_witness(&self, from: BatchStatus, to: BatchStatus) -> bool {
        self.require_verifier_for_edge
            .get(&StatusEdge::new(from, to))
            .copied()
            .unwrap_or(false)
    }

    /// Builder-style: require a witness on `from -> to`.
    pub fn with_witness_on(mut self, from: BatchStatus, to: BatchStatus) -> Self {
        self.require_verifier_for_edge
            .insert(StatusEdge::new(from, to), true);
        self
    }

    /// Builder-style: set the presentation TTL.
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.certificate_ttl_secs = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_requires_nothing() {
        let c = CoordinatorConfig::default();
        for edge in BatchStatus::edges() {
            assert!(!c.requires_witness(edge.from, edge.to));
        }
        assert_eq!(c.certificate_ttl_secs, None);
    }

    #[test]
    fn test_yaml_policy() {
        let c = CoordinatorConfig::from_yaml_str(
            "require_verifier_for_edge:\n  \"STORED->DELIVERING_LOCAL\": true\n  \"MANUFACTURED->DELIVERING_INTERNATIONAL\": false\ncertificate_ttl_secs: 3600\n",
        )
        .unwrap();
        assert!(c.requires_witness(BatchStatus::Stored, BatchStatus::DeliveringLocal));
        assert!(!c.requires_witness(
            BatchStatus::Manufactured,
            BatchStatus::DeliveringInternational
        ));
        assert_eq!(c.certificate_ttl_secs, Some(3600));
    }

    #[test]
    fn test_json_policy() {
        let c = CoordinatorConfig::from_json_str(
            r#"{"require_verifier_for_edge": {"DELIVERING_LOCAL->DELIVERED": true}}"#,
        )
        .unwrap();
        assert!(c.requires_witness(BatchStatus::DeliveringLocal, BatchStatus::Delivered));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let c = CoordinatorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(c, CoordinatorConfig::default());
    }

    #[test]
    fn test_non_edge_rejected() {
        let err = CoordinatorConfig::from_yaml_str(
            "require_verifier_for_edge:\n  \"MANUFACTURED->STORED\": true\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotAnEdge(_)));
        assert_eq!(err.to_string(), "MANUFACTURED->STORED is not a lifecycle edge");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(CoordinatorConfig::from_yaml_str("ttl: 5\n").is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(matches!(
            CoordinatorConfig::from_yaml_str("certificate_ttl_secs: 0\n"),
            Err(ConfigError::ZeroTtl)
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("policy.json");
        std::fs::File::create(&json_path)
            .unwrap()
            .write_all(br#"{"certificate_ttl_secs": 60}"#)
            .unwrap();
        assert_eq!(
            CoordinatorConfig::load(&json_path).unwrap().certificate_ttl_secs,
            Some(60)
        );

        let yaml_path = dir.path().join("policy.yaml");
        std::fs::write(&yaml_path, "certificate_ttl_secs: 90\n").unwrap();
        assert_eq!(
            CoordinatorConfig::load(&yaml_path).unwrap().certificate_ttl_secs,
            Some(90)
        );

        assert!(matches!(
            CoordinatorConfig::load(&dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_builders_and_serialization() {
        let c = CoordinatorConfig::default()
            .with_witness_on(BatchStatus::Stored, BatchStatus::DeliveringLocal)
            .with_ttl_secs(10);
        let yaml = serde_yaml::to_string(&c).unwrap();
        assert!(yaml.contains("STORED->DELIVERING_LOCAL"));
        assert_eq!(CoordinatorConfig::from_yaml_str(&yaml).unwrap(), c);
    }
}
