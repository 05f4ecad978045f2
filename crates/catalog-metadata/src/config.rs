//! Runtime configuration for freshness checks

use std::path::Path;

use catalog_backend::VersionBackend;
use catalog_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::classifier::{DEFAULT_BBOX_TOLERANCE, FreshnessClassifier};
use crate::policy::policy_by_name;
use crate::repair::FixOptions;
use crate::{Error, Result};

/// Settings for detection, classification, and repair.
///
/// Loaded from TOML, JSON, or YAML. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    /// Registry name of the version backend
    pub backend: String,
    /// Absolute tolerance per bounding-box component
    pub bbox_tolerance: f64,
    /// Whether equal mtimes short-circuit to FRESH
    pub trust_mtime: bool,
    /// `structural`, `strict`, or `lenient`
    pub schema_policy: String,
    pub dry_run: bool,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            bbox_tolerance: DEFAULT_BBOX_TOLERANCE,
            trust_mtime: true,
            schema_policy: "structural".to_string(),
            dry_run: false,
        }
    }
}

impl FreshnessConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded freshness config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bbox_tolerance.is_finite() || self.bbox_tolerance < 0.0 {
            return Err(Error::Config {
                message: format!(
                    "bbox_tolerance must be a non-negative number, got {}",
                    self.bbox_tolerance
                ),
            });
        }
        policy_by_name(&self.schema_policy)?;
        Ok(())
    }

    pub fn classifier(&self) -> Result<FreshnessClassifier> {
        Ok(FreshnessClassifier::new()
            .with_bbox_tolerance(self.bbox_tolerance)
            .with_trust_mtime(self.trust_mtime)
            .with_boxed_policy(policy_by_name(&self.schema_policy)?))
    }

    pub fn fix_options(&self) -> FixOptions {
        FixOptions {
            dry_run: self.dry_run,
        }
    }

    pub fn resolve_backend(&self) -> Result<Box<dyn VersionBackend>> {
        Ok(catalog_backend::resolve(&self.backend)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("freshness.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(FreshnessConfig::load(&path).unwrap(), FreshnessConfig::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("freshness.toml");
        std::fs::write(&path, "schema_policy = \"strict\"\ntrust_mtime = false\n").unwrap();

        let config = FreshnessConfig::load(&path).unwrap();

        assert_eq!(config.schema_policy, "strict");
        assert!(!config.trust_mtime);
        assert_eq!(config.backend, "file");
        assert_eq!(config.classifier().unwrap().policy().name(), "strict");
    }

    #[test]
    fn defaults_resolve_file_backend() {
        let config = FreshnessConfig::default();
        assert_eq!(config.resolve_backend().unwrap().name(), "file");
        assert!(!config.fix_options().dry_run);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("freshness.json");
        let config = FreshnessConfig {
            dry_run: true,
            schema_policy: "lenient".to_string(),
            ..FreshnessConfig::default()
        };

        config.save(&path).unwrap();

        assert_eq!(FreshnessConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let config = FreshnessConfig {
            schema_policy: "loose".to_string(),
            ..FreshnessConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let config = FreshnessConfig {
            bbox_tolerance: -1.0,
            ..FreshnessConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }
}
