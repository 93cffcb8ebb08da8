//! Builder configuration.
//!
//! Loaded from TOML, with environment variable overrides:
//!
//! ```toml
//! strict_handlers = true
//! max_depth = 32
//! ```

use std::path::Path;

use cmdtree_core::DslError;
use serde::{Deserialize, Serialize};

/// Declaration and assembly settings shared by every command built with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Attaching a second handler directly to the same node is an error
    /// instead of an overwrite.
    pub strict_handlers: bool,

    /// Maximum node depth below the root literal.
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    64
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            strict_handlers: false,
            max_depth: default_max_depth(),
        }
    }
}

impl BuilderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, DslError> {
        let config: Self = toml::from_str(content).map_err(|e| DslError::Config {
            message: format!("invalid builder config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it does not exist.
    ///
    /// `CMDTREE_STRICT_HANDLERS` and `CMDTREE_MAX_DEPTH` override the file.
    pub fn load_from(path: &Path) -> Result<Self, DslError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| DslError::Config {
                message: format!("cannot read {}: {e}", path.display()),
            })?;
            Self::from_toml(&content)?
        } else {
            tracing::info!("No builder config found at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), DslError> {
        if let Some(strict) = var("CMDTREE_STRICT_HANDLERS") {
            self.strict_handlers = matches!(strict.as_str(), "1" | "true" | "yes");
        }
        if let Some(depth) = var("CMDTREE_MAX_DEPTH") {
            self.max_depth = depth.parse().map_err(|_| DslError::Config {
                message: format!("CMDTREE_MAX_DEPTH must be a positive integer, got '{depth}'"),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), DslError> {
        if self.max_depth == 0 {
            return Err(DslError::Config {
                message: "max_depth must be > 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_lenient() {
        let config = BuilderConfig::default();
        assert!(!config.strict_handlers);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = BuilderConfig::from_toml("strict_handlers = true").unwrap();
        assert!(config.strict_handlers);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = BuilderConfig::from_toml("max_depth = 0").unwrap_err();
        assert!(matches!(err, DslError::Config { .. }));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = BuilderConfig::from_toml("max_depth = \"deep\"").unwrap_err();
        assert!(err.to_string().contains("invalid builder config"));
    }

    #[test]
    fn load_from_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 8").unwrap();
        let config = BuilderConfig::load_from(file.path()).unwrap();
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuilderConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = BuilderConfig::from_toml("max_depth = 8").unwrap();
        config
            .apply_overrides(|key| match key {
                "CMDTREE_STRICT_HANDLERS" => Some("true".into()),
                "CMDTREE_MAX_DEPTH" => Some("12".into()),
                _ => None,
            })
            .unwrap();
        assert!(config.strict_handlers);
        assert_eq!(config.max_depth, 12);
    }

    #[test]
    fn non_numeric_depth_override_is_rejected() {
        let mut config = BuilderConfig::default();
        let err = config
            .apply_overrides(|key| (key == "CMDTREE_MAX_DEPTH").then(|| "deep".to_string()))
            .unwrap_err();
        assert!(matches!(err, DslError::Config { .. }));
    }
}
