//! Reading and writing configuration documents.

use std::path::Path;

use log::debug;

use crate::analytics::AnalyticsConfig;
use crate::error::{ConfigError, ConfigResult, Validate};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl ConfigFormat {
    /// Format named by a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl AnalyticsConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let source = std::fs::read_to_string(path)?;
        debug!("loading {format:?} configuration from {}", path.display());
        match format {
            ConfigFormat::Toml => Self::from_toml_str(&source),
            ConfigFormat::Json => Self::from_json_str(&source),
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Renders the configuration as JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the configuration to a `.toml` or `.json` file.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => self.to_toml_string()?,
            ConfigFormat::Json => self.to_json_string()?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fi_curves::GapPolicy;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("c.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("d.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AnalyticsConfig::default();
        config.curve.gap_policy = GapPolicy::Strict;
        config.pricing.max_iterations = 250;

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[curve]"));
        assert_eq!(AnalyticsConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_empty_documents_give_defaults() {
        assert_eq!(
            AnalyticsConfig::from_toml_str("").unwrap(),
            AnalyticsConfig::default()
        );
        assert_eq!(
            AnalyticsConfig::from_json_str("{}").unwrap(),
            AnalyticsConfig::default()
        );
    }

    #[test]
    fn test_parse_and_validation_errors() {
        assert!(matches!(
            AnalyticsConfig::from_toml_str("[pricing]\nmax_iterations = \"many\""),
            Err(ConfigError::Deserialization(_))
        ));
        assert!(matches!(
            AnalyticsConfig::from_json_str(r#"{"risk": {"bump_bp": 0.0}}"#),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            AnalyticsConfig::from_json_str("{"),
            Err(ConfigError::Deserialization(_))
        ));
    }
}
