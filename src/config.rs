use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generator::SubjectParams;
use crate::subject::{ExtractedMetadata, KEY_SIZE_HINT};

pub const DEFAULT_CONFIG_PATH: &str = "ssl-tool-config.toml";

/// Subject defaults read from `ssl-tool-config.toml`
///
/// Also written back by `extract-info`, so a CSR or certificate can seed the
/// defaults for the next `generate-csr`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_domain: Option<String>,
    #[serde(default)]
    pub default_country: String,
    #[serde(default)]
    pub default_locality: String,
    #[serde(default)]
    pub default_organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_organizational_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_email: Option<String>,
    #[serde(default = "default_key_size")]
    pub default_key_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_domain: None,
            default_country: String::new(),
            default_locality: String::new(),
            default_organization: String::new(),
            default_organizational_unit: None,
            default_email: None,
            default_key_size: default_key_size(),
        }
    }
}

fn default_key_size() -> u32 {
    KEY_SIZE_HINT
}

impl AppConfig {
    /// Starter config written by `generate-config`
    pub fn template() -> Self {
        Self {
            default_domain: None,
            default_country: "US".to_string(),
            default_locality: "New York".to_string(),
            default_organization: "DefaultOrg".to_string(),
            default_organizational_unit: Some("IT".to_string()),
            default_email: Some("admin@example.com".to_string()),
            default_key_size: default_key_size(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig =
            toml::from_str(&config_str).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to empty defaults
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_str = toml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, config_str)
            .context(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

impl From<ExtractedMetadata> for AppConfig {
    fn from(metadata: ExtractedMetadata) -> Self {
        Self {
            default_domain: Some(metadata.domain),
            default_country: metadata.country,
            default_locality: metadata.locality,
            default_organization: metadata.organization,
            default_organizational_unit: None,
            default_email: Some(metadata.email).filter(|e| !e.is_empty()),
            default_key_size: metadata.key_size_hint,
        }
    }
}

/// Subject fields as given on the command line, any of which may be unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectInput {
    pub domain: Option<String>,
    pub country: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
}

impl SubjectInput {
    /// Fill unset country/locality/organization from config defaults
    ///
    /// The domain never comes from config. Empty strings count as unset.
    pub fn with_defaults(self, config: &AppConfig) -> Self {
        fn pick(value: Option<String>, default: &str) -> Option<String> {
            value
                .filter(|v| !v.is_empty())
                .or_else(|| Some(default.to_string()).filter(|d| !d.is_empty()))
        }
        Self {
            domain: self.domain.filter(|d| !d.is_empty()),
            country: pick(self.country, &config.default_country),
            locality: pick(self.locality, &config.default_locality),
            organization: pick(self.organization, &config.default_organization),
        }
    }

    /// Turn into [`SubjectParams`], failing on the first missing field
    pub fn require_all(self) -> Result<SubjectParams> {
        fn required(value: Option<String>, name: &str) -> Result<String> {
            value.with_context(|| {
                format!(
                    "missing required parameter: {}. Provide flags or use --interactive",
                    name
                )
            })
        }
        Ok(SubjectParams::new(
            required(self.domain, "domain")?,
            required(self.country, "country")?,
            required(self.locality, "locality")?,
            required(self.organization, "organization")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        AppConfig::template().save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("default_country = \"US\""));
        assert!(!written.contains("default_domain"));

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded, AppConfig::template());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("default_country = \"BR\"\n").unwrap();
        assert_eq!(config.default_country, "BR");
        assert_eq!(config.default_locality, "");
        assert_eq!(config.default_key_size, 2048);
    }

    #[test]
    fn test_load_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(AppConfig::load_if_exists(&missing).unwrap(), AppConfig::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "default_country = [").unwrap();
        assert!(AppConfig::load_if_exists(&broken).is_err());
    }

    #[test]
    fn test_from_extracted_metadata() {
        let config = AppConfig::from(ExtractedMetadata {
            domain: "example.com".to_string(),
            country: "US".to_string(),
            locality: "New York".to_string(),
            organization: "TestOrg".to_string(),
            email: String::new(),
            key_size_hint: 2048,
        });
        assert_eq!(config.default_domain.as_deref(), Some("example.com"));
        assert_eq!(config.default_email, None);
        assert_eq!(config.default_organization, "TestOrg");
    }

    #[test]
    fn test_defaults_fill_only_unset_fields() {
        let input = SubjectInput {
            domain: Some("a.com".to_string()),
            country: Some("DE".to_string()),
            locality: None,
            organization: Some(String::new()),
        };
        let resolved = input.with_defaults(&AppConfig::template());
        assert_eq!(resolved.country.as_deref(), Some("DE"));
        assert_eq!(resolved.locality.as_deref(), Some("New York"));
        assert_eq!(resolved.organization.as_deref(), Some("DefaultOrg"));

        let params = resolved.require_all().unwrap();
        assert_eq!(params, SubjectParams::new("a.com", "DE", "New York", "DefaultOrg"));
    }

    #[test]
    fn test_missing_field_reported() {
        let input = SubjectInput {
            domain: None,
            ..SubjectInput::default()
        }
        .with_defaults(&AppConfig::template());
        let err = input.require_all().unwrap_err();
        assert!(err.to_string().contains("missing required parameter: domain"));

        let input = SubjectInput {
            domain: Some("a.com".to_string()),
            ..SubjectInput::default()
        }
        .with_defaults(&AppConfig::default());
        let err = input.require_all().unwrap_err();
        assert!(err.to_string().contains("missing required parameter: country"));
    }
}
