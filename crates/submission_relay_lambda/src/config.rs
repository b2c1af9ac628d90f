use std::path::PathBuf;

use thiserror::Error;

use crate::adapters::mail::DEFAULT_MAILGUN_API_BASE;

pub const DEFAULT_CONSOLE_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Destination bucket and how its objects are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub bucket: String,
    pub object_prefix: String,
    pub console_region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub api_base: String,
    pub domain: String,
    pub api_key: String,
    pub source_email: String,
}

/// Immutable relay configuration, read once per cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Region override for the AWS clients; the SDK default chain applies when unset.
    pub region: Option<String>,
    pub storage: StorageSettings,
    pub record_table: String,
    pub mail: MailSettings,
    pub scratch_dir: PathBuf,
}

impl RelayConfig {
    /// Load configuration from the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &'static str| read(key).ok_or(ConfigError::Missing(key));

        let region = read("REGION");
        let domain = require("MAILGUN_DOMAIN")?;

        let api_base =
            read("MAILGUN_API_BASE").unwrap_or_else(|| DEFAULT_MAILGUN_API_BASE.to_string());
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "MAILGUN_API_BASE",
                reason: format!("'{api_base}' is not an http(s) url"),
            });
        }

        let source_email = read("SOURCE_EMAIL").unwrap_or_else(|| format!("mailgun@{domain}"));
        if !source_email.contains('@') {
            return Err(ConfigError::Invalid {
                key: "SOURCE_EMAIL",
                reason: format!("'{source_email}' is not an email address"),
            });
        }

        Ok(Self {
            storage: StorageSettings {
                bucket: require("SUBMISSION_BUCKET_NAME")?,
                object_prefix: read("SUBMISSION_OBJECT_PREFIX").unwrap_or_default(),
                console_region: region
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CONSOLE_REGION.to_string()),
            },
            region,
            record_table: require("DYNAMODB_TABLE_NAME")?,
            mail: MailSettings {
                api_base,
                api_key: require("MAILGUN_API_KEY")?,
                domain,
                source_email,
            },
            scratch_dir: read("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SUBMISSION_BUCKET_NAME", "relay-bucket"),
            ("DYNAMODB_TABLE_NAME", "notifications"),
            ("MAILGUN_API_KEY", "key-123"),
            ("MAILGUN_DOMAIN", "mg.example.edu"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<RelayConfig, ConfigError> {
        RelayConfig::from_lookup(|key| env.get(key).map(|value| value.to_string()))
    }

    #[test]
    fn applies_defaults_for_optional_settings() {
        let config = load(&base_env()).expect("config should load");

        assert_eq!(config.region, None);
        assert_eq!(config.storage.console_region, DEFAULT_CONSOLE_REGION);
        assert_eq!(config.storage.object_prefix, "");
        assert_eq!(config.mail.api_base, DEFAULT_MAILGUN_API_BASE);
        assert_eq!(config.mail.source_email, "mailgun@mg.example.edu");
        assert_eq!(config.scratch_dir, std::env::temp_dir());
    }

    #[test]
    fn region_feeds_console_urls() {
        let mut env = base_env();
        env.insert("REGION", "eu-west-1");

        let config = load(&env).expect("config should load");
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.storage.console_region, "eu-west-1");
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let mut env = base_env();
        env.insert("SUBMISSION_BUCKET_NAME", "   ");

        let error = load(&env).expect_err("config should fail");
        assert_eq!(error, ConfigError::Missing("SUBMISSION_BUCKET_NAME"));
        assert_eq!(error.to_string(), "SUBMISSION_BUCKET_NAME must be configured");
    }

    #[test]
    fn rejects_source_email_without_at_sign() {
        let mut env = base_env();
        env.insert("SOURCE_EMAIL", "noreply");

        let error = load(&env).expect_err("config should fail");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                key: "SOURCE_EMAIL",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_http_api_base() {
        let mut env = base_env();
        env.insert("MAILGUN_API_BASE", "api.mailgun.net/v3");

        let error = load(&env).expect_err("config should fail");
        assert!(error.to_string().starts_with("MAILGUN_API_BASE is invalid"));
    }
}
