use std::time::Duration;

use anyhow::{Context, Result};

use crate::advisor_client::{AdvisorConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if `GOOGLE_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_endpoint: String,
    pub advisor_timeout: Option<Duration>,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let advisor_timeout = match lookup("ADVISOR_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .context("ADVISOR_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            None => None,
        };

        let max_upload_mb = lookup("MAX_UPLOAD_MB")
            .unwrap_or_else(|| "200".to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number")?;

        Ok(Config {
            google_api_key: require("GOOGLE_API_KEY")?,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_endpoint: lookup("GEMINI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            advisor_timeout,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: max_upload_mb
                .checked_mul(1024 * 1024)
                .context("MAX_UPLOAD_MB is too large")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn advisor_config(&self) -> AdvisorConfig {
        AdvisorConfig {
            api_key: self.google_api_key.clone(),
            model: self.gemini_model.clone(),
            endpoint: self.gemini_endpoint.clone(),
            timeout: self.advisor_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k-123")])).unwrap();
        assert_eq!(config.google_api_key, "k-123");
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.gemini_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.advisor_timeout, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides_flow_into_advisor_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("GEMINI_ENDPOINT", "http://localhost:9999"),
            ("ADVISOR_TIMEOUT_SECS", "30"),
            ("PORT", "3000"),
        ]))
        .unwrap();

        let advisor = config.advisor_config();
        assert_eq!(advisor.api_key, "secret");
        assert_eq!(advisor.model, "gemini-1.5-flash");
        assert_eq!(advisor.endpoint, "http://localhost:9999");
        assert_eq!(advisor.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_oversized_upload_limit_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("MAX_UPLOAD_MB", "18446744073709551615"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_MB is too large"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
