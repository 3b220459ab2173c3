//! Module configuration: threshold table, chat rules and session timing.
//!
//! Loaded from a JSON file (camelCase keys); anything missing falls back to
//! the built-in fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::{
    KeywordResponder, SendPolicy, SessionOptions, DEFAULT_FALLBACK, DEFAULT_GREETING,
    DEFAULT_RESPONSE_DELAY_MS, DEFAULT_RULES,
};
use crate::models::chat::ChatRule;
use crate::models::error::{HmpiError, Result};
use crate::safety::ThresholdTable;

/// Confidence reported with every safety check unless configured otherwise
pub const DEFAULT_CONFIDENCE: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HmpiConfig {
    /// Regulatory limit per metal, in mg/L
    pub thresholds: ThresholdTable,
    /// Keyword rules in priority order
    pub rules: Vec<ChatRule>,
    pub fallback_response: String,
    /// First assistant message of every chat; empty disables it
    pub greeting: String,
    pub response_delay_ms: u64,
    /// Confidence (0-100) passed through to safety reports
    pub confidence: f64,
    pub send_policy: SendPolicy,
}

impl Default for HmpiConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            rules: DEFAULT_RULES.clone(),
            fallback_response: DEFAULT_FALLBACK.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            response_delay_ms: DEFAULT_RESPONSE_DELAY_MS,
            confidence: DEFAULT_CONFIDENCE,
            send_policy: SendPolicy::default(),
        }
    }
}

impl HmpiConfig {
    /// `<config dir>/hmpi/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("hmpi").join("config.json"))
    }

    /// Load from `path` (or the default location). A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            tracing::debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| HmpiError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let config: HmpiConfig = serde_json::from_str(&content)
            .map_err(|e| HmpiError::Config(format!("Failed to parse {:?}: {}", path, e)))?;
        config.validate()?;

        tracing::info!(
            "Loaded config from {:?} ({} metals, {} chat rules)",
            path,
            config.thresholds.len(),
            config.rules.len()
        );
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| HmpiError::Config(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| HmpiError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| HmpiError::Config(format!("Failed to write {:?}: {}", path, e)))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(HmpiError::Config(format!(
                "confidence must be within 0-100, got {}",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    pub fn responder(&self) -> KeywordResponder {
        KeywordResponder::new(self.rules.clone(), self.fallback_response.clone())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            greeting: Some(self.greeting.clone()).filter(|g| !g.trim().is_empty()),
            response_delay: self.response_delay(),
            send_policy: self.send_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HmpiConfig::default();
        assert_eq!(config.rules.len(), 4);
        assert_eq!(config.thresholds.limit("Lead"), Some(1.0));
        assert_eq!(config.response_delay(), Duration::from_millis(1000));
        assert_eq!(config.send_policy, SendPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HmpiConfig::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config, HmpiConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = HmpiConfig::default();
        config.confidence = 70.0;
        config.send_policy = SendPolicy::Supersede;
        config.rules.push(ChatRule::new(["filter"], "Use a certified filter."));
        config.save(&path).unwrap();

        let loaded = HmpiConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"thresholds": {"Chromium": 0.05}, "responseDelayMs": 10, "sendPolicy": "supersede"}"#,
        )
        .unwrap();

        let config = HmpiConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.thresholds.metals(), vec!["Chromium"]);
        assert_eq!(config.response_delay(), Duration::from_millis(10));
        assert_eq!(config.send_policy, SendPolicy::Supersede);
        assert_eq!(config.fallback_response, DEFAULT_FALLBACK);
        assert_eq!(config.rules, *DEFAULT_RULES);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(HmpiConfig::load(Some(path.as_path())), Err(HmpiError::Config(_))));

        fs::write(&path, r#"{"thresholds": {"Lead": 0}}"#).unwrap();
        assert!(matches!(HmpiConfig::load(Some(path.as_path())), Err(HmpiError::Config(_))));
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"confidence": 120}"#).unwrap();
        assert!(matches!(HmpiConfig::load(Some(path.as_path())), Err(HmpiError::Config(_))));
    }

    #[test]
    fn test_blank_greeting_disables_it() {
        let config = HmpiConfig {
            greeting: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.session_options().greeting.is_none());
        assert!(HmpiConfig::default().session_options().greeting.is_some());
    }

    #[test]
    fn test_responder_uses_configured_rules() {
        let config = HmpiConfig {
            rules: vec![ChatRule::new(["lead"], "Lead limit is 1.0 mg/L")],
            fallback_response: "Ask about lead.".to_string(),
            ..Default::default()
        };
        let responder = config.responder();
        assert_eq!(responder.respond("LEAD?"), "Lead limit is 1.0 mg/L");
        assert_eq!(responder.respond("mercury"), "Ask about lead.");
    }
}
