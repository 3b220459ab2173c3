use std::sync::Arc;

use tokio::sync::mpsc;

use crate::chat::{ChatEvent, ChatSession, KeywordResponder, SessionOptions};
use crate::config::HmpiConfig;
use crate::models::error::Result;
use crate::models::reading::SafetyCategory;
use crate::models::report::WaterSafetyReport;
use crate::safety::{self, ThresholdTable};

/// Classification and chat services built from one configuration
pub struct HmpiModule {
    thresholds: ThresholdTable,
    responder: Arc<KeywordResponder>,
    session_options: SessionOptions,
    confidence: f64,
}

impl HmpiModule {
    pub fn new(config: HmpiConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            "Initialized HMPI module with {} metals and {} chat rules",
            config.thresholds.len(),
            config.rules.len()
        );

        Ok(Self {
            responder: Arc::new(config.responder()),
            session_options: config.session_options(),
            confidence: config.confidence,
            thresholds: config.thresholds,
        })
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Classify one measured value against the configured limit for `metal`
    pub fn classify(&self, metal: &str, value: f64) -> Result<SafetyCategory> {
        safety::classify(&self.thresholds.reading(metal, value)?)
    }

    /// Run a safety check for a location from `(metal, value)` measurements
    pub fn check_water_safety(
        &self,
        location: &str,
        measurements: &[(&str, f64)],
    ) -> Result<WaterSafetyReport> {
        let readings = self.thresholds.readings(measurements.iter().copied())?;
        let report = safety::check_water_safety(location, &readings, self.confidence)?;
        tracing::info!("Safety check: {}", report.summary());
        Ok(report)
    }

    /// Immediate keyword reply, without a conversation log
    pub fn respond(&self, user_text: &str) -> &str {
        self.responder.respond(user_text)
    }

    /// Open a chat session backed by the configured rules
    pub fn start_chat(&self) -> (ChatSession, mpsc::Receiver<ChatEvent>) {
        ChatSession::new(self.responder.clone(), self.session_options.clone())
    }
}
