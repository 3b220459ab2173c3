//! Keyword Responder
//!
//! Maps free-text questions to canned answers with an ordered rule list.
//! The first rule with any matching keyword wins; declaration order is the
//! only priority, there is no "most specific match".

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::models::chat::ChatRule;

/// Opening message of every conversation
pub const DEFAULT_GREETING: &str = "Hi! I'm your AI assistant for water quality information. Ask me about heavy metal pollution, safety levels, or anything related to water monitoring!";

/// Reply used when no rule matches
pub const DEFAULT_FALLBACK: &str = "I'm here to help with water quality questions! You can ask me about safety levels, heavy metal contamination, data uploads, reports, or how our AI monitoring system works. What would you like to know?";

/// Built-in rules, in priority order
pub static DEFAULT_RULES: Lazy<Vec<ChatRule>> = Lazy::new(|| {
    vec![
        ChatRule::new(
            ["safe", "safety"],
            "Based on our latest data, I can help you check water safety in your area. Could you provide your location or postal code? Our AI monitoring shows real-time heavy metal pollution indices with 98.7% accuracy.",
        ),
        ChatRule::new(
            ["heavy metal", "pollution"],
            "Heavy metals like lead, mercury, cadmium, and arsenic are our primary monitoring targets. Our AI system detects concentrations as low as 0.001 mg/L and predicts contamination trends up to 30 days in advance.",
        ),
        ChatRule::new(
            ["report", "data"],
            "You can access detailed reports through our dashboard. We provide real-time data, trend analysis, risk assessments, and downloadable PDF reports for policymakers and researchers.",
        ),
        ChatRule::new(
            ["upload", "contribute"],
            "Great! Citizens and NGOs can contribute by uploading water test results. This helps improve our AI model accuracy. You can upload data through our 'Contribute Data' section with just a few clicks.",
        ),
    ]
});

/// Pick the response of the first rule whose keywords appear in `user_text`
pub fn respond<'a>(user_text: &str, rules: &'a [ChatRule], fallback: &'a str) -> &'a str {
    let text = user_text.trim().to_lowercase();
    if text.is_empty() {
        return fallback;
    }

    match rules.iter().position(|rule| rule.matches(&text)) {
        Some(index) => {
            tracing::debug!("Chat input matched rule #{}", index);
            rules[index].response()
        }
        None => {
            tracing::debug!("Chat input matched no rule, using fallback");
            fallback
        }
    }
}

/// Source of assistant replies for a chat session
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce the reply to a user message
    async fn reply(&self, user_text: &str) -> String;
}

/// Rule-based responder over an ordered rule list
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    rules: Vec<ChatRule>,
    fallback: String,
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.clone(), DEFAULT_FALLBACK)
    }
}

impl KeywordResponder {
    pub fn new(rules: Vec<ChatRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    pub fn rules(&self) -> &[ChatRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn respond(&self, user_text: &str) -> &str {
        respond(user_text, &self.rules, &self.fallback)
    }
}

#[async_trait]
impl Responder for KeywordResponder {
    async fn reply(&self, user_text: &str) -> String {
        self.respond(user_text).to_string()
    }
}
