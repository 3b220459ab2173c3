//! Chat Data Models
//!
//! Keyword rules for the assistant and the messages stored in a conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A keyword rule: any keyword contained in the user's text selects `response`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChatRuleDef")]
pub struct ChatRule {
    /// Lower-cased, de-duplicated, in declaration order
    keywords: Vec<String>,
    response: String,
}

/// Wire shape of a rule before keyword normalization
#[derive(Deserialize)]
struct ChatRuleDef {
    keywords: Vec<String>,
    response: String,
}

impl From<ChatRuleDef> for ChatRule {
    fn from(def: ChatRuleDef) -> Self {
        ChatRule::new(def.keywords, def.response)
    }
}

impl ChatRule {
    pub fn new<I, S>(keywords: I, response: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self {
            keywords: normalized,
            response: response.into(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// `text` must already be lower-cased
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}

/// A single message in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub is_from_assistant: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message typed by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(content.into(), false)
    }

    /// Create a message produced by the assistant
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::build(content.into(), true)
    }

    fn build(content: String, is_from_assistant: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            is_from_assistant,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_normalizes_keywords() {
        let rule = ChatRule::new(["Safe", " SAFETY ", "safe", ""], "ok");
        assert_eq!(rule.keywords(), ["safe".to_string(), "safety".to_string()]);
    }

    #[test]
    fn test_blank_keywords_never_match() {
        let rule = ChatRule::new([" ", "", "\t"], "never");
        assert!(rule.keywords().is_empty());
        assert!(!rule.matches("   "));
        assert!(!rule.matches("anything at all"));
    }

    #[test]
    fn test_rule_matches_any_keyword() {
        let rule = ChatRule::new(["heavy metal", "pollution"], "metals");
        assert!(rule.matches("tell me about pollution levels"));
        assert!(rule.matches("which heavy metals do you track?"));
        assert!(!rule.matches("is it raining"));
    }

    #[test]
    fn test_rule_deserialize_normalizes() {
        let json = r#"{"keywords": ["Upload", "CONTRIBUTE"], "response": "thanks"}"#;
        let rule: ChatRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.keywords(), ["upload".to_string(), "contribute".to_string()]);
        assert_eq!(rule.response(), "thanks");

        let json = r#"{"keywords": [" ", "Lead "], "response": "lead"}"#;
        let rule: ChatRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.keywords(), ["lead".to_string()]);
    }

    #[test]
    fn test_message_constructors() {
        let user = ChatMessage::user("hello");
        let bot = ChatMessage::assistant("hi");
        assert!(!user.is_from_assistant);
        assert!(bot.is_from_assistant);
        assert_ne!(user.id, bot.id);
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["isFromAssistant"], true);
        assert_eq!(json["content"], "hi");
        assert!(json["timestamp"].is_string());
    }
}
