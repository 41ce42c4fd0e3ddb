//! Motivational quote shown on the dashboard.

use serde::{Deserialize, Serialize};

const FALLBACK_CONTENT: &str = "You are capable of more than you imagine!";
const FALLBACK_AUTHOR: &str = "Local Inspiration";
const FALLBACK_TAG: &str = "motivational";
const FALLBACK_MESSAGE: &str = "Offline quote";

/// A quote fetched from the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotivationalQuote {
    /// Quote text.
    pub content: String,
    /// Attributed author.
    pub author: String,
    /// Category tag.
    #[serde(default)]
    pub tag: String,
    /// Whether the server produced this quote from its upstream source.
    #[serde(default)]
    pub success: bool,
    /// Upstream source name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Extra note from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MotivationalQuote {
    /// Fixed local quote used when the remote fetch fails.
    ///
    /// Always has `success == false` and an explanatory message.
    #[must_use]
    pub fn offline_fallback() -> Self {
        Self {
            content: FALLBACK_CONTENT.to_string(),
            author: FALLBACK_AUTHOR.to_string(),
            tag: FALLBACK_TAG.to_string(),
            success: false,
            source: None,
            message: Some(FALLBACK_MESSAGE.to_string()),
        }
    }

    /// Whether this is the local fallback rather than a server quote.
    pub fn is_offline_fallback(&self) -> bool {
        *self == Self::offline_fallback()
    }
}
