//! Tokenized text - output of the text-extraction collaborator

use serde::{Deserialize, Serialize};

/// Tokens extracted from free text (captions and message bodies)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedText {
    pub keywords: Vec<String>,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub emojis: Vec<String>,
}

impl TokenizedText {
    /// True when nothing was extracted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.mentions.is_empty()
            && self.hashtags.is_empty()
            && self.emojis.is_empty()
    }
}
