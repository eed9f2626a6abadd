//! Text extraction - keywords, mentions, hashtags, and emojis
//!
//! Tokenization happens once at composition time; the result is stored
//! with the message so search and mention delivery never re-parse text.

use regex::Regex;
use std::sync::LazyLock;

use lumen_core::traits::TextTokenizer;
use lumen_core::value_objects::TokenizedText;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_.]{2,32})").unwrap());
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w{1,64})").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]{3,}").unwrap());

/// Unicode scalar ranges treated as emoji
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F300, 0x1F5FF), // symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport
    (0x1F900, 0x1F9FF), // supplemental
    (0x1FA70, 0x1FAFF), // extended-A
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
];

fn is_emoji_scalar(c: char) -> bool {
    let code = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&code))
}

/// Regex-backed implementation of [`TextTokenizer`]
#[derive(Debug, Clone, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl TextTokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> TokenizedText {
        let mentions: Vec<String> = MENTION_RE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect();
        let hashtags: Vec<String> = HASHTAG_RE
            .captures_iter(text)
            .map(|c| c[1].to_lowercase())
            .collect();

        // Keywords exclude mention and hashtag bodies
        let mut keywords: Vec<String> = Vec::new();
        for word in WORD_RE.find_iter(text) {
            let prefixed = matches!(
                text[..word.start()].chars().next_back(),
                Some('@' | '#')
            );
            if prefixed {
                continue;
            }
            let lower = word.as_str().to_lowercase();
            if !keywords.contains(&lower) {
                keywords.push(lower);
            }
        }

        let mut emojis: Vec<String> = Vec::new();
        for c in text.chars().filter(|c| is_emoji_scalar(*c)) {
            let s = c.to_string();
            if !emojis.contains(&s) {
                emojis.push(s);
            }
        }

        TokenizedText {
            keywords,
            mentions,
            hashtags,
            emojis,
        }
    }
}
