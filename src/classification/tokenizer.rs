//! Text analyzer feeding the vectorizer: normalization, token pattern, stop words and n-grams.
use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

pub(crate) const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Accent folding applied before tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripAccents {
    /// NFKD then drop combining marks.
    Unicode,
    /// NFKD then keep ASCII only.
    Ascii,
}

#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    lowercase: bool,
    strip_accents: Option<StripAccents>,
    token_re: Regex,
    stop_words: HashSet<String>,
    ngram_range: (usize, usize),
}

impl TextAnalyzer {
    /// # Errors
    /// Returns an error when the token pattern does not compile or the n-gram range is empty.
    pub fn new(
        lowercase: bool,
        strip_accents: Option<StripAccents>,
        token_pattern: &str,
        stop_words: &[String],
        ngram_range: (usize, usize),
    ) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        anyhow::ensure!(
            min_n >= 1 && min_n <= max_n,
            "invalid ngram_range ({min_n}, {max_n})"
        );
        let token_re = Regex::new(token_pattern)
            .with_context(|| format!("token_pattern {token_pattern:?} does not compile"))?;
        Ok(Self {
            lowercase,
            strip_accents,
            token_re,
            stop_words: stop_words.iter().cloned().collect(),
            ngram_range,
        })
    }

    /// Splits `text` into the terms the vocabulary is keyed by.
    #[must_use]
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let text = match self.strip_accents {
            Some(StripAccents::Unicode) => text.nfkd().filter(|c| !is_combining_mark(*c)).collect(),
            Some(StripAccents::Ascii) => text.nfkd().filter(char::is_ascii).collect(),
            None => text,
        };

        let tokens: Vec<&str> = self
            .token_re
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        self.word_ngrams(&tokens)
    }

    fn word_ngrams(&self, tokens: &[&str]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens.iter().map(ToString::to_string).collect();
        }

        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer(stop_words: &[&str], ngram_range: (usize, usize)) -> TextAnalyzer {
        let stop_words: Vec<String> = stop_words.iter().map(ToString::to_string).collect();
        TextAnalyzer::new(true, None, DEFAULT_TOKEN_PATTERN, &stop_words, ngram_range)
            .expect("analyzer")
    }

    #[test]
    fn default_pattern_drops_single_characters_and_punctuation() {
        let terms = analyzer(&[], (1, 1)).analyze("A laptop, 5 stars & I love it!");
        assert_eq!(terms, vec!["laptop", "stars", "love", "it"]);
    }

    #[test]
    fn stop_words_are_removed_after_lowercasing() {
        let terms = analyzer(&["this", "has"], (1, 1)).analyze("This laptop HAS battery");
        assert_eq!(terms, vec!["laptop", "battery"]);
    }

    #[test]
    fn bigrams_are_joined_with_single_space() {
        let terms = analyzer(&["the"], (1, 2)).analyze("the battery life rocks");
        assert_eq!(
            terms,
            vec![
                "battery",
                "life",
                "rocks",
                "battery life",
                "life rocks"
            ]
        );
    }

    #[test]
    fn unicode_accents_are_folded() {
        let stop_words: Vec<String> = Vec::new();
        let analyzer = TextAnalyzer::new(
            true,
            Some(StripAccents::Unicode),
            DEFAULT_TOKEN_PATTERN,
            &stop_words,
            (1, 1),
        )
        .expect("analyzer");
        assert_eq!(analyzer.analyze("Crème brûlée"), vec!["creme", "brulee"]);
    }

    #[test]
    fn empty_text_has_no_terms() {
        assert!(analyzer(&[], (1, 2)).analyze("").is_empty());
    }

    #[test]
    fn invalid_ngram_range_is_rejected() {
        let stop_words: Vec<String> = Vec::new();
        assert!(TextAnalyzer::new(true, None, DEFAULT_TOKEN_PATTERN, &stop_words, (2, 1)).is_err());
        assert!(TextAnalyzer::new(true, None, DEFAULT_TOKEN_PATTERN, &stop_words, (0, 1)).is_err());
    }

    #[test]
    fn broken_token_pattern_is_rejected() {
        let stop_words: Vec<String> = Vec::new();
        assert!(TextAnalyzer::new(true, None, "(unclosed", &stop_words, (1, 1)).is_err());
    }
}
