use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::topics::features::StopWords;

/// Stopwords used when none are configured: the generic finance terms that
/// appear in nearly every post of a stock-chatter corpus.
pub const DEFAULT_STOPWORDS: &[&str] = &["stock", "today", "price", "market", "share"];

/// Column holding the post text when none is configured.
pub const DEFAULT_TEXT_FIELD: &str = "Tweet";

/// Topic clustering configuration.
///
/// Loaded once from environment variables (the .env file is loaded at
/// startup via dotenvy), optionally overridden by CLI flags, then passed by
/// reference into every pipeline stage. Nothing reads ambient state after
/// this point.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicConfig {
    /// Number of topics (K) to cluster into
    pub num_topics: usize,
    /// Records whose text is shorter than this (in characters) are dropped
    pub min_text_length: usize,
    /// Exact number of k-means passes; there is no early exit
    pub max_iterations: usize,
    /// Tokens excluded before unigrams and bigrams are formed
    pub stopwords: Vec<String>,
    /// Merge the stock English stopword list into `stopwords`
    pub english_stopwords: bool,
    /// Name of the record field holding the text
    pub text_field: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            num_topics: 3,
            min_text_length: 10,
            max_iterations: 20,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            english_stopwords: false,
            text_field: DEFAULT_TEXT_FIELD.to_string(),
        }
    }
}

impl TopicConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    ///
    /// Set-but-malformed numbers are errors rather than silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let stopwords = match env::var("LIGHTOPIC_STOPWORDS") {
            Ok(list) => parse_word_list(&list),
            Err(_) => defaults.stopwords,
        };

        let english_stopwords = matches!(
            env::var("LIGHTOPIC_ENGLISH_STOPWORDS").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        Ok(Self {
            num_topics: env_number("LIGHTOPIC_NUM_TOPICS", defaults.num_topics)?,
            min_text_length: env_number("LIGHTOPIC_MIN_LENGTH", defaults.min_text_length)?,
            max_iterations: env_number("LIGHTOPIC_MAX_ITERATIONS", defaults.max_iterations)?,
            stopwords,
            english_stopwords,
            text_field: env::var("LIGHTOPIC_TEXT_FIELD").unwrap_or(defaults.text_field),
        })
    }

    /// Check the settings that are invalid regardless of the corpus.
    ///
    /// The topic count is also checked against the filtered document count
    /// once that is known, before clustering starts.
    pub fn require_valid(&self) -> Result<()> {
        if self.num_topics == 0 {
            anyhow::bail!("Number of topics must be at least 1 (got 0)");
        }
        if self.max_iterations == 0 {
            anyhow::bail!("max_iterations must be at least 1 (got 0)");
        }
        if self.text_field.is_empty() {
            anyhow::bail!("Text field name must not be empty");
        }
        Ok(())
    }

    /// Build the stopword set used by feature extraction.
    pub fn stopword_set(&self) -> StopWords {
        let set = StopWords::new(&self.stopwords);
        if self.english_stopwords {
            set.with_english()
        } else {
            set
        }
    }
}

/// Split a comma-separated word list, dropping blanks.
pub fn parse_word_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn env_number<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a whole number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TopicConfig::default();
        assert_eq!(config.num_topics, 3);
        assert_eq!(config.min_text_length, 10);
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.text_field, "Tweet");
        assert!(config.require_valid().is_ok());
    }

    #[test]
    fn test_require_valid_rejects_zero_topics() {
        let config = TopicConfig {
            num_topics: 0,
            ..TopicConfig::default()
        };
        assert!(config.require_valid().is_err());
    }

    #[test]
    fn test_require_valid_rejects_zero_iterations() {
        let config = TopicConfig {
            max_iterations: 0,
            ..TopicConfig::default()
        };
        assert!(config.require_valid().is_err());
    }

    #[test]
    fn test_parse_word_list() {
        assert_eq!(parse_word_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_word_list("").is_empty());
    }

    #[test]
    fn test_stopword_set_respects_english_flag() {
        let plain = TopicConfig::default().stopword_set();
        assert!(plain.contains("stock"));
        assert!(!plain.contains("the"));

        let english = TopicConfig {
            english_stopwords: true,
            ..TopicConfig::default()
        }
        .stopword_set();
        assert!(english.contains("the"));
    }
}
