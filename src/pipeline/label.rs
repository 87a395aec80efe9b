// Topic labeling pipeline.
//
// Runs the whole corpus through each stage in turn:
//   filter short posts -> tokenize -> features -> vocabulary -> vectors
//   -> cluster -> attach 1-based `Topic` to each surviving record
//
// Everything is in memory and single-threaded. A run either produces a
// fully labeled corpus or fails before any output exists; the topic count
// is checked against the surviving document count before clustering.

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::TopicConfig;
use crate::records::{record_text, Record, TOPIC_FIELD};
use crate::topics::features::{extract_features, FeatureSet};
use crate::topics::kmeans::KMeans;
use crate::topics::summary::{TopicSummary, DEFAULT_TOP_TERMS};
use crate::topics::tokenize::tokenize;
use crate::topics::traits::TopicClusterer;
use crate::topics::vocabulary::Vocabulary;

/// The result of labeling a corpus.
#[derive(Debug, Clone)]
pub struct TopicRun {
    /// Surviving records, in input order, each with a `Topic` field
    pub records: Vec<Record>,
    /// Per-topic breakdown of the run
    pub summary: TopicSummary,
}

/// Whether a record's text is long enough to cluster.
///
/// Absent and empty text never qualify, whatever the minimum. Length is
/// counted in UTF-16 code units, the way tweet lengths are usually measured:
/// an emoji outside the Basic Multilingual Plane counts as 2.
pub fn is_long_enough(text: Option<&str>, min_length: usize) -> bool {
    match text {
        Some(t) if !t.is_empty() => t.encode_utf16().count() >= min_length,
        _ => false,
    }
}

/// Split records into those that will be clustered (in order) and a count
/// of the ones dropped for short or missing text.
pub fn filter_records(records: Vec<Record>, config: &TopicConfig) -> (Vec<Record>, usize) {
    let total = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| is_long_enough(record_text(r, &config.text_field), config.min_text_length))
        .collect();
    let discarded = total - kept.len();
    (kept, discarded)
}

/// Tokenize and extract the feature set of each record's text.
pub fn record_features(records: &[Record], config: &TopicConfig) -> Vec<FeatureSet> {
    let stopwords = config.stopword_set();
    records
        .iter()
        .map(|r| {
            let tokens = tokenize(record_text(r, &config.text_field));
            extract_features(&tokens, &stopwords)
        })
        .collect()
}

/// Label records with the fixed-pass k-means configured in `config`.
pub fn run(records: Vec<Record>, config: &TopicConfig) -> Result<TopicRun> {
    let clusterer = KMeans::new(config.num_topics, config.max_iterations);
    label_records(records, config, &clusterer)
}

/// Label records using the given clusterer.
pub fn label_records(
    records: Vec<Record>,
    config: &TopicConfig,
    clusterer: &dyn TopicClusterer,
) -> Result<TopicRun> {
    config.require_valid()?;

    let (mut kept, discarded) = filter_records(records, config);
    info!(
        kept = kept.len(),
        discarded,
        min_length = config.min_text_length,
        "Filtered records"
    );

    let k = clusterer.num_topics();
    if k == 0 || k > kept.len() {
        anyhow::bail!(
            "Requested {} topics but only {} records have text of at least {} characters",
            k,
            kept.len(),
            config.min_text_length
        );
    }

    let features = record_features(&kept, config);
    let vocab = Vocabulary::build(&features);
    let vectors = vocab.encode_all(&features);
    info!(
        documents = vectors.len(),
        vocabulary = vocab.len(),
        "Encoded feature vectors"
    );

    let empty_docs = features.iter().filter(|f| f.is_empty()).count();
    if empty_docs > 0 {
        debug!(empty_docs, "Documents with no features after stopword removal");
    }

    let assignments = clusterer.cluster(&vectors)?;
    if assignments.len() != kept.len() {
        anyhow::bail!(
            "Clusterer returned {} assignments for {} documents",
            assignments.len(),
            kept.len()
        );
    }

    for (record, &topic) in kept.iter_mut().zip(assignments.iter()) {
        record.insert(TOPIC_FIELD.to_string(), Value::from(topic as u64 + 1));
    }

    let summary = TopicSummary::build(
        &vocab,
        &vectors,
        &assignments,
        k,
        discarded,
        DEFAULT_TOP_TERMS,
    );
    info!(topics = k, "Clustering complete");

    Ok(TopicRun {
        records: kept,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(text: &str) -> Record {
        json!({ "Tweet": text }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_is_long_enough() {
        assert!(!is_long_enough(None, 0));
        assert!(!is_long_enough(Some(""), 0));
        assert!(is_long_enough(Some("abc"), 3));
        assert!(!is_long_enough(Some("abc"), 4));
        // UTF-16 units, not bytes: each é is one unit
        assert!(is_long_enough(Some("éééé"), 4));
        assert!(!is_long_enough(Some("éééé"), 5));
    }

    #[test]
    fn test_astral_characters_count_twice() {
        // Five rockets are 10 UTF-16 units, plus " moon"
        let text = "🚀🚀🚀🚀🚀 moon";
        assert!(is_long_enough(Some(text), 15));
        assert!(!is_long_enough(Some(text), 16));
        assert!(is_long_enough(Some("🚀"), 2));
    }

    #[test]
    fn test_emoji_heavy_post_survives_threshold() {
        let config = TopicConfig {
            num_topics: 1,
            min_text_length: 12,
            ..TopicConfig::default()
        };
        let result = run(vec![rec("🚀🚀🚀🚀🚀 moon")], &config).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0][TOPIC_FIELD], json!(1));
        assert_eq!(result.summary.discarded_count, 0);
    }

    #[test]
    fn test_filter_drops_short_and_missing() {
        let records = vec![
            rec("long enough text"),
            rec("short"),
            json!({ "Tweet": null }).as_object().cloned().unwrap(),
            json!({ "id": 7 }).as_object().cloned().unwrap(),
            rec("another long enough text"),
        ];
        let (kept, discarded) = filter_records(records, &TopicConfig::default());
        assert_eq!(discarded, 3);
        assert_eq!(kept.len(), 2);
        assert_eq!(record_text(&kept[1], "Tweet"), Some("another long enough text"));
    }

    #[test]
    fn test_topic_count_checked_after_filtering() {
        let config = TopicConfig {
            num_topics: 2,
            ..TopicConfig::default()
        };
        let records = vec![rec("a perfectly fine post"), rec("tiny")];
        let err = run(records, &config).unwrap_err();
        assert!(err.to_string().contains("Requested 2 topics"), "got: {err}");
    }

    #[test]
    fn test_topic_field_is_one_based() {
        let config = TopicConfig {
            num_topics: 1,
            ..TopicConfig::default()
        };
        let result = run(vec![rec("first post here"), rec("second post here")], &config).unwrap();
        for record in &result.records {
            assert_eq!(record[TOPIC_FIELD], json!(1));
        }
    }
}
