// Colored terminal output for topic runs.
//
// The summary chart itself lives on TopicSummary::display; this module
// covers the per-topic sample posts and the `inspect` command output.

use colored::Colorize;

use crate::records::{record_text, Record, TOPIC_FIELD};
use crate::topics::features::FeatureSet;

/// Show up to `per_topic` example posts for each topic, in input order.
pub fn display_topic_samples(
    records: &[Record],
    text_field: &str,
    num_topics: usize,
    per_topic: usize,
) {
    if records.is_empty() || per_topic == 0 {
        return;
    }

    println!("{}", "=== Sample Posts ===".bold());

    for topic in 1..=num_topics as u64 {
        let samples: Vec<&str> = records
            .iter()
            .filter(|r| r.get(TOPIC_FIELD).and_then(|v| v.as_u64()) == Some(topic))
            .filter_map(|r| record_text(r, text_field))
            .take(per_topic)
            .collect();

        println!("\n  {}", format!("Topic {topic}").bold());
        if samples.is_empty() {
            println!("    {}", "(no posts)".dimmed());
            continue;
        }
        for text in samples {
            let preview = super::truncate_chars(text, 120);
            println!("    - {}", preview.dimmed());
        }
    }
    println!();
}

/// Show how a single text is tokenized and which features it produces.
pub fn display_features(text: &str, tokens: &[String], features: &FeatureSet) {
    println!("{} {}", "Text:".bold(), super::truncate_chars(text, 200));
    println!("{} [{}]", "Tokens:".bold(), tokens.join(", "));

    let (bigrams, unigrams): (Vec<&String>, Vec<&String>) =
        features.terms().iter().partition(|t| t.contains(' '));

    if features.is_empty() {
        println!("{} {}", "Features:".bold(), "(none)".yellow());
        return;
    }

    println!("{} {}", "Unigrams:".bold(), join(&unigrams).green());
    println!("{} {}", "Bigrams:".bold(), join(&bigrams).cyan());
    println!("{} {}", "Total features:".bold(), features.len());
}

fn join(terms: &[&String]) -> String {
    terms
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
