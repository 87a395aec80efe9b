// TopicSummary: what each discovered topic is made of.
//
// K-means only hands back numbers. To make the topics readable, each topic
// gets its size, its share of the corpus, and the terms that occur in the
// most of its member documents.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::vocabulary::{DocumentVector, Vocabulary};

/// How many top terms to keep per topic.
pub const DEFAULT_TOP_TERMS: usize = 8;

/// Summary of one clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    /// One entry per topic, in topic-id order (empty topics included)
    pub topics: Vec<TopicDescription>,
    /// Number of documents that were clustered
    pub document_count: usize,
    /// Number of records dropped before clustering
    pub discarded_count: usize,
    /// Size of the corpus vocabulary
    pub vocabulary_size: usize,
}

/// A single topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDescription {
    /// 1-based topic id, matching the `Topic` field on output records
    pub topic: usize,
    /// Human-readable label built from the top terms
    pub label: String,
    /// Number of documents assigned to this topic
    pub size: usize,
    /// Fraction of clustered documents in this topic (0.0 to 1.0)
    pub share: f64,
    /// Most widespread terms among members, most common first
    pub top_terms: Vec<TermCount>,
}

/// A term and the number of member documents containing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub documents: usize,
}

impl TopicSummary {
    /// Build a summary from the encoded corpus and its assignments.
    ///
    /// Terms are ranked by document frequency within the topic; ties keep
    /// vocabulary order so the summary is as deterministic as the labels.
    pub fn build(
        vocab: &Vocabulary,
        vectors: &[DocumentVector],
        assignments: &[usize],
        num_topics: usize,
        discarded_count: usize,
        top_n: usize,
    ) -> Self {
        let n = vectors.len();
        let mut topics = Vec::with_capacity(num_topics);

        for c in 0..num_topics {
            let mut doc_freq = vec![0usize; vocab.len()];
            let mut size = 0usize;
            for (vector, _) in vectors
                .iter()
                .zip(assignments.iter())
                .filter(|(_, &a)| a == c)
            {
                size += 1;
                for (count, &x) in doc_freq.iter_mut().zip(vector.iter()) {
                    if x > 0.0 {
                        *count += 1;
                    }
                }
            }

            let mut ranked: Vec<(usize, usize)> = doc_freq
                .into_iter()
                .enumerate()
                .filter(|&(_, count)| count > 0)
                .collect();
            // Stable sort keeps vocabulary order among equal counts
            ranked.sort_by(|a, b| b.1.cmp(&a.1));

            let top_terms: Vec<TermCount> = ranked
                .into_iter()
                .take(top_n)
                .filter_map(|(i, documents)| {
                    vocab.term(i).map(|term| TermCount {
                        term: term.to_string(),
                        documents,
                    })
                })
                .collect();

            let share = if n > 0 { size as f64 / n as f64 } else { 0.0 };

            topics.push(TopicDescription {
                topic: c + 1,
                label: generate_topic_label(&top_terms),
                size,
                share,
                top_terms,
            });
        }

        Self {
            topics,
            document_count: n,
            discarded_count,
            vocabulary_size: vocab.len(),
        }
    }

    /// Display the summary as a bar chart in the terminal.
    pub fn display(&self) {
        println!(
            "\n{}",
            format!(
                "=== {} Topics ({} posts clustered, {} skipped, {} terms) ===",
                self.topics.len(),
                self.document_count,
                self.discarded_count,
                self.vocabulary_size
            )
            .bold()
        );
        println!();

        let bar_width: usize = 20;

        for topic in &self.topics {
            let filled = (topic.share * bar_width as f64).round() as usize;
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

            let colored_bar = if topic.share >= 0.40 {
                bar.bright_green()
            } else if topic.share >= 0.15 {
                bar.bright_yellow()
            } else {
                bar.bright_blue()
            };

            println!(
                "  {:>2}. {:<40} {} {:>5} posts ({:.0}%)",
                topic.topic,
                topic.label.bold(),
                colored_bar,
                topic.size,
                topic.share * 100.0
            );

            if !topic.top_terms.is_empty() {
                let terms: Vec<String> = topic
                    .top_terms
                    .iter()
                    .map(|t| format!("{} ({})", t.term, t.documents))
                    .collect();
                println!("      Terms: {}", terms.join(", ").dimmed());
            }
            println!();
        }
    }
}

/// Label a topic by its first three top terms, e.g. "buy / now / buy now".
fn generate_topic_label(top_terms: &[TermCount]) -> String {
    if top_terms.is_empty() {
        return "(empty)".to_string();
    }
    let words: Vec<&str> = top_terms.iter().take(3).map(|t| t.term.as_str()).collect();
    words.join(" / ")
}
