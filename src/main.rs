use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use lightopic::config::{parse_word_list, TopicConfig};
use lightopic::output::terminal;
use lightopic::pipeline::label;
use lightopic::records;
use lightopic::topics::features::extract_features;
use lightopic::topics::tokenize::tokenize;

/// Lightopic: fast lexical topic grouping for short posts.
///
/// Clusters posts into K topics using word and word-pair features and a
/// cosine k-means. No model download, no training.
#[derive(Parser)]
#[command(name = "lightopic", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster a record file into topics and write the labeled records
    Cluster {
        /// Input records (.json array, or .jsonl / .ndjson)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write labeled records (format follows the extension)
        #[arg(short, long, default_value = "tweets_with_light_topics.json")]
        output: PathBuf,

        /// Also write the per-topic summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,

        /// Sample posts to print per topic (default: 3)
        #[arg(long, default_value = "3")]
        samples: usize,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Show the tokens and features extracted from a single text
    Inspect {
        /// The text to analyze
        text: String,

        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Command-line overrides for values otherwise taken from the environment.
#[derive(Args)]
struct Overrides {
    /// Number of topics (K)
    #[arg(short = 'k', long)]
    topics: Option<usize>,

    /// Drop posts shorter than this many characters
    #[arg(long)]
    min_length: Option<usize>,

    /// Number of k-means passes to run
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Comma-separated stopwords (replaces the configured list)
    #[arg(long)]
    stopwords: Option<String>,

    /// Add the standard English stopword list
    #[arg(long)]
    english_stopwords: bool,

    /// Record field holding the post text
    #[arg(long)]
    text_field: Option<String>,
}

impl Overrides {
    fn apply(self, mut config: TopicConfig) -> TopicConfig {
        if let Some(k) = self.topics {
            config.num_topics = k;
        }
        if let Some(min) = self.min_length {
            config.min_text_length = min;
        }
        if let Some(iters) = self.max_iterations {
            config.max_iterations = iters;
        }
        if let Some(list) = self.stopwords {
            config.stopwords = parse_word_list(&list);
        }
        if self.english_stopwords {
            config.english_stopwords = true;
        }
        if let Some(field) = self.text_field {
            config.text_field = field;
        }
        config
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lightopic=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cluster {
            input,
            output,
            summary_json,
            samples,
            overrides,
        } => {
            let config = overrides.apply(TopicConfig::load()?);
            config.require_valid()?;

            println!("Loading records from {}...", input.display());
            let records = records::load_records(&input)?;
            info!(records = records.len(), "Loaded input");

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg}")?);
            spinner.set_message(format!(
                "Clustering into {} topics ({} passes)...",
                config.num_topics, config.max_iterations
            ));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = label::run(records, &config);
            spinner.finish_and_clear();
            let run = result?;

            run.summary.display();
            terminal::display_topic_samples(
                &run.records,
                &config.text_field,
                config.num_topics,
                samples,
            );

            // Stage every output first; nothing lands at its destination
            // unless all of them were written.
            let staged_records = records::stage_records(&output, &run.records)?;
            let staged_summary = match &summary_json {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&run.summary)?;
                    let staged = records::stage_contents(path, json.as_bytes())
                        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
                    Some(staged)
                }
                None => None,
            };

            if let Some(staged) = staged_summary {
                staged.commit()?;
            }
            staged_records.commit()?;
            if let Some(path) = &summary_json {
                println!("Summary saved to {}", path.display());
            }

            println!(
                "{}",
                format!(
                    "Done. {} labeled records saved to {}",
                    run.records.len(),
                    output.display()
                )
                .bold()
            );
        }

        Commands::Inspect { text, overrides } => {
            let config = overrides.apply(TopicConfig::load()?);
            let tokens = tokenize(Some(&text));
            let features = extract_features(&tokens, &config.stopword_set());
            terminal::display_features(&text, &tokens, &features);
        }
    }

    Ok(())
}
