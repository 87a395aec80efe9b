// Text normalization and tokenization.
//
// Posts are lower-cased, every character that isn't an ASCII word character
// or whitespace becomes a space, whitespace runs collapse to one space, and
// the result is split into terms. Hashtags, mentions, and punctuation all
// dissolve into plain words this way ("#Buy-Now!" -> "buy now").

use std::sync::OnceLock;

use regex_lite::Regex;

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // regex-lite's \w is ASCII-only: [0-9A-Za-z_]
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("static pattern"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Normalize raw text into a single-spaced, lower-case string.
///
/// Missing text is treated as empty and yields an empty string.
pub fn normalize(text: Option<&str>) -> String {
    let lower = text.unwrap_or("").to_lowercase();
    let spaced = non_word().replace_all(&lower, " ");
    let collapsed = whitespace_run().replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

/// Split raw text into normalized terms, preserving their order.
pub fn tokenize(text: Option<&str>) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
