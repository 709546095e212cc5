//! Fuzzy retrieval over a static knowledge file.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

/// Default minimum score a line must exceed to be returned.
pub const DEFAULT_THRESHOLD: u32 = 60;

/// Default number of lines returned.
pub const DEFAULT_LIMIT: usize = 3;

/// Lines this short (after trimming) are not indexed.
const MIN_LINE_CHARS: usize = 10;

/// In-memory corpus of short knowledge lines.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    lines: Vec<String>,
    threshold: u32,
    limit: usize,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::from_lines(Vec::<String>::new())
    }
}

impl KnowledgeBase {
    /// Build a corpus from raw lines.
    ///
    /// Lines are trimmed; lines of ten characters or fewer are dropped.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| line.chars().count() > MIN_LINE_CHARS)
            .collect();

        Self {
            lines,
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Load a corpus from a text file, one snippet per line.
    ///
    /// A missing or unreadable file yields an empty corpus.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let kb = Self::from_lines(content.lines());
                info!(path = %path.display(), lines = kb.len(), "Loaded knowledge base");
                kb
            }
            Err(e) => {
                warn!(path = %path.display(), "Knowledge base unavailable, retrieval disabled: {}", e);
                Self::default()
            }
        }
    }

    /// Set the score a line must exceed.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the maximum number of lines returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Number of indexed lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Best matching lines for `text`, newline-joined. Empty when nothing
    /// scores above the threshold.
    pub fn query(&self, text: &str) -> String {
        if self.lines.is_empty() || tokenize(text).is_empty() {
            return String::new();
        }

        let mut scored: Vec<(u32, &str)> = self
            .lines
            .iter()
            .map(|line| (token_set_ratio(text, line), line.as_str()))
            .collect();
        // Stable: ties keep file order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let hits: Vec<&str> = scored
            .into_iter()
            .take(self.limit)
            .filter(|(score, _)| *score > self.threshold)
            .map(|(_, line)| line)
            .collect();

        debug!(hits = hits.len(), "Knowledge query");
        hits.join("\n")
    }
}

/// Lowercased alphanumeric tokens.
fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn join(tokens: &[&String]) -> String {
    tokens
        .iter()
        .map(|token| token.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indel similarity, 0 to 100: twice the longest common subsequence over
/// the combined length, counted in chars.
fn ratio(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let common = longest_common_subsequence(&a, &b);
    (200.0 * common as f64 / total as f64).round() as u32
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Order-insensitive similarity between two strings, 0 to 100.
///
/// Both sides are reduced to sorted unique tokens. The shared tokens are
/// compared against each side's shared-plus-remaining tokens and the best
/// pairing wins, so a short query fully contained in a longer line scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let left = tokenize(a);
    let right = tokenize(b);
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let shared: Vec<&String> = left.intersection(&right).collect();
    let only_left: Vec<&String> = left.difference(&right).collect();
    let only_right: Vec<&String> = right.difference(&left).collect();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100;
    }

    let shared = join(&shared);
    let combine = |rest: &[&String]| {
        let rest = join(rest);
        if shared.is_empty() {
            rest
        } else {
            format!("{} {}", shared, rest)
        }
    };
    let combined_left = combine(&only_left);
    let combined_right = combine(&only_right);

    let mut best = ratio(&combined_left, &combined_right);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &combined_left))
            .max(ratio(&shared, &combined_right));
    }
    best
}
