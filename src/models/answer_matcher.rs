//! Fuzzy matching for free-text (dictation) answers.
//!
//! All comparisons run on normalized text: lowercase, a fixed punctuation set removed,
//! whitespace collapsed. Similarity scores are integers in 0-100.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_ACCEPTABLE_THRESHOLD: u8 = 85;

const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '-', '[', ']', '{', '}',
];

/// Expected answer for a dictation exercise plus any other accepted spellings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKey {
    pub target: String,
    #[serde(default)]
    pub alternates: Vec<String>,
}

impl AnswerKey {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            alternates: Vec::new(),
        }
    }

    pub fn with_alternates(mut self, alternates: &[&str]) -> Self {
        self.alternates = alternates.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// Verdict for one free-text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerVerdict {
    pub accepted: bool,
    pub similarity: u8,
    pub combined_similarity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestMatch {
    #[serde(rename = "match")]
    pub matched: String,
    pub score: u8,
    pub index: usize,
}

/// A run of the original text, highlighted when it matched one of the patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Levenshtein distance over chars with unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rows are enough: row i only reads row i-1.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

pub fn similarity(input: &str, target: &str) -> u8 {
    let input = normalize(input);
    let target = normalize(target);
    if input == target {
        return 100;
    }
    if input.is_empty() || target.is_empty() {
        return 0;
    }

    let max_len = input.chars().count().max(target.chars().count()) as f64;
    let distance = edit_distance(&input, &target) as f64;
    (100.0 * (max_len - distance) / max_len).round().max(0.0) as u8
}

pub fn is_acceptable(input: &str, target: &str, alternates: &[String], threshold: u8) -> bool {
    let normalized = normalize(input);
    if normalized == normalize(target) {
        return true;
    }
    if alternates.iter().any(|alt| normalize(alt) == normalized) {
        return true;
    }
    similarity(input, target) >= threshold
}

/// First candidate with the highest score, or None when nothing scores above 0.
pub fn find_best_match<S: AsRef<str>>(input: &str, candidates: &[S]) -> Option<BestMatch> {
    let mut best: Option<BestMatch> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = similarity(input, candidate.as_ref());
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(BestMatch {
                matched: candidate.as_ref().to_string(),
                score,
                index,
            });
        }
    }
    best.filter(|b| b.score > 0)
}

/// Splits `text` into alternating plain and highlighted runs.
///
/// Matching is case-insensitive and the longest pattern is tried first at each position,
/// so "gonna" wins over "gon". Concatenating the segment texts gives back `text`.
pub fn highlight_spans<S: AsRef<str>>(text: &str, patterns: &[S]) -> Vec<Segment> {
    let mut needles: Vec<Vec<char>> = patterns
        .iter()
        .map(|p| p.as_ref().chars().collect::<Vec<_>>())
        .filter(|p| !p.is_empty())
        .collect();
    needles.sort_by(|a, b| b.len().cmp(&a.len()));

    let indexed: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| indexed.get(i).map_or(text.len(), |(b, _)| *b);

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i < indexed.len() {
        let hit = needles.iter().find(|needle| {
            needle.len() <= indexed.len() - i
                && needle
                    .iter()
                    .zip(&indexed[i..])
                    .all(|(n, (_, c))| chars_eq_ignore_case(*n, *c))
        });

        match hit {
            Some(needle) => {
                if plain_start < i {
                    segments.push(Segment {
                        text: text[byte_at(plain_start)..byte_at(i)].to_string(),
                        highlighted: false,
                    });
                }
                let end = i + needle.len();
                segments.push(Segment {
                    text: text[byte_at(i)..byte_at(end)].to_string(),
                    highlighted: true,
                });
                i = end;
                plain_start = end;
            }
            None => i += 1,
        }
    }
    if plain_start < indexed.len() {
        segments.push(Segment {
            text: text[byte_at(plain_start)..].to_string(),
            highlighted: false,
        });
    }
    segments
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Jaccard overlap of the normalized word sets.
pub fn token_similarity(input: &str, target: &str) -> u8 {
    let input = normalize(input);
    let target = normalize(target);
    let input_tokens: HashSet<&str> = input.split(' ').filter(|t| !t.is_empty()).collect();
    let target_tokens: HashSet<&str> = target.split(' ').filter(|t| !t.is_empty()).collect();
    if input_tokens.is_empty() || target_tokens.is_empty() {
        return 0;
    }

    let matching = input_tokens.intersection(&target_tokens).count() as f64;
    let union = input_tokens.union(&target_tokens).count() as f64;
    (matching / union * 100.0).round() as u8
}

pub fn combined_similarity(input: &str, target: &str) -> u8 {
    let chars = similarity(input, target) as f64;
    let tokens = token_similarity(input, target) as f64;
    (0.7 * chars + 0.3 * tokens).round() as u8
}

/// Full verdict for an answer against its key.
pub fn evaluate(input: &str, key: &AnswerKey, threshold: u8) -> AnswerVerdict {
    AnswerVerdict {
        accepted: is_acceptable(input, &key.target, &key.alternates, threshold),
        similarity: similarity(input, &key.target),
        combined_similarity: combined_similarity(input, &key.target),
    }
}
