//! Fuzzy candidate ranking for rules lookups.
//!
//! Players rarely type a rule's exact name. When a lookup has no exact
//! hit, records are scored with a partial ratio (the best Levenshtein
//! similarity between the shorter string and any equal-length character
//! window of the longer one) and offered in score order.

use open5e::Record;
use std::collections::HashSet;

/// Minimum similarity score (0-100) for a record to stay a candidate.
pub const DEFAULT_CUTOFF: u8 = 55;

/// A record scored against a query.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub record: Record,
    pub score: u8,
}

/// Ranker output: exact hits plus scored candidates.
#[derive(Debug, Clone, Default)]
pub struct Ranked {
    /// Records whose normalized field equals the normalized query, in
    /// original input order.
    pub exact: Vec<Record>,
    /// Deduplicated records at or above the cutoff, best score first.
    /// Ties keep original input order.
    pub candidates: Vec<Candidate>,
}

impl Ranked {
    /// True when the query produced neither exact hits nor candidates.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.candidates.is_empty()
    }
}

/// Partition records into exact matches and ranked fuzzy candidates.
///
/// `field` selects which record field is compared (usually `"name"`).
/// Both sides are trimmed and lowercased before comparison. Records
/// sharing a normalized field value keep their first occurrence only in
/// the candidate pool; the exact list is not deduplicated. A blank query
/// matches nothing.
pub fn rank(query: &str, records: &[Record], field: &str, cutoff: u8) -> Ranked {
    let query = normalize(query);
    if query.is_empty() {
        return Ranked::default();
    }

    let mut ranked = Ranked::default();
    let mut seen: HashSet<String> = HashSet::new();

    for record in records {
        let Some(value) = record.text(field) else {
            continue;
        };
        let value = normalize(value);
        if value.is_empty() {
            continue;
        }

        if value == query {
            ranked.exact.push(record.clone());
        }

        if seen.insert(value.clone()) {
            let score = partial_ratio(&query, &value);
            if score >= cutoff {
                ranked.candidates.push(Candidate {
                    record: record.clone(),
                    score,
                });
            }
        }
    }

    // Vec::sort_by is stable, so equal scores keep input order.
    ranked.candidates.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Substring-tolerant similarity score in 0-100.
///
/// The shorter string is compared against every window of its own length
/// in the longer string; the best normalized Levenshtein similarity wins.
/// A string fully contained in the other scores 100. Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    let needle: String = short.iter().collect();
    let mut best = 0.0_f64;

    for window in long.windows(short.len()) {
        let haystack: String = window.iter().collect();
        let score = strsim::normalized_levenshtein(&needle, &haystack);
        if score > best {
            best = score;
        }
        if best >= 1.0 {
            break;
        }
    }

    (best * 100.0).round() as u8
}
