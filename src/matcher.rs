// 🔍 Match Engine - Pair show identities across the two sources
// Exact key intersection first, then greedy fuzzy matching over a sorted pool

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// MATCH RESULT
// ============================================================================

/// One cross-source show pairing.
///
/// `show_key` (the Source-A key) is the canonical identity the rest of the
/// pipeline reports under; `key_b` is the Source-B key it was paired with.
/// For exact matches the two are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedShow {
    pub show_key: String,
    pub key_b: String,
    /// 0-100; 100 means exact normalized-key match
    pub match_quality: u8,
}

/// Output of a matching run.
///
/// Invariant: every show key from either input appears in exactly one of
/// `matched` (A-side keys), `matched` via `key_b` (B-side keys),
/// `unmatched_a`, or `unmatched_b`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResult {
    /// Keyed by the Source-A show key; BTreeMap keeps downstream iteration
    /// order deterministic.
    pub matched: BTreeMap<String, MatchedShow>,
    pub unmatched_a: BTreeSet<String>,
    pub unmatched_b: BTreeSet<String>,
}

// ============================================================================
// MATCH ENGINE
// ============================================================================

pub struct MatchEngine {
    /// Minimum similarity score (0-100) for a fuzzy pairing (default: 85)
    pub threshold: u8,
}

impl MatchEngine {
    /// Create engine with the default acceptance threshold
    pub fn new() -> Self {
        MatchEngine { threshold: 85 }
    }

    pub fn with_threshold(threshold: u8) -> Self {
        MatchEngine { threshold }
    }

    /// Partition the two key sets into matched pairs and per-source leftovers.
    ///
    /// 1. Exact pass: keys present in both sets pair at quality 100.
    /// 2. Fuzzy pass: remaining A-side keys, in lexicographic order, each
    ///    take the highest-scoring surviving B-side candidate (ties go to
    ///    the lexicographically smaller candidate). A candidate is consumed
    ///    by at most one pairing; acceptance requires score >= threshold.
    ///
    /// Greedy, not globally optimal, but fully deterministic.
    pub fn match_shows(
        &self,
        show_keys_a: &BTreeSet<String>,
        show_keys_b: &BTreeSet<String>,
    ) -> MatchResult {
        let mut result = MatchResult::default();

        // Exact pass
        let exact: BTreeSet<&String> = show_keys_a.intersection(show_keys_b).collect();
        for key in &exact {
            result.matched.insert(
                (*key).clone(),
                MatchedShow {
                    show_key: (*key).clone(),
                    key_b: (*key).clone(),
                    match_quality: 100,
                },
            );
        }

        let mut remaining_b: BTreeSet<&String> = show_keys_b
            .iter()
            .filter(|k| !exact.contains(k))
            .collect();

        // Fuzzy pass over the sorted remainder
        for key_a in show_keys_a.iter().filter(|k| !exact.contains(k)) {
            let mut best: Option<(&String, u8)> = None;
            for &candidate in &remaining_b {
                let score = similarity(key_a, candidate);
                // Strict > keeps the first (lexicographically smaller)
                // candidate on ties, since the pool iterates in order
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((candidate, score));
                }
            }

            match best {
                Some((candidate, score)) if score >= self.threshold => {
                    let key_b = candidate.clone();
                    remaining_b.remove(&key_b);
                    result.matched.insert(
                        key_a.clone(),
                        MatchedShow {
                            show_key: key_a.clone(),
                            key_b,
                            match_quality: score,
                        },
                    );
                }
                _ => {
                    result.unmatched_a.insert(key_a.clone());
                }
            }
        }

        result.unmatched_b = remaining_b.into_iter().cloned().collect();
        result
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SIMILARITY
// ============================================================================

/// Normalized indel-edit-distance ratio scaled 0-100.
///
/// `round(200 * lcs(a, b) / (|a| + |b|))`: identical strings score 100,
/// strings with no characters in common score 0. Matches the classic
/// SequenceMatcher-style ratio, e.g. "midnight runners" vs
/// "midnite runners" scores 90.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // LCS length via single-row DP
    let mut prev = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        prev = cur;
    }
    let lcs = prev[b.len()];

    ((200.0 * lcs as f64) / ((a.len() + b.len()) as f64)).round() as u8
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_similarity_identical() {
        assert_eq!(similarity("late night", "late night"), 100);
        assert_eq!(similarity("", ""), 100);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert_eq!(similarity("abc", "xyz"), 0);
        assert_eq!(similarity("abc", ""), 0);
    }

    #[test]
    fn test_similarity_midnight_runners() {
        assert_eq!(similarity("midnight runners", "midnite runners"), 90);
    }

    #[test]
    fn test_exact_match_priority() {
        let engine = MatchEngine::new();
        let result = engine.match_shows(&keys(&["late night"]), &keys(&["late night"]));

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched["late night"].match_quality, 100);
        assert!(result.unmatched_a.is_empty());
        assert!(result.unmatched_b.is_empty());
    }

    #[test]
    fn test_fuzzy_match_accepted() {
        let engine = MatchEngine::new();
        let result = engine.match_shows(&keys(&["midnight runners"]), &keys(&["midnite runners"]));

        let m = &result.matched["midnight runners"];
        assert_eq!(m.key_b, "midnite runners");
        assert_eq!(m.match_quality, 90);
    }

    #[test]
    fn test_threshold_boundary() {
        // 20-char strings with LCS 17: round(200*17/40) = 85 -> accepted
        let a85 = "a".repeat(20);
        let b85 = format!("{}{}", "a".repeat(17), "bbb");
        assert_eq!(similarity(&a85, &b85), 85);

        let engine = MatchEngine::new();
        let result = engine.match_shows(&keys(&[a85.as_str()]), &keys(&[b85.as_str()]));
        assert_eq!(result.matched[a85.as_str()].match_quality, 85);

        // 25-char strings with LCS 21: round(200*21/50) = 84 -> rejected
        let a84 = "a".repeat(25);
        let b84 = format!("{}{}", "a".repeat(21), "bbbb");
        assert_eq!(similarity(&a84, &b84), 84);

        let result = engine.match_shows(&keys(&[a84.as_str()]), &keys(&[b84.as_str()]));
        assert!(result.matched.is_empty());
        assert!(result.unmatched_a.contains(&a84));
        assert!(result.unmatched_b.contains(&b84));
    }

    #[test]
    fn test_no_double_consumption() {
        // Both A keys score 90 against the single B key; only the first
        // (lexicographic) A key gets it
        let engine = MatchEngine::new();
        let result = engine.match_shows(
            &keys(&["aaaaaaaaab", "aaaaaaaaac"]),
            &keys(&["aaaaaaaaad"]),
        );

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched["aaaaaaaaab"].key_b, "aaaaaaaaad");
        assert!(result.unmatched_a.contains("aaaaaaaaac"));
        assert!(result.unmatched_b.is_empty());
    }

    #[test]
    fn test_tie_break_prefers_smaller_candidate() {
        let engine = MatchEngine::new();
        let result = engine.match_shows(
            &keys(&["aaaaaaaaab"]),
            &keys(&["aaaaaaaaae", "aaaaaaaaad"]),
        );

        assert_eq!(result.matched["aaaaaaaaab"].key_b, "aaaaaaaaad");
        assert!(result.unmatched_b.contains("aaaaaaaaae"));
    }

    #[test]
    fn test_partition_completeness() {
        let engine = MatchEngine::new();
        let a = keys(&["late night", "midnight runners", "totally unique show"]);
        let b = keys(&["late night", "midnite runners", "some other thing"]);
        let result = engine.match_shows(&a, &b);

        let mut seen_a = 0;
        let mut seen_b = 0;
        for key in &a {
            let in_matched = result.matched.contains_key(key);
            let in_unmatched = result.unmatched_a.contains(key);
            assert!(in_matched ^ in_unmatched, "A key {:?} not in exactly one partition", key);
            seen_a += 1;
        }
        for key in &b {
            let in_matched = result.matched.values().any(|m| &m.key_b == key);
            let in_unmatched = result.unmatched_b.contains(key);
            assert!(in_matched ^ in_unmatched, "B key {:?} not in exactly one partition", key);
            seen_b += 1;
        }
        assert_eq!(seen_a, 3);
        assert_eq!(seen_b, 3);
    }

    #[test]
    fn test_empty_inputs() {
        let engine = MatchEngine::new();
        let result = engine.match_shows(&BTreeSet::new(), &BTreeSet::new());
        assert!(result.matched.is_empty());
        assert!(result.unmatched_a.is_empty());
        assert!(result.unmatched_b.is_empty());

        let result = engine.match_shows(&keys(&["solo show"]), &BTreeSet::new());
        assert!(result.matched.is_empty());
        assert!(result.unmatched_a.contains("solo show"));
    }
}
