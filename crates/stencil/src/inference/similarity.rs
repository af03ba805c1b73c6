//! Token-set similarity used to decide whether a block's text repeats
//! across documents.

use std::collections::HashSet;

/// Jaccard similarity of the whitespace-separated token sets.
///
/// Zero when either side has no tokens.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

/// Majority vote on how consistently a text recurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticityCheck {
    /// Similarity strictly above which two samples count as the same text.
    pub similarity_threshold: f64,
    /// Share of the other samples that must match the first one.
    pub majority: f64,
}

impl StaticityCheck {
    pub fn new(similarity_threshold: f64, majority: f64) -> Self {
        Self {
            similarity_threshold,
            majority,
        }
    }

    /// Compares every sample to the first one after lower-casing and
    /// trimming. Zero or one sample is always static.
    pub fn is_static<S: AsRef<str>>(&self, samples: &[S]) -> bool {
        let Some((first, others)) = samples.split_first() else {
            return true;
        };
        if others.is_empty() {
            return true;
        }

        let reference = normalize(first.as_ref());
        let similar = others
            .iter()
            .filter(|s| jaccard_similarity(&reference, &normalize(s.as_ref())) > self.similarity_threshold)
            .count();

        similar as f64 >= self.majority * others.len() as f64
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
