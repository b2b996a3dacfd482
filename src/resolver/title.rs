//! Title similarity used to flag suspicious title-search hits.

use strsim::normalized_levenshtein;

use crate::utils::plain_text;

/// Similarity of two titles in `[0, 1]`, ignoring case, markup and spacing
pub fn title_similarity(query: &str, resolved: &str) -> f64 {
    normalized_levenshtein(&normalize_title(query), &normalize_title(resolved))
}

fn normalize_title(title: &str) -> String {
    plain_text(title).to_lowercase()
}
