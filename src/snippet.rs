//! Snippet normalization.
//!
//! Candidate excerpts arrive from a text-understanding service and routinely
//! carry ellipsis markers, stray whitespace, and reflowed casing. Before
//! matching, each raw snippet is reduced to a search key plus the list of
//! significant tokens that drive fuzzy matching.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Token shorter than this many grapheme clusters is discarded as noise
/// (stopwords, articles, fragments of truncation).
const MIN_TOKEN_GRAPHEMES: usize = 4;

/// A raw snippet reduced to its searchable form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedSnippet {
    /// Ellipses stripped, whitespace trimmed, case preserved.
    pub cleaned: String,
    /// NFC-normalized lowercase form of `cleaned`, used for exact substring
    /// matching against lowercased unit text.
    pub search_key: String,
    /// Lowercase whitespace-split tokens of significant length, in order.
    pub tokens: Vec<String>,
}

impl NormalizedSnippet {
    /// Number of significant tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Normalize a raw candidate excerpt into a search key and token list.
///
/// Strips unicode ellipsis characters and literal `...` runs, trims
/// whitespace, and derives lowercase tokens by splitting on whitespace and
/// discarding tokens of grapheme length ≤ 3.
///
/// Returns `None` when the snippet normalizes to an empty string; callers
/// skip such snippets with a warning rather than failing the batch.
#[must_use]
pub fn normalize(raw: &str) -> Option<NormalizedSnippet> {
    let cleaned = raw.replace('\u{2026}', "").replace("...", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let search_key = comparison_form(cleaned);
    let tokens: Vec<String> = search_key
        .split_whitespace()
        .filter(|token| token.graphemes(true).count() >= MIN_TOKEN_GRAPHEMES)
        .map(str::to_owned)
        .collect();

    Some(NormalizedSnippet {
        cleaned: cleaned.to_string(),
        search_key,
        tokens,
    })
}

/// NFC-normalized lowercase form used on both sides of every comparison.
///
/// AI output and page text frequently disagree on composed vs. decomposed
/// accents; folding both to the same form keeps exact matching honest.
#[must_use]
pub fn comparison_form(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}
