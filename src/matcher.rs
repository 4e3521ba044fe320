//! Text unit matching.
//!
//! For one normalized snippet, find every text leaf in the document judged a
//! match. Excerpts from a language model are frequently paraphrased relative
//! to the literal page text (reflowed whitespace, truncation, joined
//! sentences), so matching is two-tier: an exact substring check first, then
//! a significant-token coverage check. No edit-distance computation is
//! involved; the coverage formula is the contract.

use crate::document::{Document, NodeId};
use crate::snippet::{NormalizedSnippet, comparison_form};

/// Which rule accepted a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// The unit's lowercased text contains the snippet's full search key.
    Exact,
    /// Enough significant tokens appear as substrings of the unit's text.
    Fuzzy,
}

/// Association between a snippet and one matching text unit.
///
/// Recomputed on every highlight request; never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub node: NodeId,
    pub kind: MatchKind,
}

/// Minimum number of matching tokens for the fuzzy rule to accept a unit.
pub const FUZZY_MIN_TOKENS: usize = 3;

/// Fuzzy acceptance threshold: `max(3, ceil(0.7 × token_count))`.
///
/// A fixed floor of three tokens AND at least 70% token coverage. Observed
/// consistently across the original call sites and treated as the contract.
#[must_use]
pub fn fuzzy_threshold(token_count: usize) -> usize {
    FUZZY_MIN_TOKENS.max(token_count.saturating_mul(7).div_ceil(10))
}

/// Find every text leaf matching the snippet, in document order.
///
/// A single linear pass over the document's text leaves. Units already
/// wrapped in a marker (or whose parent is one) are excluded so a new pass
/// never nests or duplicates wrapping. May return an empty list; a snippet
/// with no anchor in the page is normal, not an error.
#[must_use]
pub fn match_snippet<D: Document>(doc: &D, snippet: &NormalizedSnippet) -> Vec<Match> {
    let mut matches = Vec::new();

    for id in doc.text_leaves() {
        if doc.in_marker(id) {
            continue;
        }
        let Some(text) = doc.leaf_text(id) else {
            continue;
        };
        let unit = comparison_form(text);

        if unit.contains(&snippet.search_key) {
            matches.push(Match {
                node: id,
                kind: MatchKind::Exact,
            });
        } else if snippet.tokens.len() >= FUZZY_MIN_TOKENS {
            let hits = snippet
                .tokens
                .iter()
                .filter(|token| unit.contains(token.as_str()))
                .count();
            if hits >= fuzzy_threshold(snippet.tokens.len()) {
                matches.push(Match {
                    node: id,
                    kind: MatchKind::Fuzzy,
                });
            }
        }
    }

    matches
}
