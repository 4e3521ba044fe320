//! Highlight application and reversal.
//!
//! The engine owns the two host-visible operations: apply a new marker
//! generation for an ordered snippet list, and clear the current generation.
//! Both run synchronously to completion on the caller's thread. At most one
//! marker generation exists at a time: `apply` always reverses the previous
//! generation before creating the next, so overlapping requests degrade to
//! last-writer-wins rather than nested markers.

use crate::document::Document;
use crate::error::Result;
use crate::event::{
    EVENT_HIGHLIGHTS_APPLIED, EVENT_HIGHLIGHTS_CLEARED, LogLevel, emit_event, emit_log,
};
use crate::matcher::match_snippet;
use crate::snippet::normalize;
use crate::style::MarkerStyle;

/// Counters describing one highlight pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Markers created in this generation.
    pub markers_applied: usize,
    /// Snippets that matched at least one text unit.
    pub snippets_matched: usize,
    /// Snippets skipped because they normalized to empty.
    pub snippets_skipped: usize,
}

impl ApplyOutcome {
    /// True when the pass produced no markers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers_applied == 0
    }
}

/// The anchor-and-highlight engine.
///
/// Holds the marker presentation applied to every match. Stateless beyond
/// that: all highlight state lives in the document itself, keyed by the
/// reserved marker class.
#[derive(Clone, Copy, Debug, Default)]
pub struct Highlighter {
    style: MarkerStyle,
}

impl Highlighter {
    /// Engine with the default marker presentation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom marker presentation.
    #[must_use]
    pub fn with_style(style: MarkerStyle) -> Self {
        Self { style }
    }

    /// The marker style applied to every match.
    #[must_use]
    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Apply a new marker generation for an ordered list of snippets.
    ///
    /// Clears any previous generation first, then processes snippets in the
    /// supplied order. Matches are located in document order regardless of
    /// which snippet found them. Empty snippets and per-node mutation
    /// failures are logged and skipped; they never abort the remaining work.
    /// When at least one marker was created, the first marker in document
    /// order is scrolled into view.
    pub fn apply<D, S>(&self, doc: &mut D, snippets: &[S]) -> Result<ApplyOutcome>
    where
        D: Document,
        S: AsRef<str>,
    {
        self.clear(doc)?;

        let mut outcome = ApplyOutcome::default();
        for raw in snippets {
            let Some(snippet) = normalize(raw.as_ref()) else {
                emit_log(
                    LogLevel::Warn,
                    &format!("skipping empty snippet: {:?}", raw.as_ref()),
                );
                outcome.snippets_skipped += 1;
                continue;
            };

            let matches = match_snippet(doc, &snippet);
            if !matches.is_empty() {
                outcome.snippets_matched += 1;
            }
            for m in matches {
                // The document may have mutated under us; a vanished node is
                // skipped, never fatal.
                match doc.wrap_in_marker(m.node, &self.style) {
                    Ok(_) => outcome.markers_applied += 1,
                    Err(err) => emit_log(LogLevel::Warn, &format!("marker skipped: {err}")),
                }
            }
        }

        if outcome.markers_applied > 0 {
            if let Some(&first) = doc.marker_nodes().first() {
                doc.scroll_to(first);
            }
        }

        emit_event(
            EVENT_HIGHLIGHTS_APPLIED,
            &serde_json::json!({
                "markers": outcome.markers_applied,
                "matched": outcome.snippets_matched,
                "skipped": outcome.snippets_skipped,
            })
            .to_string(),
        );
        Ok(outcome)
    }

    /// Remove every marker of the current generation.
    ///
    /// Idempotent: clearing a document with no markers is a successful
    /// no-op. Returns the number of markers removed. Individual markers that
    /// fail to unwrap (vanished parent) are logged and skipped.
    pub fn clear<D: Document>(&self, doc: &mut D) -> Result<usize> {
        let mut removed = 0usize;
        for id in doc.marker_nodes() {
            match doc.remove_marker(id) {
                Ok(_) => removed += 1,
                Err(err) => emit_log(LogLevel::Warn, &format!("marker left in place: {err}")),
            }
        }

        if removed > 0 {
            emit_event(
                EVENT_HIGHLIGHTS_CLEARED,
                &serde_json::json!({ "removed": removed }).to_string(),
            );
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tree::TreeDocument;
    use crate::style::MARKER_CLASS;

    fn sample() -> TreeDocument {
        TreeDocument::from_paragraphs(&[
            "The quick brown fox jumps over the lazy dog",
            "A completely unrelated paragraph about nothing",
            "Pack my box with five dozen liquor jugs",
        ])
    }

    #[test]
    fn test_apply_creates_markers() {
        let mut doc = sample();
        let engine = Highlighter::new();

        let outcome = engine.apply(&mut doc, &["quick brown fox"]).unwrap();
        assert_eq!(outcome.markers_applied, 1);
        assert_eq!(outcome.snippets_matched, 1);
        assert_eq!(outcome.snippets_skipped, 0);
        assert_eq!(doc.marker_nodes().len(), 1);
    }

    #[test]
    fn test_apply_preserves_visible_text() {
        let mut doc = sample();
        let before = doc.visible_text();
        let engine = Highlighter::new();

        engine
            .apply(&mut doc, &["quick brown fox", "liquor jugs"])
            .unwrap();
        assert_eq!(doc.visible_text(), before);
    }

    #[test]
    fn test_single_generation_invariant() {
        let mut doc = sample();
        let engine = Highlighter::new();

        engine.apply(&mut doc, &["quick brown fox"]).unwrap();
        let outcome = engine.apply(&mut doc, &["liquor jugs"]).unwrap();

        // Only the second generation survives.
        assert_eq!(outcome.markers_applied, 1);
        let markers = doc.marker_nodes();
        assert_eq!(markers.len(), 1);
        let inner = doc.text_leaves().into_iter().find(|&l| doc.in_marker(l));
        let text = doc.leaf_text(inner.unwrap()).unwrap();
        assert!(text.contains("liquor jugs"));
    }

    #[test]
    fn test_clear_restores_original_text() {
        let mut doc = sample();
        let before = doc.visible_text();
        let engine = Highlighter::new();

        engine.apply(&mut doc, &["quick brown fox"]).unwrap();
        let removed = engine.clear(&mut doc).unwrap();

        assert_eq!(removed, 1);
        assert!(doc.marker_nodes().is_empty());
        assert_eq!(doc.visible_text(), before);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut doc = sample();
        let engine = Highlighter::new();

        assert_eq!(engine.clear(&mut doc).unwrap(), 0);
        assert_eq!(engine.clear(&mut doc).unwrap(), 0);

        engine.apply(&mut doc, &["quick brown fox"]).unwrap();
        assert_eq!(engine.clear(&mut doc).unwrap(), 1);
        assert_eq!(engine.clear(&mut doc).unwrap(), 0);
    }

    #[test]
    fn test_empty_snippets_are_skipped() {
        let mut doc = sample();
        let engine = Highlighter::new();

        let outcome = engine
            .apply(&mut doc, &["", "   ", "quick brown fox"])
            .unwrap();
        assert_eq!(outcome.snippets_skipped, 2);
        assert_eq!(outcome.markers_applied, 1);
    }

    #[test]
    fn test_no_match_is_success() {
        let mut doc = sample();
        let engine = Highlighter::new();

        let outcome = engine
            .apply(&mut doc, &["zygomorphic inflorescence whorl"])
            .unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.snippets_matched, 0);
        assert!(doc.marker_nodes().is_empty());
        assert_eq!(doc.scroll_target(), None);
    }

    #[test]
    fn test_scrolls_to_first_marker_in_document_order() {
        let mut doc = sample();
        let engine = Highlighter::new();

        // Snippet order is reversed relative to document order.
        engine
            .apply(&mut doc, &["liquor jugs", "quick brown fox"])
            .unwrap();

        let markers = doc.marker_nodes();
        assert_eq!(markers.len(), 2);
        assert_eq!(doc.scroll_target(), Some(markers[0]));
        // First marker wraps the fox paragraph, which comes first in the tree.
        assert!(doc.class(markers[0]).is_some_and(|c| c == MARKER_CLASS));
    }

    #[test]
    fn test_snippet_matching_multiple_units() {
        let mut doc = TreeDocument::from_paragraphs(&[
            "shared phrase appears here",
            "and the shared phrase appears again",
        ]);
        let engine = Highlighter::new();

        let outcome = engine.apply(&mut doc, &["shared phrase appears"]).unwrap();
        assert_eq!(outcome.markers_applied, 2);
        assert_eq!(outcome.snippets_matched, 1);
    }

    #[test]
    fn test_vanished_node_does_not_abort_batch() {
        let mut doc = TreeDocument::from_paragraphs(&["target one alpha", "target two omega"]);
        let engine = Highlighter::new();

        // Detach the first paragraph's text mid-flight: matching still sees
        // reachable leaves only, so simulate by detaching after build but
        // before apply; the second snippet must still be processed.
        let first = doc.text_leaves()[0];
        doc.detach(first);

        let outcome = engine
            .apply(&mut doc, &["target one alpha", "target two omega"])
            .unwrap();
        assert_eq!(outcome.markers_applied, 1);
        assert_eq!(doc.marker_nodes().len(), 1);
    }

    #[test]
    fn test_custom_style_is_applied() {
        let mut doc = sample();
        let style = MarkerStyle::builder()
            .background(crate::Rgba::WHITE)
            .underline()
            .build();
        let engine = Highlighter::with_style(style);

        engine.apply(&mut doc, &["quick brown fox"]).unwrap();
        let marker = doc.marker_nodes()[0];
        assert_eq!(doc.marker_style(marker), Some(&style));
    }

    #[test]
    fn test_duplicate_snippet_does_not_double_wrap() {
        let mut doc = sample();
        let engine = Highlighter::new();

        let outcome = engine
            .apply(&mut doc, &["quick brown fox", "quick brown fox"])
            .unwrap();
        // Second occurrence finds the unit already wrapped and is excluded.
        assert_eq!(outcome.markers_applied, 1);
        assert_eq!(doc.marker_nodes().len(), 1);
    }
}
