//! End-to-end tests for the anchor-and-highlight engine.
//!
//! Exercises the full path a host takes: build a document tree, drive the
//! engine through JSON messages, and verify marker generations, reversal,
//! and error isolation.

use anchormark::{
    Document, Highlighter, MARKER_CLASS, MatchKind, TreeDocument, dispatch, match_snippet,
    normalize,
};
use serde_json::json;

/// An article-shaped tree: headings, nested emphasis, multiple paragraphs.
fn article() -> TreeDocument {
    let mut doc = TreeDocument::new();
    let h1 = doc.push_element(doc.root(), "h1");
    doc.push_text(h1, "Photosynthesis in brief");

    let intro = doc.push_element(doc.root(), "p");
    doc.push_text(intro, "Photosynthesis converts sunlight into chemical energy. ");
    let em = doc.push_element(intro, "em");
    doc.push_text(em, "Chlorophyll absorbs mostly red and blue light.");

    let body = doc.push_element(doc.root(), "p");
    doc.push_text(
        body,
        "The light-dependent reactions split water and release oxygen, \
         while the Calvin cycle fixes carbon dioxide into sugars.",
    );
    doc
}

#[test]
fn apply_then_clear_roundtrips_visible_text() {
    let mut doc = article();
    let before = doc.visible_text();
    let engine = Highlighter::new();

    let outcome = engine
        .apply(
            &mut doc,
            &[
                "converts sunlight into chemical energy",
                "Calvin cycle fixes carbon dioxide",
            ],
        )
        .unwrap();
    assert_eq!(outcome.markers_applied, 2);
    assert_eq!(doc.visible_text(), before);

    engine.clear(&mut doc).unwrap();
    assert_eq!(doc.visible_text(), before);
    assert!(doc.marker_nodes().is_empty());
}

#[test]
fn second_apply_supersedes_first_generation() {
    let mut doc = article();
    let engine = Highlighter::new();

    engine
        .apply(&mut doc, &["converts sunlight into chemical energy"])
        .unwrap();
    let first_gen = doc.marker_nodes();
    assert_eq!(first_gen.len(), 1);

    engine
        .apply(&mut doc, &["Calvin cycle fixes carbon dioxide"])
        .unwrap();
    let second_gen = doc.marker_nodes();
    assert_eq!(second_gen.len(), 1);
    // The first generation's marker id is dead, not merely unlisted.
    assert!(doc.class(first_gen[0]).is_none());
}

#[test]
fn nested_leaves_are_matched_and_wrapped() {
    let mut doc = article();
    let engine = Highlighter::new();

    // This text lives inside an <em> inside a <p>.
    let outcome = engine
        .apply(&mut doc, &["Chlorophyll absorbs mostly red and blue light"])
        .unwrap();
    assert_eq!(outcome.markers_applied, 1);

    let marker = doc.marker_nodes()[0];
    assert_eq!(doc.class(marker), Some(MARKER_CLASS));
}

#[test]
fn fuzzy_match_survives_paraphrased_excerpt() {
    let mut doc = article();
    let engine = Highlighter::new();

    // Paraphrase: word order and filler differ, but significant tokens hit.
    let snippet = normalize("reactions release oxygen … Calvin cycle sugars").unwrap();
    assert!(snippet.token_count() >= 3);

    let matches = match_snippet(&doc, &snippet);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind, MatchKind::Fuzzy);

    let outcome = engine
        .apply(&mut doc, &["reactions release oxygen … Calvin cycle sugars"])
        .unwrap();
    assert_eq!(outcome.markers_applied, 1);
}

#[test]
fn mixed_good_and_empty_snippets_partially_succeed() {
    let mut doc = article();
    let engine = Highlighter::new();

    let outcome = engine
        .apply(
            &mut doc,
            &["", "   ", "…", "Calvin cycle fixes carbon dioxide"],
        )
        .unwrap();
    assert_eq!(outcome.snippets_skipped, 3);
    assert_eq!(outcome.markers_applied, 1);
}

#[test]
fn scroll_target_is_first_marker_in_document_order() {
    let mut doc = article();
    let engine = Highlighter::new();

    engine
        .apply(
            &mut doc,
            &[
                // Supplied in reverse document order.
                "Calvin cycle fixes carbon dioxide",
                "Photosynthesis in brief",
            ],
        )
        .unwrap();

    let markers = doc.marker_nodes();
    assert_eq!(doc.scroll_target(), Some(markers[0]));
}

#[test]
fn host_message_conversation() {
    let mut doc = article();
    let engine = Highlighter::new();

    // 1. Host asks for the page text to feed the model.
    let response = dispatch(&engine, &mut doc, &json!({ "action": "page_text" }));
    assert!(response.success);
    let page_text = response.text.unwrap();
    assert!(page_text.contains("Calvin cycle"));

    // 2. Model replies with excerpts; host forwards them, one malformed.
    let response = dispatch(
        &engine,
        &mut doc,
        &json!({
            "action": "highlight",
            "snippets": ["Calvin cycle fixes carbon dioxide", 17, ""],
        }),
    );
    assert!(response.success);
    assert_eq!(response.markers, Some(1));
    assert_eq!(response.dropped, Some(1));

    // 3. User dismisses the highlights.
    let response = dispatch(&engine, &mut doc, &json!({ "action": "clear" }));
    assert!(response.success);
    assert!(doc.marker_nodes().is_empty());

    // 4. A second clear is a harmless no-op.
    let response = dispatch(&engine, &mut doc, &json!({ "action": "clear" }));
    assert!(response.success);
}

#[test]
fn malformed_request_leaves_document_untouched() {
    let mut doc = article();
    let before = doc.visible_text();
    let engine = Highlighter::new();
    engine
        .apply(&mut doc, &["Photosynthesis in brief"])
        .unwrap();

    for message in [
        json!({ "action": "highlight", "snippets": "not an array" }),
        json!({ "action": "highlight" }),
        json!({ "action": "unknown" }),
        json!({}),
    ] {
        let response = dispatch(&engine, &mut doc, &message);
        assert!(!response.success, "message should fail: {message}");
        assert_eq!(response.error_kind, Some("invalid_input"));
    }

    // The existing generation survived every rejected request.
    assert_eq!(doc.marker_nodes().len(), 1);
    assert_eq!(doc.visible_text(), before);
}

#[test]
fn concurrent_detach_between_apply_calls_is_tolerated() {
    let mut doc = TreeDocument::from_paragraphs(&[
        "anchor phrase number one",
        "anchor phrase number two",
    ]);
    let engine = Highlighter::new();

    engine.apply(&mut doc, &["anchor phrase number"]).unwrap();
    assert_eq!(doc.marker_nodes().len(), 2);

    // The page removes one marker's subtree behind the engine's back.
    let victim = doc.marker_nodes()[0];
    doc.detach(victim);

    // Clearing skips the vanished marker and still removes the other.
    let removed = engine.clear(&mut doc).unwrap();
    assert_eq!(removed, 1);
    assert!(doc.marker_nodes().is_empty());
}

#[test]
fn many_paragraph_document_scales_linearly_enough() {
    let paragraphs: Vec<String> = (0..500)
        .map(|i| format!("paragraph number {i} with entirely ordinary filler text"))
        .collect();
    let mut doc = TreeDocument::from_paragraphs(&paragraphs);
    let engine = Highlighter::new();

    // Two significant tokens, so only the exact rule can accept a unit and
    // the shared filler text cannot drag in every paragraph.
    let outcome = engine.apply(&mut doc, &["paragraph number 250"]).unwrap();
    assert_eq!(outcome.markers_applied, 1);

    let marker = doc.marker_nodes()[0];
    let inner = doc
        .text_leaves()
        .into_iter()
        .find(|&l| doc.in_marker(l))
        .unwrap();
    assert!(doc.leaf_text(inner).unwrap().contains("number 250"));
    assert_eq!(doc.scroll_target(), Some(marker));
}
