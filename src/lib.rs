//! `anchormark` - fuzzy text anchoring and reversible highlighting
//!
//! Given an in-memory document tree and an ordered list of candidate text
//! snippets (typically excerpts returned by a text-understanding service,
//! which may be paraphrased, truncated, or ellipsized relative to the live
//! text), the engine locates the best-matching text leaves, wraps them in
//! visually distinct removable markers, and supports lossless reversal.
//!
//! The engine never touches a real rendering engine: it operates on any type
//! implementing the [`Document`] capability trait. A ready-made arena-backed
//! implementation, [`TreeDocument`], is bundled for hosts and tests.
//!
//! # Example
//!
//! ```
//! use anchormark::{Highlighter, TreeDocument};
//!
//! let mut doc = TreeDocument::new();
//! let para = doc.push_element(doc.root(), "p");
//! doc.push_text(para, "The quick brown fox jumps over the lazy dog");
//!
//! let engine = Highlighter::new();
//! let outcome = engine.apply(&mut doc, &["quick brown fox"]).unwrap();
//! assert_eq!(outcome.markers_applied, 1);
//!
//! // Reversal restores the exact original text.
//! engine.clear(&mut doc).unwrap();
//! assert_eq!(doc.visible_text(), "The quick brown fox jumps over the lazy dog");
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)] // Allow MarkerStyle in style module etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::cast_possible_truncation)] // Intentional index casts
#![allow(clippy::cast_precision_loss)] // Intentional for color math
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod color;
pub mod document;
pub mod engine;
pub mod error;
pub mod event;
pub mod matcher;
pub mod request;
pub mod snippet;
pub mod style;

// Re-export core types at crate root
pub use color::Rgba;
pub use document::{Document, NodeId, tree::TreeDocument};
pub use engine::{ApplyOutcome, Highlighter};
pub use error::{Error, Result};
pub use event::{LogLevel, emit_event, emit_log, set_event_callback, set_log_callback};
pub use matcher::{Match, MatchKind, fuzzy_threshold, match_snippet};
pub use request::{Request, Response, dispatch};
pub use snippet::{NormalizedSnippet, normalize};
pub use style::{MARKER_CLASS, MarkerAttributes, MarkerStyle};
