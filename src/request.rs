//! Host-facing message layer.
//!
//! The engine is driven by JSON-shaped messages from its host (popup,
//! background process, test harness): an `action` string plus an optional
//! payload. This is the crate's dynamic boundary, so the dynamically-typed
//! validation lives here: a non-array snippet list is `InvalidInput` and
//! rejected before any document access; non-string snippet entries are
//! warned about and dropped, never fatal.
//!
//! # Example
//!
//! ```
//! use anchormark::{Highlighter, TreeDocument, dispatch};
//! use serde_json::json;
//!
//! let mut doc = TreeDocument::from_paragraphs(&["the quick brown fox"]);
//! let engine = Highlighter::new();
//!
//! let response = dispatch(
//!     &engine,
//!     &mut doc,
//!     &json!({ "action": "highlight", "snippets": ["quick brown fox"] }),
//! );
//! assert!(response.success);
//! assert_eq!(response.markers, Some(1));
//! ```

use crate::document::Document;
use crate::engine::Highlighter;
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use serde::Serialize;
use serde_json::Value;

/// A parsed host request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Apply a new marker generation for the given snippets.
    ApplyHighlights {
        snippets: Vec<String>,
        /// Array entries dropped because they were not strings.
        dropped_entries: usize,
    },
    /// Remove the current marker generation.
    ClearHighlights,
    /// Return the document's visible text.
    PageText,
}

impl Request {
    /// Parse a JSON message into a request.
    ///
    /// The message must carry a string `action` field. The `highlight`
    /// action additionally requires a `snippets` array; anything else there
    /// is `InvalidInput`.
    pub fn parse(value: &Value) -> Result<Self> {
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidInput("missing or non-string action".to_string()))?;

        match action {
            "highlight" => {
                let entries = value
                    .get("snippets")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        Error::InvalidInput("snippets must be an array".to_string())
                    })?;

                let mut snippets = Vec::with_capacity(entries.len());
                let mut dropped_entries = 0usize;
                for entry in entries {
                    if let Some(s) = entry.as_str() {
                        snippets.push(s.to_string());
                    } else {
                        emit_log(
                            LogLevel::Warn,
                            &format!("dropping non-string snippet entry: {entry}"),
                        );
                        dropped_entries += 1;
                    }
                }
                Ok(Self::ApplyHighlights {
                    snippets,
                    dropped_entries,
                })
            }
            "clear" => Ok(Self::ClearHighlights),
            "page_text" => Ok(Self::PageText),
            other => Err(Error::InvalidInput(format!("unknown action: {other}"))),
        }
    }
}

/// Reply envelope sent back to the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<usize>,
    /// Non-string snippet entries dropped at the parse boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Response {
    /// Successful reply with a human-readable message.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Successful highlight reply carrying the marker count and how many
    /// malformed snippet entries were dropped on the way in.
    #[must_use]
    pub fn ok_markers(count: usize, dropped: usize) -> Self {
        Self {
            success: true,
            message: Some("text highlighted successfully".to_string()),
            markers: Some(count),
            dropped: (dropped > 0).then_some(dropped),
            ..Self::default()
        }
    }

    /// Successful page-text reply.
    #[must_use]
    pub fn ok_text(text: String) -> Self {
        Self {
            success: true,
            text: Some(text),
            ..Self::default()
        }
    }

    /// Failure reply derived from an engine error.
    #[must_use]
    pub fn failure(err: &Error) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            ..Self::default()
        }
    }
}

/// Parse and execute one host message against a document.
///
/// Never panics and never returns an error: every failure becomes a failure
/// response with a stable `error_kind`, matching the reply convention of the
/// host message channel.
pub fn dispatch<D: Document>(engine: &Highlighter, doc: &mut D, message: &Value) -> Response {
    let request = match Request::parse(message) {
        Ok(request) => request,
        Err(err) => return Response::failure(&err),
    };

    match request {
        Request::ApplyHighlights {
            snippets,
            dropped_entries,
        } => match engine.apply(doc, &snippets) {
            Ok(outcome) => Response::ok_markers(outcome.markers_applied, dropped_entries),
            Err(err) => Response::failure(&err),
        },
        Request::ClearHighlights => match engine.clear(doc) {
            Ok(_) => Response::ok("highlights cleared"),
            Err(err) => Response::failure(&err),
        },
        Request::PageText => {
            let mut text = String::new();
            for id in doc.text_leaves() {
                if let Some(leaf) = doc.leaf_text(id) {
                    text.push_str(leaf);
                }
            }
            Response::ok_text(text)
        }
    }
}
