//! Marker presentation: attributes and colors.
//!
//! Every marker created by the engine carries the reserved [`MARKER_CLASS`]
//! plus a [`MarkerStyle`] describing how the host should render it. The
//! engine itself only reads the class when discovering and reversing markers;
//! the style is opaque payload for the host.
//!
//! # Examples
//!
//! ```
//! use anchormark::{MarkerAttributes, MarkerStyle, Rgba};
//!
//! // The original fixed presentation: yellow, orange border, rounded, padded.
//! let style = MarkerStyle::default();
//! assert_eq!(style.background, Some(Rgba::YELLOW));
//!
//! // Custom styles via the builder.
//! let subtle = MarkerStyle::builder()
//!     .background(Rgba::from_hex("#fff3b0").unwrap())
//!     .underline()
//!     .build();
//! assert!(subtle.attributes.contains(MarkerAttributes::UNDERLINE));
//! ```

use crate::color::Rgba;
use bitflags::bitflags;

/// Reserved class identifying marker elements in the document.
///
/// The engine is the sole mutator of elements carrying this class; reversal
/// discovers markers by it.
pub const MARKER_CLASS: &str = "anchormark-highlight";

bitflags! {
    /// Marker rendering attributes.
    ///
    /// Attributes are bitflags and can be combined using bitwise OR. How each
    /// attribute is realized (CSS, terminal styling, ...) is up to the host.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct MarkerAttributes: u32 {
        /// Rounded corners on the marker box.
        const ROUNDED   = 0x01;
        /// Inner padding around the wrapped text.
        const PADDED    = 0x02;
        /// Bold/increased intensity.
        const BOLD      = 0x04;
        /// Underlined text.
        const UNDERLINE = 0x08;
    }
}

/// Presentation attributes applied to every marker of a generation.
///
/// Styles are immutable and cheap to copy. `None` for a color means "no
/// background" / "no border" rather than a default color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Background fill (None = no fill).
    pub background: Option<Rgba>,
    /// Border color (None = no border).
    pub border: Option<Rgba>,
    /// Rendering attributes.
    pub attributes: MarkerAttributes,
}

impl Default for MarkerStyle {
    /// The fixed presentation of the original highlighter: yellow background,
    /// orange border, rounded corners, padded.
    fn default() -> Self {
        Self {
            background: Some(Rgba::YELLOW),
            border: Some(Rgba::ORANGE),
            attributes: MarkerAttributes::ROUNDED.union(MarkerAttributes::PADDED),
        }
    }
}

impl MarkerStyle {
    /// Style with no colors or attributes.
    pub const NONE: Self = Self {
        background: None,
        border: None,
        attributes: MarkerAttributes::empty(),
    };

    /// Create a new style builder.
    #[must_use]
    pub fn builder() -> MarkerStyleBuilder {
        MarkerStyleBuilder::default()
    }

    /// Create a style with only a background fill.
    #[must_use]
    pub const fn background(color: Rgba) -> Self {
        Self {
            background: Some(color),
            border: None,
            attributes: MarkerAttributes::empty(),
        }
    }

    /// Return a new style with the specified border color.
    #[must_use]
    pub const fn with_border(self, color: Rgba) -> Self {
        Self {
            border: Some(color),
            ..self
        }
    }

    /// Return a new style with the specified attributes added.
    #[must_use]
    pub const fn with_attributes(self, attrs: MarkerAttributes) -> Self {
        Self {
            attributes: self.attributes.union(attrs),
            ..self
        }
    }

    /// Check if this style has any non-default properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.border.is_none() && self.attributes.is_empty()
    }
}

/// Builder for creating marker styles fluently.
///
/// Starts from [`MarkerStyle::NONE`], not the yellow/orange default.
#[derive(Clone, Debug)]
pub struct MarkerStyleBuilder {
    style: MarkerStyle,
}

impl Default for MarkerStyleBuilder {
    fn default() -> Self {
        Self {
            style: MarkerStyle::NONE,
        }
    }
}

impl MarkerStyleBuilder {
    /// Set the background fill.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.style.background = Some(color);
        self
    }

    /// Set the border color.
    #[must_use]
    pub fn border(mut self, color: Rgba) -> Self {
        self.style.border = Some(color);
        self
    }

    /// Add rounded corners.
    #[must_use]
    pub fn rounded(mut self) -> Self {
        self.style.attributes |= MarkerAttributes::ROUNDED;
        self
    }

    /// Add inner padding.
    #[must_use]
    pub fn padded(mut self) -> Self {
        self.style.attributes |= MarkerAttributes::PADDED;
        self
    }

    /// Add the bold attribute.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.style.attributes |= MarkerAttributes::BOLD;
        self
    }

    /// Add the underline attribute.
    #[must_use]
    pub fn underline(mut self) -> Self {
        self.style.attributes |= MarkerAttributes::UNDERLINE;
        self
    }

    /// Build the final style.
    #[must_use]
    pub fn build(self) -> MarkerStyle {
        self.style
    }
}
