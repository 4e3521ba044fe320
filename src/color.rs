//! RGBA color values for marker presentation.
//!
//! Markers carry fixed presentation attributes (background and border
//! colors). Colors are stored as floating-point RGBA components and can be
//! parsed from or formatted as hex strings for host-side styling.
//!
//! # Examples
//!
//! ```
//! use anchormark::Rgba;
//!
//! let accent = Rgba::from_hex("#FFA500").unwrap();
//! assert_eq!(accent, Rgba::ORANGE);
//! assert_eq!(accent.to_hex(), "#ffa500");
//! ```

use std::fmt;

/// RGBA color with f32 components in range [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Opaque yellow, the default marker background.
    pub const YELLOW: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque orange (#FFA500), the default marker border.
    pub const ORANGE: Self = Self {
        r: 1.0,
        g: 165.0 / 255.0,
        b: 0.0,
        a: 1.0,
    };

    /// Create a new RGBA color from f32 components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from f32 RGB components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from u8 RGB components.
    #[must_use]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: 1.0,
        }
    }

    /// Parse a hex color string (e.g., "#FF0000" or "FF0000").
    ///
    /// Supports 3-char (#RGB) and 6-char (#RRGGBB) formats.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            3 => {
                // #RGB -> #RRGGBB
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Self::from_rgb_u8(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::from_rgb_u8(r, g, b))
            }
            _ => None,
        }
    }

    /// Format as a lowercase `#rrggbb` hex string (alpha ignored).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.r_u8(),
            self.g_u8(),
            self.b_u8()
        )
    }

    /// Red component as u8.
    #[must_use]
    pub fn r_u8(self) -> u8 {
        (self.r.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Green component as u8.
    #[must_use]
    pub fn g_u8(self) -> u8 {
        (self.g.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Blue component as u8.
    #[must_use]
    pub fn b_u8(self) -> u8 {
        (self.b.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Return the same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
