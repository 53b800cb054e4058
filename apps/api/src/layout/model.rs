//! Layout data model — the wire form produced by layout providers and the
//! typed form consumed by the compositor.
//!
//! `RawLayout` mirrors the JSON a provider returns and is never handed to the
//! compositor directly. `LayoutDescription` can only be obtained through
//! validation (see `validation.rs`) and is immutable afterwards.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Layout exactly as received from a provider or a client:
/// `{"elements": [ {text, color, size_percentage, font_style?, x_percentage, y_percentage, alignment}, ... ]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLayout {
    pub elements: Vec<RawTextElement>,
}

/// One unvalidated overlay element. Numbers are accepted as ints or floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextElement {
    pub text: String,
    pub color: String,
    pub size_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    pub x_percentage: f64,
    pub y_percentage: f64,
    pub alignment: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Closed enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Font style tags a layout may request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Clean sans-serif; also the fallback for unknown tags.
    #[default]
    Modern,
    /// Script or serif face for greetings and invitations.
    Elegant,
    /// Heavy condensed face for sales and announcements.
    Impact,
}

impl FontStyle {
    pub const ALL: [FontStyle; 3] = [FontStyle::Modern, FontStyle::Elegant, FontStyle::Impact];

    /// Parses a style tag. The Spanish tags used by earlier prompts are
    /// accepted as aliases.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "modern" | "moderna" => Some(FontStyle::Modern),
            "elegant" | "elegante" => Some(FontStyle::Elegant),
            "impact" | "impacto" => Some(FontStyle::Impact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Modern => "modern",
            FontStyle::Elegant => "elegant",
            FontStyle::Impact => "impact",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal anchoring of a text run relative to its anchor point.
/// Vertical placement is always centred on the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Text starts at the anchor and extends rightward.
    Left,
    /// Text is centred on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            _ => Err(()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validated types
// ────────────────────────────────────────────────────────────────────────────

/// A validated overlay element. Percentages are guaranteed in range.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub text: String,
    pub color: Rgba<u8>,
    /// Fraction of the image height, in [1, 100].
    pub size_percentage: f32,
    pub font_style: FontStyle,
    /// Anchor x as a fraction of the image width, in [0, 100].
    pub x_percentage: f32,
    /// Anchor y as a fraction of the image height, in [0, 100].
    pub y_percentage: f32,
    pub alignment: Alignment,
}

/// Ordered, validated list of elements. Draw order is list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDescription {
    elements: Vec<TextElement>,
}

impl LayoutDescription {
    /// Only the validation pass constructs non-empty layouts.
    pub(super) fn from_validated(elements: Vec<TextElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Converts back to the wire form with canonical tags and `#RRGGBB` colors.
    pub fn to_raw(&self) -> RawLayout {
        RawLayout {
            elements: self
                .elements
                .iter()
                .map(|el| RawTextElement {
                    text: el.text.clone(),
                    color: hex_string(el.color),
                    size_percentage: f64::from(el.size_percentage),
                    font_style: Some(el.font_style.as_str().to_string()),
                    x_percentage: f64::from(el.x_percentage),
                    y_percentage: f64::from(el.y_percentage),
                    alignment: el.alignment.as_str().to_string(),
                })
                .collect(),
        }
    }
}

fn hex_string(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}
