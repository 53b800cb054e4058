use image::Rgba;
use thiserror::Error;
use tracing::warn;

use crate::layout::model::{
    Alignment, FontStyle, LayoutDescription, RawLayout, RawTextElement, TextElement,
};

/// A layout failed schema or range checks. Never retried; the request is aborted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("layout is not valid JSON: {0}")]
    Malformed(String),

    #[error("element {index}: {field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("element {index}: invalid color '{value}'")]
    InvalidColor { index: usize, value: String },

    #[error("element {index}: unknown alignment '{value}' (expected left, center or right)")]
    InvalidAlignment { index: usize, value: String },
}

const SIZE_RANGE: (f64, f64) = (1.0, 100.0);
const POSITION_RANGE: (f64, f64) = (0.0, 100.0);

/// Parses a JSON layout document and validates it.
pub fn parse_layout(json: &str) -> Result<LayoutDescription, ValidationError> {
    let raw: RawLayout =
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate_layout(&raw)
}

/// Validates every element, in order. The first failing element aborts validation;
/// no partially validated layout is ever returned.
pub fn validate_layout(raw: &RawLayout) -> Result<LayoutDescription, ValidationError> {
    let elements = raw
        .elements
        .iter()
        .enumerate()
        .map(|(index, el)| validate_element(index, el))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LayoutDescription::from_validated(elements))
}

fn validate_element(index: usize, el: &RawTextElement) -> Result<TextElement, ValidationError> {
    let color = parse_color(&el.color).ok_or_else(|| ValidationError::InvalidColor {
        index,
        value: el.color.clone(),
    })?;

    let size_percentage = check_range(index, "size_percentage", el.size_percentage, SIZE_RANGE)?;
    let x_percentage = check_range(index, "x_percentage", el.x_percentage, POSITION_RANGE)?;
    let y_percentage = check_range(index, "y_percentage", el.y_percentage, POSITION_RANGE)?;

    let alignment =
        el.alignment
            .parse::<Alignment>()
            .map_err(|_| ValidationError::InvalidAlignment {
                index,
                value: el.alignment.clone(),
            })?;

    let font_style = match el.font_style.as_deref() {
        None => FontStyle::default(),
        Some(tag) => FontStyle::from_tag(tag).unwrap_or_else(|| {
            warn!("element {index}: unknown font_style '{tag}', using {}", FontStyle::default());
            FontStyle::default()
        }),
    };

    Ok(TextElement {
        text: el.text.clone(),
        color,
        size_percentage,
        font_style,
        x_percentage,
        y_percentage,
        alignment,
    })
}

/// Rejects values outside `[min, max]`, including NaN and infinities.
fn check_range(
    index: usize,
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<f32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value as f32)
    } else {
        Err(ValidationError::OutOfRange {
            index,
            field,
            value,
            min,
            max,
        })
    }
}

/// Parses `#RRGGBB`, the other CSS hex forms, `rgb()` notation, or a CSS named color.
pub fn parse_color(input: &str) -> Option<Rgba<u8>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed: csscolorparser::Color = trimmed.parse().ok()?;
    Some(Rgba(parsed.to_rgba8()))
}
