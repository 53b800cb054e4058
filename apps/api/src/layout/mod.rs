// Layout model: wire types from providers, validation, and the typed
// immutable LayoutDescription the compositor consumes.

pub mod model;
pub mod validation;

pub use model::{Alignment, FontStyle, LayoutDescription, RawLayout, RawTextElement, TextElement};
pub use validation::{parse_layout, validate_layout, ValidationError};
