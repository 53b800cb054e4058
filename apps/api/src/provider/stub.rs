use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;

use crate::layout::{RawLayout, RawTextElement};
use crate::provider::{LayoutProvider, ProviderError};

/// Deterministic provider for local testing without model spend.
/// Always returns a magenta headline near the top and a white caption near the bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubProvider;

#[async_trait]
impl LayoutProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn layout(
        &self,
        image: &RgbaImage,
        instruction: &str,
    ) -> Result<RawLayout, ProviderError> {
        debug!(
            "stub layout for {}x{} image, instruction of {} chars",
            image.width(),
            image.height(),
            instruction.chars().count()
        );
        Ok(stub_layout())
    }
}

fn stub_layout() -> RawLayout {
    RawLayout {
        elements: vec![
            RawTextElement {
                text: "TEST: TOP TEXT".to_string(),
                color: "#FF00FF".to_string(),
                size_percentage: 8.0,
                font_style: None,
                x_percentage: 50.0,
                y_percentage: 15.0,
                alignment: "center".to_string(),
            },
            RawTextElement {
                text: "This is a simulation".to_string(),
                color: "#FFFFFF".to_string(),
                size_percentage: 5.0,
                font_style: None,
                x_percentage: 50.0,
                y_percentage: 85.0,
                alignment: "center".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::validate_layout;

    #[tokio::test]
    async fn test_stub_layout_is_valid_and_deterministic() {
        let image = RgbaImage::new(10, 10);
        let a = StubProvider.layout(&image, "anything").await.unwrap();
        let b = StubProvider.layout(&image, "something else").await.unwrap();
        assert_eq!(a, b);

        let validated = validate_layout(&a).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated.elements()[0].y_percentage, 15.0);
        assert_eq!(validated.elements()[1].y_percentage, 85.0);
    }
}
