//! Layout providers — turn (image, instruction) into an unvalidated layout.
//!
//! The provider is chosen once at startup and injected into `AppState` as
//! `Arc<dyn LayoutProvider>`. Callers always validate what a provider returns.

pub mod remote;
pub mod stub;

use async_trait::async_trait;
use image::RgbaImage;
use thiserror::Error;

use crate::layout::RawLayout;
use crate::llm_client::LlmError;

pub use remote::RemoteModelProvider;
pub use stub::StubProvider;

/// A provider failed for this request. Not retried by the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("could not encode image for the model: {0}")]
    Encode(#[from] image::ImageError),
}

#[async_trait]
pub trait LayoutProvider: Send + Sync {
    /// Short identifier for logs and the health endpoint.
    fn name(&self) -> &'static str;

    async fn layout(&self, image: &RgbaImage, instruction: &str)
        -> Result<RawLayout, ProviderError>;
}
