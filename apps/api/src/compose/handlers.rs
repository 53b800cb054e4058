//! Axum route handlers for the Compose API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::compose::form::UploadForm;
use crate::errors::AppError;
use crate::layout::{parse_layout, validate_layout, LayoutDescription, RawLayout};
use crate::render::{composite, decode_image, encode_png, DecodedImage};
use crate::state::AppState;

const DOWNLOAD_NAME: &str = "overlay.png";

/// POST /api/v1/compose
///
/// Multipart `image` + `instruction`. Asks the provider for a layout, renders it,
/// and returns the PNG as a download.
pub async fn handle_compose(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("compose", %request_id, provider = state.provider.name());

    async move {
        let form = UploadForm::read(multipart).await?;
        let image_bytes = form.require_image()?;
        let instruction = form.require_instruction()?;

        let decoded = decode(image_bytes).await?;
        let layout = request_layout(&state, &decoded, &instruction).await?;
        let png = render(&state, decoded, layout).await?;

        info!("composed {} bytes of PNG", png.len());
        Ok::<_, AppError>(png_download(png))
    }
    .instrument(span)
    .await
}

/// POST /api/v1/layout
///
/// Multipart `image` + `instruction`. Returns the validated layout without rendering.
pub async fn handle_layout(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RawLayout>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("layout", %request_id, provider = state.provider.name());

    async move {
        let form = UploadForm::read(multipart).await?;
        let image_bytes = form.require_image()?;
        let instruction = form.require_instruction()?;

        let decoded = decode(image_bytes).await?;
        let layout = request_layout(&state, &decoded, &instruction).await?;
        Ok::<_, AppError>(Json(layout.to_raw()))
    }
    .instrument(span)
    .await
}

/// POST /api/v1/render
///
/// Multipart `image` + `layout` (JSON text). Renders a caller-supplied layout.
pub async fn handle_render(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("render", %request_id);

    async move {
        let form = UploadForm::read(multipart).await?;
        let layout_json = form.require_layout()?;
        let layout = parse_layout(&layout_json)?;
        let image_bytes = form.require_image()?;

        let decoded = decode(image_bytes).await?;
        info!("rendering {} caller-supplied element(s)", layout.len());
        let png = render(&state, decoded, layout).await?;
        Ok::<_, AppError>(png_download(png))
    }
    .instrument(span)
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline steps
// ────────────────────────────────────────────────────────────────────────────

async fn decode(bytes: Bytes) -> Result<DecodedImage, AppError> {
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::ImageDecode(e.to_string()))
}

async fn request_layout(
    state: &AppState,
    image: &DecodedImage,
    instruction: &str,
) -> Result<LayoutDescription, AppError> {
    let raw = state.provider.layout(&image.pixels, instruction).await?;
    let layout = validate_layout(&raw)?;
    if layout.is_empty() {
        info!("provider returned an empty layout; the image is returned unchanged");
    }
    info!(
        "provider {} returned {} element(s)",
        state.provider.name(),
        layout.len()
    );
    Ok(layout)
}

async fn render(
    state: &AppState,
    image: DecodedImage,
    layout: LayoutDescription,
) -> Result<Vec<u8>, AppError> {
    let fonts = state.fonts.clone();
    tokio::task::spawn_blocking(move || {
        let output = composite(&image.pixels, &layout, &fonts);
        encode_png(&output, image.has_alpha)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
    .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("PNG encoding failed")))
}

fn png_download(png: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
            ),
        ],
        png,
    )
        .into_response()
}
