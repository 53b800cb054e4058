use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Fields collected from a multipart upload. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub image: Option<Bytes>,
    pub instruction: Option<String>,
    pub layout: Option<String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    form.image = Some(field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("could not read image upload: {e}"))
                    })?);
                }
                "instruction" | "layout" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("could not read field '{name}': {e}"))
                    })?;
                    if name == "instruction" {
                        form.instruction = Some(text);
                    } else {
                        form.layout = Some(text);
                    }
                }
                other => debug!("ignoring multipart field '{other}'"),
            }
        }
        Ok(form)
    }

    pub fn require_image(&self) -> Result<Bytes, AppError> {
        match &self.image {
            Some(bytes) if !bytes.is_empty() => Ok(bytes.clone()),
            _ => Err(AppError::Validation("an 'image' file is required".to_string())),
        }
    }

    pub fn require_instruction(&self) -> Result<String, AppError> {
        self.instruction
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("instruction cannot be empty".to_string()))
    }

    pub fn require_layout(&self) -> Result<String, AppError> {
        self.layout
            .clone()
            .ok_or_else(|| AppError::Validation("a 'layout' field is required".to_string()))
    }
}
