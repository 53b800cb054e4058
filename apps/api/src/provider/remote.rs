use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;
use tracing::info;

use crate::layout::RawLayout;
use crate::llm_client::prompts::{LAYOUT_PROMPT_TEMPLATE, LAYOUT_SYSTEM};
use crate::llm_client::LlmClient;
use crate::provider::{LayoutProvider, ProviderError};
use crate::render::encode_png;

/// Asks a vision-language model to design the layout.
#[derive(Clone)]
pub struct RemoteModelProvider {
    llm: LlmClient,
}

impl RemoteModelProvider {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl LayoutProvider for RemoteModelProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn layout(
        &self,
        image: &RgbaImage,
        instruction: &str,
    ) -> Result<RawLayout, ProviderError> {
        let data_url = png_data_url(image)?;
        let prompt = LAYOUT_PROMPT_TEMPLATE.replace("{instruction}", instruction);

        let layout: RawLayout = self
            .llm
            .call_json(&prompt, LAYOUT_SYSTEM, &data_url)
            .await?;

        info!(
            "model {} proposed {} element(s)",
            self.llm.model(),
            layout.elements.len()
        );
        Ok(layout)
    }
}

fn png_data_url(image: &RgbaImage) -> Result<String, image::ImageError> {
    let png = encode_png(image, true)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::llm_client::LlmError;

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serves a fake Chat Completions endpoint that answers with `reply` and records requests.
    async fn fake_model(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let auth = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            captured.lock().unwrap().push((auth, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), captured)
    }

    fn provider(base_url: &str) -> RemoteModelProvider {
        RemoteModelProvider::new(
            LlmClient::new("sk-test".into(), base_url, "vision-mini".into()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_remote_layout_parses_fenced_json() {
        let content = "```json\n{\"elements\":[{\"text\":\"OFERTA\",\"color\":\"#FF0000\",\
            \"size_percentage\":10,\"font_style\":\"impact\",\"x_percentage\":50,\
            \"y_percentage\":20,\"alignment\":\"center\"}]}\n```";
        let (base_url, captured) = fake_model(
            StatusCode::OK,
            json!({"choices": [{"message": {"content": content}}],
                   "usage": {"prompt_tokens": 5, "completion_tokens": 7}}),
        )
        .await;

        let image = RgbaImage::new(8, 8);
        let layout = provider(&base_url)
            .layout(&image, "Put OFERTA at the top in red")
            .await
            .unwrap();
        assert_eq!(layout.elements.len(), 1);
        assert_eq!(layout.elements[0].text, "OFERTA");
        assert_eq!(layout.elements[0].font_style.as_deref(), Some("impact"));

        let requests = captured.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (auth, body) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "vision-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        let parts = &body["messages"][1]["content"];
        assert_eq!(parts[0]["text"], "Instruction: Put OFERTA at the top in red");
        assert!(parts[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_remote_client_error_is_not_retried() {
        let (base_url, captured) = fake_model(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided"}}),
        )
        .await;

        let err = provider(&base_url)
            .layout(&RgbaImage::new(4, 4), "hola")
            .await
            .unwrap_err();
        match err {
            ProviderError::Llm(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remote_malformed_layout_is_parse_error() {
        let (base_url, _) = fake_model(
            StatusCode::OK,
            json!({"choices": [{"message": {"content": "{\"text\": \"no elements key\"}"}}]}),
        )
        .await;

        let err = provider(&base_url)
            .layout(&RgbaImage::new(4, 4), "hola")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Llm(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_remote_empty_content() {
        let (base_url, _) =
            fake_model(StatusCode::OK, json!({"choices": [{"message": {"content": null}}]})).await;

        let err = provider(&base_url)
            .layout(&RgbaImage::new(4, 4), "hola")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Llm(LlmError::EmptyContent)));
    }
}
