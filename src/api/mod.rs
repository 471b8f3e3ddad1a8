mod types;

pub use types::*;

use crate::config::Config;
use crate::core::{EditRequest, GenerateRequest, ImagePayload, StudioError};
use crate::http_client::HTTP_CLIENT;

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    generate_model: String,
    edit_model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            generate_model: "gemini-3-pro-image-preview".to_string(),
            edit_model: "gemini-2.5-flash-image".to_string(),
        }
    }

    /// Create a new client from config
    pub fn from_config(config: &Config) -> Result<Self, StudioError> {
        let api_key = config
            .api_key()
            .ok_or(StudioError::MissingApiKey)?
            .to_string();

        let mut client = Self::new(api_key, config.api.base_url.clone());
        client.generate_model = config.api.generate_model.clone();
        client.edit_model = config.api.edit_model.clone();
        Ok(client)
    }

    pub fn set_generate_model(&mut self, model: impl Into<String>) {
        self.generate_model = model.into();
    }

    pub fn set_edit_model(&mut self, model: impl Into<String>) {
        self.edit_model = model.into();
    }

    /// Edit an image according to an instruction. `Ok(None)` means the API
    /// responded but produced no image part, which is a valid outcome.
    pub async fn edit(&self, request: &EditRequest) -> Result<Option<ImagePayload>, StudioError> {
        let body = build_edit_request(request);
        let response = self.send(&self.edit_model, &body).await?;
        Ok(unwrap_first_image(response))
    }

    /// Generate an image from a text instruction at the requested size.
    /// Same `Ok(None)` contract as `edit`.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<Option<ImagePayload>, StudioError> {
        let body = build_generate_request(request);
        let response = self.send(&self.generate_model, &body).await?;
        Ok(unwrap_first_image(response))
    }

    async fn send(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, StudioError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        tracing::debug!("Sending generateContent request to model: {}", model);
        tracing::debug!(
            "Request body: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = HTTP_CLIENT.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Response status: {}", status);
        tracing::debug!("Response body: {}", body);

        if !status.is_success() {
            let error: ApiErrorResponse =
                serde_json::from_str(&body).unwrap_or_else(|_| ApiErrorResponse {
                    error: ApiError {
                        code: status.as_u16() as i32,
                        message: body.clone(),
                        status: status.to_string(),
                    },
                });
            tracing::error!("generateContent failed ({}): {}", status, error.error.message);
            return Err(StudioError::Api {
                message: error.error.message,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| StudioError::Api {
            message: format!("Failed to parse Gemini API response: {}", e),
            source: None,
        })
    }
}

/// Scan parts in order; the first one carrying inline data wins.
pub fn first_inline_image(parts: &[Part]) -> Option<ImagePayload> {
    parts.iter().find_map(|part| {
        part.inline_data
            .as_ref()
            .map(|inline| ImagePayload::new(inline.mime_type.clone(), inline.data.clone()))
    })
}

/// Apply the unwrap rule to a full response: only the first candidate is
/// consulted. Zero candidates or no content both mean "no image produced".
fn unwrap_first_image(response: GenerateContentResponse) -> Option<ImagePayload> {
    let candidate = response.candidates.unwrap_or_default().into_iter().next()?;

    if let Some(reason) = &candidate.finish_reason {
        if reason != "STOP" && reason != "MAX_TOKENS" {
            tracing::warn!("Generation finished with reason: {}", reason);
        }
    }

    let content = candidate.content?;
    for part in &content.parts {
        if let Some(text) = &part.text {
            tracing::debug!("Response text: {}", text);
        }
    }

    first_inline_image(&content.parts)
}

fn build_edit_request(request: &EditRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::inline_data(request.image.mime_type.clone(), request.image.data.clone()),
                Part::text(request.instruction.clone()),
            ],
            role: None,
        }],
        generation_config: None,
    }
}

fn build_generate_request(request: &GenerateRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part::text(request.instruction.clone())],
            role: None,
        }],
        generation_config: Some(GenerationConfig {
            image_config: Some(ImageConfig {
                image_size: Some(request.size.as_str().to_string()),
            }),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageSize;
    use serde_json::{json, Value};

    #[test]
    fn first_inline_image_skips_leading_text() {
        let parts = vec![
            Part::text("sorry"),
            Part::inline_data("image/png", "AAAA"),
            Part::inline_data("image/jpeg", "BBBB"),
        ];

        let payload = first_inline_image(&parts).unwrap();
        assert_eq!(payload.to_data_uri(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn first_inline_image_absent_for_text_only() {
        let parts = vec![Part::text("I cannot do that")];
        assert!(first_inline_image(&parts).is_none());
        assert!(first_inline_image(&[]).is_none());
    }

    #[test]
    fn unwrap_only_consults_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "nothing here"}], "role": "model"}},
                {"content": {"parts": [{"inlineData": {"data": "AAAA", "mimeType": "image/png"}}]}}
            ]
        }))
        .unwrap();

        assert!(unwrap_first_image(response).is_none());
    }

    #[test]
    fn unwrap_handles_empty_response() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(unwrap_first_image(response).is_none());

        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(unwrap_first_image(response).is_none());
    }

    #[test]
    fn edit_request_serializes_image_first_without_config() {
        let request = EditRequest::new(
            ImagePayload::new("image/jpeg", "Zm9v"),
            "add a rainbow",
        );

        let body: Value = serde_json::to_value(build_edit_request(&request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "Zm9v");
        assert_eq!(parts[1]["text"], "add a rainbow");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn generate_request_serializes_size_hint() {
        let request = GenerateRequest::new("a lighthouse at dusk", ImageSize::TwoK);

        let body: Value = serde_json::to_value(build_generate_request(&request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "a lighthouse at dusk");
        assert!(parts.get(1).is_none());
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "2K");
    }

    #[test]
    fn response_parses_camel_case_fields() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"QUJD","mimeType":"image/webp"}}],"role":"model"},"finishReason":"STOP"}]}"#,
        )
        .unwrap();

        let payload = unwrap_first_image(response).unwrap();
        assert_eq!(payload.mime_type, "image/webp");
        assert_eq!(payload.data, "QUJD");
    }
}
