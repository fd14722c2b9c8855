// src/services/analysis_client.rs
use crate::errors::{GENERIC_FAILURE_MESSAGE, StudioError};
use crate::models::{AnalysisResponse, SelectedFile};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Instant;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/analyze";

/// The remote analysis service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResponse, StudioError>;
}

pub struct HttpAnalysisClient {
    endpoint: String,
    client: Client,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResponse, StudioError> {
        let start = Instant::now();

        let content_type = if file.content_type.is_empty() {
            "application/octet-stream"
        } else {
            file.content_type.as_str()
        };
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.filename.clone())
            .mime_str(content_type)
            .map_err(|e| StudioError::Transport(format!("Invalid media type: {}", e)))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        info!(
            "Sending {} ({} bytes) to {}",
            file.filename,
            file.size(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StudioError::Transport(format!("Analysis request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StudioError::Transport(format!("Failed to read response: {}", e)))?;

        debug!(
            "Analysis replied {} after {} ms",
            status,
            start.elapsed().as_millis()
        );

        interpret_response(status, &body)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Maps an HTTP status and body onto the analysis outcome.
pub fn interpret_response(status: u16, body: &str) -> Result<AnalysisResponse, StudioError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        return Err(StudioError::Server { status, message });
    }

    let response: AnalysisResponse = serde_json::from_str(body)
        .map_err(|e| StudioError::MalformedResponse(e.to_string()))?;

    // an empty error field carries no failure
    match response.error.clone().filter(|m| !m.is_empty()) {
        Some(message) => Err(StudioError::Server { status, message }),
        None => Ok(response),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_is_decoded() {
        let response = interpret_response(
            200,
            r#"{"success":true,"image_base64":"data:image/png;base64,AA","dominant_colors":["ff0000"],"parsed_data":null,"analysis":"text"}"#,
        )
        .unwrap();
        assert_eq!(response.dominant_colors, Some(vec!["ff0000".to_string()]));
        assert_eq!(response.analysis.as_deref(), Some("text"));
    }

    #[test]
    fn server_error_message_is_kept() {
        let err = interpret_response(413, r#"{"error":"file too large"}"#).unwrap_err();
        assert!(matches!(
            &err,
            StudioError::Server { status: 413, message } if message == "file too large"
        ));
    }

    #[test]
    fn error_without_message_is_generic() {
        let err = interpret_response(500, "<html>Internal Server Error</html>").unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = interpret_response(502, r#"{"detail":"bad gateway"}"#).unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn error_field_on_success_status_fails() {
        let err = interpret_response(200, r#"{"error":"Analysis error: quota"}"#).unwrap_err();
        assert_eq!(err.user_message(), "Analysis error: quota");
    }

    #[test]
    fn malformed_success_body() {
        let err = interpret_response(200, "not json").unwrap_err();
        assert!(matches!(err, StudioError::MalformedResponse(_)));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn empty_error_field_on_success_is_ignored() {
        let response =
            interpret_response(200, r#"{"error":"","image_base64":"data:image/png;base64,AA"}"#)
                .unwrap();
        assert_eq!(response.image_base64, "data:image/png;base64,AA");
    }

    #[test]
    fn mistyped_model_output_still_renders() {
        let response = interpret_response(
            200,
            r##"{"parsed_data":{"dominant_colors":["#FF0000"],"color_harmony":{"primary":"sage"},"wall_colors":[{"hex":"#A3B18A","reason":["calm"]}]}}"##,
        )
        .unwrap();

        let parsed = response.parsed_data.as_ref().unwrap();
        assert_eq!(parsed.color_harmony.as_deref(), Some(r#"{"primary":"sage"}"#));
        assert_eq!(response.effective_colors()[0].hex, "#000000");
    }
}
