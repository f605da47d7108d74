use crate::upload::types::{FileSource, UploadResult, UploadSession};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

pub const IDENTITY_HEADER: &str = "X-User-ID";
pub const FILES_FIELD: &str = "files";

/// Sends a session's files somewhere and reports how it went.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, session: &UploadSession) -> UploadResult;
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl UploadClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One `files` part per selected file. Files on disk are streamed rather than
    /// buffered; the transport picks the boundary.
    async fn build_form(session: &UploadSession) -> Result<Form, UploadResult> {
        let mut form = Form::new();
        for entry in session.files.iter() {
            let file = entry.file();
            let part = match &file.source {
                FileSource::Memory(bytes) => Part::bytes(bytes.to_vec()),
                FileSource::Path(path) => {
                    let handle = tokio::fs::File::open(path).await.map_err(|e| {
                        UploadResult::ReadFailed {
                            name: file.name.clone(),
                            message: e.to_string(),
                        }
                    })?;
                    Part::stream_with_length(
                        Body::wrap_stream(ReaderStream::new(handle)),
                        file.size_bytes,
                    )
                }
            };
            form = form.part(FILES_FIELD, part.file_name(file.name.clone()));
        }
        Ok(form)
    }

    pub async fn send_session(&self, session: &UploadSession) -> UploadResult {
        let form = match Self::build_form(session).await {
            Ok(form) => form,
            Err(result) => {
                warn!("could not prepare upload: {:?}", result);
                return result;
            }
        };

        info!(
            "uploading {} file(s) to {}",
            session.files.len(),
            self.endpoint
        );

        let response = match self
            .http
            .post(&self.endpoint)
            .header(IDENTITY_HEADER, session.identity.as_str())
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("upload request failed: {}", e);
                return UploadResult::NetworkError(e.to_string());
            }
        };

        let status = response.status();
        let body = if matches!(
            status,
            StatusCode::CREATED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST
        ) {
            String::new()
        } else {
            response.text().await.unwrap_or_default()
        };

        let result = interpret_response(status, &body);
        match &result {
            UploadResult::Created => info!("upload accepted"),
            other => warn!("upload rejected with {}: {:?}", status, other),
        }
        result
    }
}

#[async_trait]
impl Uploader for UploadClient {
    async fn upload(&self, session: &UploadSession) -> UploadResult {
        self.send_session(session).await
    }
}

/// Maps a response to an [`UploadResult`]. Only unexpected statuses look at the body.
pub fn interpret_response(status: StatusCode, body: &str) -> UploadResult {
    match status {
        StatusCode::CREATED => UploadResult::Created,
        StatusCode::FORBIDDEN => UploadResult::Forbidden,
        StatusCode::BAD_REQUEST => UploadResult::BadRequest,
        other => {
            let detail = parse_detail(body).unwrap_or_else(|e| {
                warn!("error body is not JSON: {}", e);
                None
            });
            UploadResult::ServerError(
                detail.unwrap_or_else(|| format!("Server error: {}", other.as_u16())),
            )
        }
    }
}

fn parse_detail(body: &str) -> Result<Option<String>, serde_json::Error> {
    let parsed: ErrorBody = serde_json::from_str(body)?;
    Ok(match parsed.detail {
        Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_ignore_the_body() {
        let body = r#"{"detail": "ignored"}"#;
        assert_eq!(interpret_response(StatusCode::CREATED, body), UploadResult::Created);
        assert_eq!(interpret_response(StatusCode::FORBIDDEN, body), UploadResult::Forbidden);
        assert_eq!(interpret_response(StatusCode::BAD_REQUEST, body), UploadResult::BadRequest);
    }

    #[test]
    fn detail_is_used_verbatim() {
        assert_eq!(
            interpret_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"detail": "Storage quota exceeded"}"#
            ),
            UploadResult::ServerError("Storage quota exceeded".to_string())
        );
    }

    #[test]
    fn unusable_body_falls_back_to_status() {
        for body in ["<html>oops</html>", "", r#"{"detail": ""}"#, r#"{"detail": [1, 2]}"#, r#"{"message": "x"}"#] {
            assert_eq!(
                interpret_response(StatusCode::BAD_GATEWAY, body),
                UploadResult::ServerError("Server error: 502".to_string()),
                "body: {body}"
            );
        }
    }

    #[test]
    fn other_success_codes_are_not_created() {
        assert_eq!(
            interpret_response(StatusCode::OK, "{}"),
            UploadResult::ServerError("Server error: 200".to_string())
        );
    }
}
