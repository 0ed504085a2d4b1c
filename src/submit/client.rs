//! HTTP client posting the form as multipart/form-data

use super::payload::{Payload, PayloadValue};
use super::traits::{SubmissionError, Submitter};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Submits the form to a configured URL
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpSubmitter {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    async fn build_form(payload: Payload) -> Result<Form, SubmissionError> {
        let mut form = Form::new();
        for (name, value) in payload.into_entries() {
            form = match value {
                PayloadValue::Text(text) => form.text(name, text),
                PayloadValue::File(file) => {
                    let bytes = tokio::fs::read(&file.path).await?;
                    let part = Part::bytes(bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.mime)
                        .map_err(|e| SubmissionError::Transport(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, payload: Payload) -> Result<(), SubmissionError> {
        let endpoint = self.endpoint.as_deref().ok_or(SubmissionError::NoEndpoint)?;
        let entries = payload.len();
        let form = Self::build_form(payload).await?;

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::Transport("request timed out".to_string())
                } else {
                    SubmissionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Submitted {entries} entries to {endpoint} ({status})");
            Ok(())
        } else {
            Err(SubmissionError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::fill_valid;
    use crate::state::{AttachedFile, FormSession};
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// One-shot HTTP server answering with `status`; yields the raw request
    async fn serve_once(status: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/submit", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.ends_with(b"--\r\n") || request.ends_with(b"\r\n0\r\n\r\n") {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (url, rx)
    }

    fn payload() -> Payload {
        let mut session = FormSession::default();
        fill_valid(&mut session);
        Payload::from_session(&session, Utc::now())
    }

    #[test]
    fn test_no_endpoint_fails_without_network() {
        let submitter = HttpSubmitter::new(None, TIMEOUT).unwrap();
        let result = tokio_test::block_on(submitter.submit(payload()));
        assert!(matches!(result, Err(SubmissionError::NoEndpoint)));
    }

    #[tokio::test]
    async fn test_2xx_is_success_and_body_is_multipart() {
        let (url, request) = serve_once("200 OK").await;
        let submitter = HttpSubmitter::new(Some(url), TIMEOUT).unwrap();

        submitter.submit(payload()).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /submit"));
        assert!(request.to_ascii_lowercase().contains("multipart/form-data"));
        assert!(request.contains("name=\"email\""));
        assert!(request.contains("jane@example.com"));
        assert!(request.contains("name=\"submission_date\""));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let (url, _request) = serve_once("500 Internal Server Error").await;
        let submitter = HttpSubmitter::new(Some(url), TIMEOUT).unwrap();

        let result = submitter.submit(payload()).await;
        assert!(matches!(result, Err(SubmissionError::Status(500))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/submit", listener.local_addr().unwrap());
        drop(listener);

        let submitter = HttpSubmitter::new(Some(url), TIMEOUT).unwrap();
        let result = submitter.submit(payload()).await;
        assert!(matches!(result, Err(SubmissionError::Transport(_))));
    }

    #[tokio::test]
    async fn test_file_part_carries_name_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let mut session = FormSession::default();
        fill_valid(&mut session);
        session.attach_file(
            "company_logo",
            AttachedFile {
                path,
                file_name: "logo.png".to_string(),
                mime: "image/png".to_string(),
                size: 9,
            },
        );

        let (url, request) = serve_once("201 Created").await;
        let submitter = HttpSubmitter::new(Some(url), TIMEOUT).unwrap();
        submitter
            .submit(Payload::from_session(&session, Utc::now()))
            .await
            .unwrap();

        let request = request.await.unwrap();
        assert!(request.contains("name=\"company_logo\"; filename=\"logo.png\""));
        assert!(request.contains("image/png"));
        assert!(request.contains("png-bytes"));
    }

    #[tokio::test]
    async fn test_missing_attachment_is_reported() {
        let mut session = FormSession::default();
        session.attach_file(
            "company_logo",
            AttachedFile {
                path: "/no/such/logo.png".into(),
                file_name: "logo.png".to_string(),
                mime: "image/png".to_string(),
                size: 1,
            },
        );
        let submitter =
            HttpSubmitter::new(Some("http://127.0.0.1:9/".to_string()), TIMEOUT).unwrap();
        let result = submitter
            .submit(Payload::from_session(&session, Utc::now()))
            .await;
        assert!(matches!(result, Err(SubmissionError::Attachment(_))));
    }
}
