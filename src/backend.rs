//! HTTP client for the shift/user backend.

use anyhow::{Context, Result, bail};
use reqwest::{Client, Url, header::ACCEPT};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::GatewayError;

/// Status and best-effort JSON body of a backend reply.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field of an error body, if the backend sent one.
    pub fn message(&self) -> Option<String> {
        match self.body.as_ref()?.get("message")? {
            Value::String(message) => Some(message.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Human-readable reason for a failed request.
    pub fn error_message(&self) -> String {
        match &self.body {
            Some(Value::Object(body)) if body.contains_key("message") => {
                self.message().unwrap_or_else(|| "Request failed".to_string())
            }
            _ => format!("Request failed with status {}", self.status),
        }
    }

    /// The body on success, a [`GatewayError::Backend`] otherwise.
    pub fn into_result(self) -> Result<Value, GatewayError> {
        if self.is_success() {
            Ok(self.body.unwrap_or(Value::Null))
        } else {
            Err(GatewayError::Backend {
                status: self.status,
                message: self.error_message(),
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid backend url `{base_url}`"))?;
        if base_url.cannot_be_a_base() {
            bail!("backend url `{base_url}` cannot carry a path");
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Base URL joined with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get_json(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<BackendResponse, reqwest::Error> {
        let mut url = self.endpoint(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!(%url, "GET backend");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_response(response).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &T,
    ) -> Result<BackendResponse, reqwest::Error> {
        let url = self.endpoint(segments);

        debug!(%url, "POST backend");
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<BackendResponse, reqwest::Error> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;

    Ok(BackendResponse {
        status,
        body: serde_json::from_slice(&bytes).ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Option<Value>) -> BackendResponse {
        BackendResponse { status, body }
    }

    #[test]
    fn error_message_prefers_backend_message() {
        let reply = response(404, Some(json!({"message": "no such user"})));
        assert_eq!(reply.error_message(), "no such user");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            response(500, None).error_message(),
            "Request failed with status 500"
        );
        assert_eq!(
            response(502, Some(json!(["not", "an", "object"]))).error_message(),
            "Request failed with status 502"
        );
    }

    #[test]
    fn null_message_becomes_generic() {
        let reply = response(400, Some(json!({"message": null})));
        assert_eq!(reply.error_message(), "Request failed");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let client = BackendClient::new("http://localhost:8080/").unwrap();
        let url = client.endpoint(&["shifts", "山田 太郎"]);

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/shifts/%E5%B1%B1%E7%94%B0%20%E5%A4%AA%E9%83%8E"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(BackendClient::new("mailto:ops@example.com").is_err());
        assert!(BackendClient::new("not a url").is_err());
    }

    #[test]
    fn into_result_keeps_status() {
        let err = response(409, Some(json!({"message": "duplicate"})))
            .into_result()
            .unwrap_err();

        match err {
            GatewayError::Backend { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
