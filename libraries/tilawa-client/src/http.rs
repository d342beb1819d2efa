//! Shared HTTP plumbing for the upstream clients.

use crate::error::{ClientError, Result};
use crate::types::ErrorResponse;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the HTTP client used by every upstream
pub(crate) fn build_http() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("Tilawa/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::Request)
}

/// Validate a base URL and strip its trailing slash
pub(crate) fn normalize_url(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }
    let url = url.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Ok(url)
}

/// Send a request, separating unreachable upstreams from other failures
pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ClientError::ServerUnreachable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    })
}

/// Decode a successful response body, or turn the response into an error
pub(crate) async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(status, response).await);
    }
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

async fn error_from_response(status: StatusCode, response: Response) -> ClientError {
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    if status == StatusCode::TOO_MANY_REQUESTS {
        ClientError::RateLimited(message)
    } else {
        ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(normalize_url("https://example.com").is_ok());
        assert!(normalize_url("http://localhost:3001").is_ok());

        assert!(normalize_url("").is_err());
        assert!(normalize_url("not-a-url").is_err());
        assert!(normalize_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_url_normalization() {
        assert_eq!(
            normalize_url("https://example.com/").unwrap(),
            "https://example.com"
        );
    }
}
