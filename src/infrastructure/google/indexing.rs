//! Google Indexing API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::notifier::{SubmissionError, UrlNotifier};

use super::auth::ServiceAccountAuth;

/// Production publish endpoint.
pub const PUBLISH_ENDPOINT: &str = "https://indexing.googleapis.com/v3/urlNotifications:publish";

const URL_UPDATED: &str = "URL_UPDATED";

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    notification_type: &'a str,
}

/// Publish response, reduced to the part that decides success.
///
/// Successful calls return `urlNotificationMetadata`; failed calls carry an
/// `error` object even when the HTTP status is misleading, so the body is
/// what gets inspected.
#[derive(Debug, Deserialize)]
struct PublishResponse {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

/// [`UrlNotifier`] backed by the Google Indexing API.
///
/// One client wraps one service account; quota enforcement stays with the
/// owning [`crate::domain::entities::Channel`].
pub struct IndexingApiClient {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    endpoint: String,
}

impl IndexingApiClient {
    pub fn new(http: reqwest::Client, auth: ServiceAccountAuth) -> Self {
        Self::with_endpoint(http, auth, PUBLISH_ENDPOINT)
    }

    /// Points the client at a non-default endpoint, for tests.
    pub fn with_endpoint(
        http: reqwest::Client,
        auth: ServiceAccountAuth,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth,
            endpoint: endpoint.into(),
        }
    }

    pub fn client_email(&self) -> &str {
        self.auth.client_email()
    }
}

#[async_trait]
impl UrlNotifier for IndexingApiClient {
    async fn publish(&self, url: &str) -> Result<(), SubmissionError> {
        let token = self
            .auth
            .access_token()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&PublishRequest {
                url,
                notification_type: URL_UPDATED,
            })
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        match serde_json::from_str::<PublishResponse>(&body) {
            Ok(PublishResponse {
                error: Some(api_error),
            }) => Err(SubmissionError::Service {
                code: api_error.code.or(Some(status.as_u16())),
                message: api_error
                    .message
                    .or(api_error.status)
                    .unwrap_or_else(|| "unspecified error".to_string()),
            }),
            _ if status.is_success() => {
                debug!(url, "url notification accepted");
                Ok(())
            }
            // Error status without the usual error envelope.
            _ => Err(SubmissionError::Service {
                code: Some(status.as_u16()),
                message: truncate_body(&body),
            }),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    if trimmed.len() <= MAX {
        return trimmed.to_string();
    }
    let cut = trimmed
        .char_indices()
        .take_while(|(i, _)| *i < MAX)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    format!("{}...", &trimmed[..cut])
}
