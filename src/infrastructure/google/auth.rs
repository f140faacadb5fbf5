//! OAuth 2.0 service account flow (JWT bearer grant).
//!
//! Google service accounts authenticate by signing a short-lived JWT with
//! their RSA key and exchanging it for an access token at the account's
//! token endpoint. Tokens are cached per account and refreshed shortly
//! before expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use super::key::ServiceAccountKey;

/// OAuth scope granting access to the Indexing API.
const INDEXING_SCOPE: &str = "https://www.googleapis.com/auth/indexing";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Requested assertion lifetime; Google caps it at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they would expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Errors produced while obtaining an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("service account private key for {client_email} is not usable")]
    InvalidKey {
        client_email: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("failed to sign token assertion")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("token exchange with {uri} failed")]
    Exchange {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Produces and caches access tokens for one service account.
pub struct ServiceAccountAuth {
    http: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Builds an authenticator, parsing the PEM key eagerly so a broken
    /// credential fails at startup rather than on the first submission.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKey`] when `private_key` is not a valid
    /// RSA PEM.
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(
            |source| AuthError::InvalidKey {
                client_email: key.client_email.clone(),
                source,
            },
        )?;
        Ok(Self {
            http,
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Returns a valid access token, exchanging a fresh assertion when the
    /// cached one is missing or within [`EXPIRY_MARGIN_SECS`] of expiry.
    ///
    /// Concurrent callers share one refresh: the cache lock is held across
    /// the exchange so the token endpoint sees a single request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Sign`] when the assertion cannot be signed and
    /// [`AuthError::Exchange`] when the token endpoint call fails.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            let deadline = token.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS);
            if Utc::now() < deadline {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.exchange().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn exchange(&self) -> Result<CachedToken, AuthError> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: INDEXING_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let assertion = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(AuthError::Sign)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| AuthError::Exchange {
                uri: self.key.token_uri.clone(),
                source,
            })?;

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|source| AuthError::Exchange {
                    uri: self.key.token_uri.clone(),
                    source,
                })?;

        debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "obtained access token"
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
