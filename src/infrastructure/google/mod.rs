//! Google service account auth and the Indexing API client.
//!
//! # Modules
//!
//! - [`key`] - Service account key material and loading
//! - [`auth`] - JWT bearer token exchange with caching
//! - [`indexing`] - The publish call implementing [`crate::domain::notifier::UrlNotifier`]

pub mod auth;
pub mod indexing;
pub mod key;

pub use auth::{AuthError, ServiceAccountAuth};
pub use indexing::{IndexingApiClient, PUBLISH_ENDPOINT};
pub use key::{KeyError, ServiceAccountKey};
