//! Infrastructure layer for external integrations.
//!
//! Implements the ports defined by the domain layer against real services.
//!
//! # Modules
//!
//! - [`sitemap`] - Sitemap fetching and XML parsing
//! - [`google`] - Service account auth and the Indexing API
//! - [`telegram`] - Bot API client and update polling

pub mod google;
pub mod sitemap;
pub mod telegram;
