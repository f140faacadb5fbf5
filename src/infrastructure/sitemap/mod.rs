//! Sitemap retrieval and parsing.
//!
//! [`parser`] turns one XML document into typed entries; [`client`] fetches
//! documents over HTTP and follows sitemap-index references recursively.

pub mod client;
pub mod parser;

pub use client::{SitemapCrawler, SitemapError};
pub use parser::{ParseError, SitemapDocument, parse_sitemap};
