//! HTTP retrieval and recursive traversal of sitemap trees.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::parser::{ParseError, SitemapDocument, parse_sitemap};

/// Errors produced while enumerating a sitemap tree.
///
/// Enumeration is all-or-nothing: any fetch or parse failure below the root
/// aborts the walk so callers never act on a partial URL list.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// The document could not be retrieved (transport error or error status).
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The document was retrieved but is not usable sitemap XML.
    #[error("failed to parse {url}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    /// An index chain nested deeper than the configured cap.
    #[error("sitemap nesting exceeded {max_depth} documents at {url}")]
    DepthExceeded { url: String, max_depth: usize },
}

/// Fetches sitemap documents and walks index references recursively.
///
/// Index entries are followed depth-first in document order, so the returned
/// URL list matches the order a human reading the sitemaps would see. A
/// visited set drops documents already seen (self-references, sibling
/// cross-links) without error, and a depth cap bounds runaway chains.
pub struct SitemapCrawler {
    http: reqwest::Client,
    max_depth: usize,
}

impl SitemapCrawler {
    /// Creates a crawler over an existing HTTP client.
    ///
    /// `max_depth` is the longest accepted chain of sitemap documents,
    /// root included; it is clamped to at least 1 so the root itself is
    /// always reachable.
    pub fn new(http: reqwest::Client, max_depth: usize) -> Self {
        Self {
            http,
            max_depth: max_depth.max(1),
        }
    }

    /// Enumerates every page URL reachable from the sitemap at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::Fetch`] or [`SitemapError::Parse`] for the
    /// first document that fails, and [`SitemapError::DepthExceeded`] when
    /// an index chain outgrows the cap.
    pub async fn enumerate(&self, url: &str) -> Result<Vec<String>, SitemapError> {
        info!(url, "enumerating sitemap tree");
        let mut visited = HashSet::new();
        let mut urls = Vec::new();
        self.walk(url, 0, &mut visited, &mut urls).await?;
        Ok(urls)
    }

    /// Enumerates a domain's sitemap tree starting from the conventional
    /// `sitemap_index.xml` location.
    ///
    /// The `https` root is attempted first; when that whole attempt fails,
    /// for any reason, the enumeration is retried once over plain `http`.
    ///
    /// # Errors
    ///
    /// When both attempts fail, the `https` error is returned since that is
    /// the canonical endpoint.
    pub async fn enumerate_domain(&self, domain: &str) -> Result<Vec<String>, SitemapError> {
        let secure = format!("https://{domain}/sitemap_index.xml");
        let first_err = match self.enumerate(&secure).await {
            Ok(urls) => return Ok(urls),
            Err(err) => err,
        };

        let plain = format!("http://{domain}/sitemap_index.xml");
        warn!(url = %secure, error = %first_err, "secure sitemap attempt failed, trying http");
        match self.enumerate(&plain).await {
            Ok(urls) => Ok(urls),
            Err(second_err) => {
                warn!(url = %plain, error = %second_err, "http sitemap attempt failed too");
                Err(first_err)
            }
        }
    }

    async fn walk(
        &self,
        url: &str,
        depth: usize,
        visited: &mut HashSet<String>,
        urls: &mut Vec<String>,
    ) -> Result<(), SitemapError> {
        if !visited.insert(url.to_string()) {
            debug!(url, "sitemap already visited, skipping");
            return Ok(());
        }
        if depth >= self.max_depth {
            return Err(SitemapError::DepthExceeded {
                url: url.to_string(),
                max_depth: self.max_depth,
            });
        }

        let body = self.fetch(url).await?;
        let document = parse_sitemap(&body).map_err(|source| SitemapError::Parse {
            url: url.to_string(),
            source,
        })?;

        match document {
            SitemapDocument::UrlSet(locs) => {
                debug!(url, count = locs.len(), "collected page URLs");
                urls.extend(locs);
            }
            SitemapDocument::Index(children) => {
                debug!(url, count = children.len(), "descending into sitemap index");
                for child in children {
                    Box::pin(self.walk(&child, depth + 1, visited, urls)).await?;
                }
            }
            SitemapDocument::Other => {
                warn!(url, "unrecognized root element, document contributes no URLs");
            }
        }
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<String, SitemapError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| SitemapError::Fetch {
                url: url.to_string(),
                source,
            })?;

        response.text().await.map_err(|source| SitemapError::Fetch {
            url: url.to_string(),
            source,
        })
    }
}
