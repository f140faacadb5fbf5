//! Streaming parser for sitemap and sitemap-index XML documents.
//!
//! Handles both document kinds from <https://www.sitemaps.org/protocol.html>:
//! `<urlset>` with `<url><loc>` entries and `<sitemapindex>` with
//! `<sitemap><loc>` entries. Namespace prefixes are ignored by matching on
//! local names, but nesting depth is enforced so extension elements such as
//! `<image:loc>` are never mistaken for page URLs.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// A parsed sitemap document.
///
/// `loc` values keep document order and are trimmed; empty entries are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of further sitemap documents.
    Index(Vec<String>),
    /// `<urlset>`: locations of site pages.
    UrlSet(Vec<String>),
    /// Well-formed XML whose root is neither of the above.
    Other,
}

impl SitemapDocument {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Index(_) => "sitemap index",
            Self::UrlSet(_) => "url set",
            Self::Other => "unrecognized",
        }
    }
}

/// Errors produced while parsing sitemap XML.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The reader hit invalid XML.
    #[error("malformed XML near byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// The document ended without any root element, e.g. an HTML error page
    /// served as an empty body or plain text.
    #[error("document has no root element")]
    NoRoot,
}

#[derive(Clone, Copy, PartialEq)]
enum RootKind {
    Index,
    UrlSet,
    Other,
}

impl RootKind {
    /// Element that directly wraps `<loc>` for this document kind.
    fn entry_element(self) -> Option<&'static str> {
        match self {
            Self::Index => Some("sitemap"),
            Self::UrlSet => Some("url"),
            Self::Other => None,
        }
    }

    fn classify(root_name: &str) -> Self {
        match root_name {
            "sitemapindex" => Self::Index,
            "urlset" => Self::UrlSet,
            _ => Self::Other,
        }
    }
}

/// Parses one sitemap document out of `xml`.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] for invalid XML and
/// [`ParseError::NoRoot`] when the input contains no element at all. A
/// well-formed document with an unexpected root parses to
/// [`SitemapDocument::Other`] rather than an error, so callers can treat it
/// as an empty contribution.
///
/// # Examples
///
/// ```
/// use index_bot::infrastructure::sitemap::{SitemapDocument, parse_sitemap};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///     <url><loc>https://example.com/about</loc></url>
/// </urlset>"#;
///
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(
///     doc,
///     SitemapDocument::UrlSet(vec!["https://example.com/about".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<RootKind> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut locs: Vec<String> = Vec::new();
    let mut current_loc: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            ParseError::Malformed {
                position: reader.buffer_position(),
                message: err.to_string(),
            }
        })?;

        match event {
            Event::Start(ref e) => {
                let name = local_name(e.name().local_name().as_ref());
                match root {
                    None => root = Some(RootKind::classify(&name)),
                    Some(kind) => {
                        // Only [root, entry, loc] paths carry page URLs;
                        // deeper `loc` elements belong to extensions.
                        if name == "loc"
                            && stack.len() == 2
                            && kind.entry_element() == Some(stack[1].as_str())
                        {
                            current_loc = Some(String::new());
                        }
                    }
                }
                stack.push(name);
            }
            Event::Empty(ref e) => {
                if root.is_none() {
                    let name = local_name(e.name().local_name().as_ref());
                    root = Some(RootKind::classify(&name));
                }
            }
            Event::Text(ref e) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = e.unescape().map_err(|err| ParseError::Malformed {
                        position: reader.buffer_position(),
                        message: err.to_string(),
                    })?;
                    loc.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => {
                let name = local_name(e.name().local_name().as_ref());
                stack.pop();
                if name == "loc" {
                    if let Some(loc) = current_loc.take() {
                        let trimmed = loc.trim();
                        if !trimmed.is_empty() {
                            locs.push(trimmed.to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match root {
        Some(RootKind::Index) => Ok(SitemapDocument::Index(locs)),
        Some(RootKind::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        Some(RootKind::Other) => Ok(SitemapDocument::Other),
        None => Err(ParseError::NoRoot),
    }
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset_keeps_document_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>https://example.com/</loc><priority>1.0</priority></url>
            <url><loc>https://example.com/about</loc></url>
            <url><loc>https://example.com/blog/post-1</loc></url>
        </urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![
                "https://example.com/".to_string(),
                "https://example.com/about".to_string(),
                "https://example.com/blog/post-1".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_sitemap_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sitemap>
                <loc>https://example.com/post-sitemap.xml</loc>
                <lastmod>2025-05-01T10:00:00+00:00</lastmod>
            </sitemap>
            <sitemap><loc>https://example.com/page-sitemap.xml</loc></sitemap>
        </sitemapindex>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::Index(vec![
                "https://example.com/post-sitemap.xml".to_string(),
                "https://example.com/page-sitemap.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_namespace_prefix_is_ignored() {
        let xml = r#"<ns0:urlset xmlns:ns0="http://www.sitemaps.org/schemas/sitemap/0.9">
            <ns0:url><ns0:loc>https://example.com/page</ns0:loc></ns0:url>
        </ns0:urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/page".to_string()])
        );
    }

    #[test]
    fn test_image_loc_extension_is_excluded() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
                             xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
            <url>
                <loc>https://example.com/gallery</loc>
                <image:image>
                    <image:loc>https://example.com/img/cat.jpg</image:loc>
                </image:image>
            </url>
        </urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/gallery".to_string()])
        );
    }

    #[test]
    fn test_loc_in_cdata_and_entities() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc><![CDATA[https://example.com/?a=1&b=2]]></loc></url>
            <url><loc>https://example.com/?a=1&amp;b=2</loc></url>
        </urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![
                "https://example.com/?a=1&b=2".to_string(),
                "https://example.com/?a=1&b=2".to_string(),
            ])
        );
    }

    #[test]
    fn test_loc_whitespace_is_trimmed() {
        let xml = "<urlset><url><loc>\n            https://example.com/padded\n        </loc></url></urlset>";

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/padded".to_string()])
        );
    }

    #[test]
    fn test_empty_and_missing_locs_are_dropped() {
        let xml = r#"<urlset>
            <url><loc></loc></url>
            <url><loc/></url>
            <url><priority>0.5</priority></url>
            <url><loc>https://example.com/kept</loc></url>
        </urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/kept".to_string()])
        );
    }

    #[test]
    fn test_loc_outside_entry_is_ignored() {
        let xml = r#"<urlset>
            <loc>https://example.com/stray</loc>
            <url><loc>https://example.com/real</loc></url>
        </urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/real".to_string()])
        );
    }

    #[test]
    fn test_empty_urlset_parses_to_empty_list() {
        let doc = parse_sitemap(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"/>"#)
            .unwrap();
        assert_eq!(doc, SitemapDocument::UrlSet(Vec::new()));
    }

    #[test]
    fn test_unknown_root_is_other() {
        let doc = parse_sitemap("<html><body>Not Found</body></html>").unwrap();
        assert_eq!(doc, SitemapDocument::Other);
    }

    #[test]
    fn test_plain_text_has_no_root() {
        assert_eq!(parse_sitemap("404 page not found"), Err(ParseError::NoRoot));
    }

    #[test]
    fn test_empty_input_has_no_root() {
        assert_eq!(parse_sitemap(""), Err(ParseError::NoRoot));
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let err = parse_sitemap("<urlset><url><loc>https://example.com/x</url></urlset>")
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let err = parse_sitemap("<urlset><url><loc>https://example.com/x").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }
}
