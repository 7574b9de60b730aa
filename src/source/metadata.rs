//! Landing page metadata: page count and authenticity token

use crate::error::{Error, Result};
use crate::source::SessionClient;
use scraper::{Html, Selector};

const TOKEN_SELECTOR: &str = r#"input[name="authenticity_token"]"#;
const THUMB_SELECTOR: &str = ".document-thumb-container";
const PAGE_NUM_ATTR: &str = "data-page-num";

/// Metadata scraped from a document's landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Total number of pages
    pub page_count: u32,
    /// Anti-forgery token; absent when the document needs no authorization
    pub auth_token: Option<String>,
}

/// Fetch the landing page and read the page count and token from it.
pub async fn fetch_meta(session: &SessionClient, base_url: &str) -> Result<DocumentMeta> {
    let body = session.get_text(base_url).await?;
    let meta = parse_meta(&body)?;
    tracing::debug!(
        url = base_url,
        pages = meta.page_count,
        token = meta.auth_token.is_some(),
        "Fetched document metadata"
    );
    Ok(meta)
}

/// Parse landing page markup.
///
/// The page count comes from the last thumbnail marker. A missing token is
/// valid; a missing or non-numeric page marker is not.
pub fn parse_meta(html: &str) -> Result<DocumentMeta> {
    let document = Html::parse_document(html);
    let token_selector = selector(TOKEN_SELECTOR)?;
    let thumb_selector = selector(THUMB_SELECTOR)?;

    let auth_token = document
        .select(&token_selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string);

    let last_thumb = document
        .select(&thumb_selector)
        .last()
        .ok_or_else(|| Error::parse("page thumbnail marker not found"))?;

    let raw = last_thumb
        .value()
        .attr(PAGE_NUM_ATTR)
        .ok_or_else(|| Error::parse(format!("last thumbnail has no {} attribute", PAGE_NUM_ATTR)))?;

    let page_count = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| Error::parse(format!("invalid page number {:?}: {}", raw, e)))?;

    Ok(DocumentMeta {
        page_count,
        auth_token,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::parse(format!("invalid selector {}: {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn landing_page(token: Option<&str>, pages: &[&str]) -> String {
        let token_input = token
            .map(|t| {
                format!(
                    r#"<form><input type="hidden" name="authenticity_token" value="{}"></form>"#,
                    t
                )
            })
            .unwrap_or_default();
        let thumbs: String = pages
            .iter()
            .map(|p| format!(r#"<div class="document-thumb-container" data-page-num="{}"></div>"#, p))
            .collect();
        format!("<html><body>{}{}</body></html>", token_input, thumbs)
    }

    #[test]
    fn test_parse_meta_with_token() {
        let html = landing_page(Some("tok123"), &["1", "2", "3"]);
        let meta = parse_meta(&html).unwrap();
        assert_eq!(
            meta,
            DocumentMeta {
                page_count: 3,
                auth_token: Some("tok123".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_meta_without_token() {
        let html = landing_page(None, &["1", "2"]);
        let meta = parse_meta(&html).unwrap();
        assert_eq!(meta.page_count, 2);
        assert_eq!(meta.auth_token, None);
    }

    #[test]
    fn test_parse_meta_uses_last_marker() {
        // Markers out of order: the last one wins, not the maximum
        let html = landing_page(None, &["1", "12", "7"]);
        assert_eq!(parse_meta(&html).unwrap().page_count, 7);
    }

    #[test]
    fn test_parse_meta_missing_marker() {
        let html = landing_page(Some("tok"), &[]);
        let err = parse_meta(&html).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_meta_non_numeric_page() {
        let html = landing_page(None, &["1", "last"]);
        assert!(matches!(parse_meta(&html), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_parse_meta_is_repeatable() {
        let html = landing_page(Some("t"), &["1", "2", "3", "4"]);
        assert_eq!(parse_meta(&html).unwrap(), parse_meta(&html).unwrap());
    }
}
