//! Document identity and fetched metadata

use crate::source::metadata::DocumentMeta;

/// Extract the document id from a free-form identifier or URL.
///
/// Only the segment after the last `/` is kept, so
/// `https://docsend.com/view/abc123` and `abc123` both yield `abc123`.
pub fn parse_document_id(identifier: &str) -> &str {
    let trimmed = identifier.trim();
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// View URL of a document on the given host.
pub fn view_url(host: &str, id: &str) -> String {
    format!("{}/view/{}", host.trim_end_matches('/'), id)
}

/// A remote document whose metadata has been resolved.
///
/// Built once per run; the page count stays fixed from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    base_url: String,
    page_count: u32,
    auth_token: Option<String>,
}

impl Document {
    pub fn new(host: &str, identifier: &str, meta: DocumentMeta) -> Self {
        let id = parse_document_id(identifier).to_string();
        Self {
            base_url: view_url(host, &id),
            id,
            page_count: meta.page_count,
            auth_token: meta.auth_token,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc123", "abc123")]
    #[case("https://docsend.com/view/abc123", "abc123")]
    #[case("docsend.com/view/s/abc123", "abc123")]
    #[case("  abc123  ", "abc123")]
    #[case("https://docsend.com/view/", "")]
    fn test_parse_document_id(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_document_id(input), expected);
    }

    #[test]
    fn test_view_url() {
        assert_eq!(
            view_url("https://docsend.com", "abc123"),
            "https://docsend.com/view/abc123"
        );
        assert_eq!(
            view_url("http://127.0.0.1:4000/", "abc123"),
            "http://127.0.0.1:4000/view/abc123"
        );
    }

    #[test]
    fn test_document_from_url_identifier() {
        let doc = Document::new(
            "https://docsend.com",
            "https://docsend.com/view/abc123",
            DocumentMeta {
                page_count: 2,
                auth_token: Some("tok".to_string()),
            },
        );
        assert_eq!(doc.id(), "abc123");
        assert_eq!(doc.base_url(), "https://docsend.com/view/abc123");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.auth_token(), Some("tok"));
    }
}
