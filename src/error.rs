//! Error types for the DocSend downloader

use thiserror::Error;

/// Result type alias for the DocSend downloader
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the DocSend downloader
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (DNS, TLS, connection reset, body read)
    #[error("Network error while requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Expected structure missing or malformed (landing page markup, page JSON)
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// Image bytes could not be decoded
    #[error("Failed to decode image for page {page}: {source}")]
    ImageDecode {
        page: u32,
        #[source]
        source: image::ImageError,
    },

    /// Page image could not be encoded to disk
    #[error("Failed to write image {path}: {source}")]
    ImageEncode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Failure raised while fetching a single page
    #[error("Page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    /// Download too large
    #[error("Download too large: {size} bytes from {url} (max: {max_size} bytes)")]
    DownloadTooLarge {
        url: String,
        size: u64,
        max_size: u64,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF serialization error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// A page task panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse {
            reason: reason.into(),
        }
    }

    /// Wrap an error with the page it was raised for.
    pub(crate) fn at_page(self, page: u32) -> Self {
        match self {
            already @ Error::Page { .. } => already,
            other => Error::Page {
                page,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through `Page` wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Page { source, .. } => source.root(),
            other => other,
        }
    }

    /// Page number the error was raised for, if any.
    pub fn page(&self) -> Option<u32> {
        match self {
            Error::Page { page, .. } | Error::ImageDecode { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// HTTP status of the root cause, if it was a non-success response.
    pub fn http_status(&self) -> Option<u16> {
        match self.root() {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_http_status(&self) -> bool {
        self.http_status().is_some()
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.root(), Error::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wrapper_exposes_root() {
        let err = Error::HttpStatus {
            url: "https://docsend.com/img".to_string(),
            status: 500,
        }
        .at_page(2);

        assert_eq!(err.page(), Some(2));
        assert_eq!(err.http_status(), Some(500));
        assert!(err.is_http_status());
        assert!(!err.is_parse());
        assert_eq!(err.to_string(), "Page 2: HTTP 500 from https://docsend.com/img");
    }

    #[test]
    fn test_at_page_does_not_double_wrap() {
        let err = Error::parse("bad json").at_page(3).at_page(7);
        assert_eq!(err.page(), Some(3));
        assert!(err.is_parse());
    }

    #[test]
    fn test_unwrapped_error_has_no_page() {
        let err = Error::parse("missing marker");
        assert_eq!(err.page(), None);
        assert_eq!(err.http_status(), None);
    }
}
