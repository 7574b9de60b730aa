//! Network side of the pipeline: session, metadata, authorization and page fetch

pub mod auth;
pub mod document;
pub mod metadata;
pub mod pages;
pub mod session;

pub use auth::{authorize, Credentials};
pub use document::{parse_document_id, view_url, Document};
pub use metadata::{fetch_meta, parse_meta, DocumentMeta};
pub use pages::{fetch_page, fetch_pages, LinkAnnotation, PageData, PageResult};
pub use session::SessionClient;
