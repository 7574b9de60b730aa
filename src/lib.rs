//! DocSend downloader library
//!
//! Mirrors an access-gated, paginated DocSend document:
//! - `source`: session, landing page metadata, authorization, concurrent page fetch
//! - `pdf`: image flattening, link mapping, PDF / image directory output
//! - `downloader`: the end-to-end pipeline

pub mod config;
pub mod downloader;
pub mod error;
pub mod pdf;
pub mod source;

pub use config::DownloadConfig;
pub use downloader::{Downloader, FetchedDocument, OutputFormat};
pub use error::{Error, Result};
pub use source::Credentials;
