//! End-to-end download pipeline
//!
//! metadata -> (authorization) -> concurrent page fetch -> normalize + map
//! links -> PDF or image directory. Each run gets a fresh session.

use crate::config::DownloadConfig;
use crate::error::Result;
use crate::pdf::{render_page, write_images, write_pdf, RenderedPage};
use crate::source::{
    authorize, fetch_meta, fetch_pages, parse_document_id, view_url, Credentials, Document,
    SessionClient,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output mode of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Single PDF with clickable links
    #[default]
    Pdf,
    /// Directory of numbered PNG files, no links
    Images,
}

impl OutputFormat {
    /// Default output path for a document id.
    pub fn default_output(self, id: &str) -> PathBuf {
        match self {
            OutputFormat::Pdf => PathBuf::from(format!("{}.pdf", id)),
            OutputFormat::Images => PathBuf::from(id),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "png" | "images" => Ok(OutputFormat::Images),
            other => Err(format!("unknown format {:?} (expected pdf or png)", other)),
        }
    }
}

/// A fetched document, ready to be written
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub document: Document,
    pub pages: Vec<RenderedPage>,
}

/// Downloads documents according to a [`DownloadConfig`]
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    config: DownloadConfig,
}

impl Downloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Fetch every page of a document and render it in memory.
    ///
    /// Fails without returning any page if metadata, authorization, or any
    /// single page fails.
    pub async fn fetch(
        &self,
        identifier: &str,
        credentials: Option<&Credentials>,
    ) -> Result<FetchedDocument> {
        let session = SessionClient::new(&self.config)?;
        let id = parse_document_id(identifier);
        let base_url = view_url(self.config.host(), id);

        let meta = fetch_meta(&session, &base_url).await?;
        let document = Document::new(self.config.host(), identifier, meta);
        tracing::info!(
            id = document.id(),
            pages = document.page_count(),
            "Resolved document"
        );

        if let Some(credentials) = credentials {
            authorize(&session, document.base_url(), document.auth_token(), credentials).await?;
        }

        let results = fetch_pages(
            &session,
            document.base_url(),
            document.page_count(),
            self.config.concurrency(),
        )
        .await?;

        let host = self.config.host().to_string();
        let pages = tokio::task::spawn_blocking(move || {
            results
                .iter()
                .map(|result| render_page(result, &host))
                .collect::<Vec<_>>()
        })
        .await?;

        Ok(FetchedDocument { document, pages })
    }

    /// Fetch a document and write it to `output` (or the format's default path).
    ///
    /// Returns the path that was written.
    pub async fn download(
        &self,
        identifier: &str,
        credentials: Option<&Credentials>,
        format: OutputFormat,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let fetched = self.fetch(identifier, credentials).await?;
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| format.default_output(fetched.document.id()));

        let pages = fetched.pages;
        let target = path.clone();
        tokio::task::spawn_blocking(move || match format {
            OutputFormat::Pdf => write_pdf(&pages, &target),
            OutputFormat::Images => write_images(&pages, &target).map(|_| ()),
        })
        .await??;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Images);
        assert!("tiff".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_output() {
        assert_eq!(
            OutputFormat::Pdf.default_output("abc123"),
            PathBuf::from("abc123.pdf")
        );
        assert_eq!(
            OutputFormat::Images.default_output("abc123"),
            PathBuf::from("abc123")
        );
    }
}
