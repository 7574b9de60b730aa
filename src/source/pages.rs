//! Concurrent per-page fetch
//!
//! Each page is two requests: the page data JSON (image URL plus link
//! annotations) and the image itself. Pages run on a bounded pool of tokio
//! tasks and are collected by page number, never by arrival order.

use crate::error::{Error, Result};
use crate::pdf::normalize;
use crate::source::SessionClient;
use image::DynamicImage;
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::task::JoinSet;

/// A clickable region as delivered by the service, in page-relative fractions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnnotation {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub tracked_url: Option<String>,
}

/// Page data JSON returned by `{base}/page_data/{page}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub image_url: String,
    #[serde(default)]
    pub document_links: Option<Vec<LinkAnnotation>>,
}

/// One fetched page: decoded image plus its raw link annotations
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub page: u32,
    pub image: DynamicImage,
    pub links: Vec<LinkAnnotation>,
}

pub fn page_data_url(base_url: &str, page: u32) -> String {
    format!("{}/page_data/{}", base_url, page)
}

pub fn parse_page_data(body: &str) -> Result<PageData> {
    serde_json::from_str(body).map_err(|e| Error::parse(format!("malformed page data: {}", e)))
}

/// Fetch and decode a single page.
pub async fn fetch_page(session: &SessionClient, base_url: &str, page: u32) -> Result<PageResult> {
    let body = session.get_text(&page_data_url(base_url, page)).await?;
    let data = parse_page_data(&body)?;

    let bytes = session.get_bytes(&data.image_url).await?;
    let image = tokio::task::spawn_blocking(move || normalize::decode(&bytes, page)).await??;

    let links = data.document_links.unwrap_or_default();
    tracing::debug!(
        page,
        width = image.width(),
        height = image.height(),
        links = links.len(),
        "Fetched page"
    );

    Ok(PageResult { page, image, links })
}

/// Fetch pages `1..=page_count` with at most `concurrency` in flight.
///
/// The returned vector is ordered so that `result[i].page == i + 1`. The
/// first failure stops new pages from being started; pages already running
/// are allowed to settle, their results are dropped, and that first error is
/// returned. No partial sequence is ever returned.
pub async fn fetch_pages(
    session: &SessionClient,
    base_url: &str,
    page_count: u32,
    concurrency: usize,
) -> Result<Vec<PageResult>> {
    let limit = concurrency.max(1);
    // Filled as pages settle; never sized from the server-reported count
    let mut fetched: BTreeMap<u32, PageResult> = BTreeMap::new();
    let mut tasks: JoinSet<(u32, Result<PageResult>)> = JoinSet::new();
    let mut next_page = 1u64;
    let mut failure: Option<Error> = None;

    loop {
        while failure.is_none() && next_page <= u64::from(page_count) && tasks.len() < limit {
            let page = next_page as u32;
            next_page += 1;

            let session = session.clone();
            let base_url = base_url.to_string();
            tasks.spawn(async move { (page, fetch_page(&session, &base_url, page).await) });
        }

        let Some(joined) = tasks.join_next().await else {
            break;
        };

        match joined {
            Ok((page, Ok(result))) => {
                if failure.is_none() {
                    fetched.insert(page, result);
                }
            }
            Ok((page, Err(e))) => {
                tracing::warn!(page, error = %e, "Page fetch failed");
                if failure.is_none() {
                    failure = Some(e.at_page(page));
                    fetched.clear();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Page task did not complete");
                if failure.is_none() {
                    failure = Some(Error::TaskJoin(e));
                    fetched.clear();
                }
            }
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }

    fetched
        .into_iter()
        .enumerate()
        .map(|(idx, (page, result))| {
            if page as usize == idx + 1 {
                Ok(result)
            } else {
                Err(Error::parse(format!("page {} was never fetched", idx + 1)))
            }
        })
        .collect()
}
