//! Authenticated HTTP session with a private cookie jar

use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use futures_util::StreamExt;
use reqwest::Response;

/// HTTP client scoped to a single document run.
///
/// Every instance owns its own cookie store; clones share it. Nothing is
/// process-global, so two runs never see each other's session.
#[derive(Clone)]
pub struct SessionClient {
    client: reqwest::Client,
    max_body_bytes: u64,
}

impl SessionClient {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|source| Error::Network {
            url: config.host().to_string(),
            source,
        })?;

        Ok(Self {
            client,
            max_body_bytes: config.max_image_bytes,
        })
    }

    /// GET a URL, failing on transport errors and non-success statuses.
    pub async fn get(&self, url: &str) -> Result<Response> {
        tracing::trace!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| network_error(url, source))?;
        check_status(url, response)
    }

    /// POST a urlencoded form, failing on transport errors and non-success statuses.
    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Response> {
        tracing::trace!(url, fields = form.len(), "POST");
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|source| network_error(url, source))?;
        check_status(url, response)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|source| network_error(url, source))
    }

    /// GET a binary body, enforcing the configured size ceiling while streaming.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;

        // Check Content-Length header for early rejection
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_body_bytes {
                return Err(Error::DownloadTooLarge {
                    url: url.to_string(),
                    size: content_length,
                    max_size: self.max_body_bytes,
                });
            }
        }

        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| network_error(url, source))?;
            data.extend_from_slice(&chunk);
            if data.len() as u64 > self.max_body_bytes {
                return Err(Error::DownloadTooLarge {
                    url: url.to_string(),
                    size: data.len() as u64,
                    max_size: self.max_body_bytes,
                });
            }
        }

        Ok(data)
    }
}

fn network_error(url: &str, source: reqwest::Error) -> Error {
    Error::Network {
        url: url.to_string(),
        source,
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}
