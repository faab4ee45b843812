//! Page fetching: one GET per product page, then image URL extraction

use crate::error::{AssetError, Result};
use crate::extract::ImageUrlExtractor;
use reqwest::Client;

/// Retrieves page HTML and locates its representative image
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    extractor: ImageUrlExtractor,
}

impl PageFetcher {
    pub fn new(client: Client, extractor: ImageUrlExtractor) -> Self {
        Self { client, extractor }
    }

    /// Download the document text of a page
    ///
    /// Redirects are followed by the client. Non-success statuses and
    /// transport failures become [`AssetError::Fetch`].
    pub async fn fetch_html(&self, page_url: &str) -> Result<String> {
        log::debug!("Fetching page: {}", page_url);

        let response = self
            .client
            .get(page_url)
            .send()
            .await
            .map_err(|e| AssetError::fetch(page_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::fetch(page_url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| AssetError::fetch(page_url, e))
    }

    /// Image URL for a page, or the reason none was found
    pub async fn try_fetch_image_url(&self, page_url: &str) -> Result<String> {
        let html = self.fetch_html(page_url).await?;

        match self.extractor.extract_with_kind(&html) {
            Some((image_url, kind)) => {
                tracing::debug!(url = %page_url, image = %image_url, matched = %kind, "Found page image");
                Ok(image_url)
            },
            None => Err(AssetError::not_found(page_url)),
        }
    }

    /// Image URL for a page; failures are logged and reported as `None`
    pub async fn fetch_image_url(&self, page_url: &str) -> Option<String> {
        match self.try_fetch_image_url(page_url).await {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("{}", e);
                None
            },
        }
    }
}
