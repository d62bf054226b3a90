use crate::config::ImageConfig;
use crate::crawler::FetchClient;
use crate::images::scanner::{scan_image_refs, ImageCandidate};
use crate::images::{ImageRef, ImageTranscoder};
use crate::url::resolve_image_url;
use crate::HarvestError;
use futures::future::try_join_all;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Downloads, transcodes and stores the images referenced by a node's Markdown
pub struct ImagePipeline {
    fetcher: FetchClient,
    transcoder: Arc<dyn ImageTranscoder>,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl ImagePipeline {
    pub fn new(
        fetcher: FetchClient,
        transcoder: Arc<dyn ImageTranscoder>,
        config: &ImageConfig,
    ) -> Self {
        Self {
            fetcher,
            transcoder,
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Archives every image referenced in `markdown` into `folder`
    ///
    /// All images are fetched concurrently, each after its own random delay.
    /// The returned refs are in scan order and image `n` in scan order is
    /// stored as `n.<ext>`, whatever order the downloads finish in.
    ///
    /// # Arguments
    ///
    /// * `markdown` - The node's Markdown
    /// * `page_url` - The node page, used to resolve relative image URLs
    /// * `folder` - The node folder; must already exist
    ///
    /// # Errors
    ///
    /// The first image that fails to resolve, download, transcode or be
    /// written fails the whole call; remaining downloads are dropped.
    pub async fn process_images(
        &self,
        markdown: &str,
        page_url: &Url,
        folder: &Path,
    ) -> Result<Vec<ImageRef>, HarvestError> {
        let candidates = scan_image_refs(markdown);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("{}: {} images to archive", page_url, candidates.len());

        let tasks = candidates
            .into_iter()
            .map(|candidate| self.process_image(candidate, page_url, folder));
        try_join_all(tasks).await
    }

    async fn process_image(
        &self,
        candidate: ImageCandidate,
        page_url: &Url,
        folder: &Path,
    ) -> Result<ImageRef, HarvestError> {
        let url = resolve_image_url(&candidate.original_url, page_url).ok_or_else(|| {
            HarvestError::MalformedPage {
                url: page_url.to_string(),
                message: format!("unsupported image URL '{}'", candidate.original_url),
            }
        })?;

        tokio::time::sleep(self.jitter()).await;

        let bytes = self.fetcher.fetch_bytes(&url).await?;
        let transcoded =
            self.transcoder
                .transcode(bytes)
                .map_err(|e| HarvestError::Transcode {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        let local_name = format!("{}.{}", candidate.index, transcoded.extension);
        let path = folder.join(&local_name);
        tokio::fs::write(&path, &transcoded.bytes)
            .await
            .map_err(|e| HarvestError::io(&path, e))?;

        tracing::debug!("Saved {} as {}", url, path.display());

        Ok(ImageRef {
            original_url: candidate.original_url,
            local_name,
        })
    }

    /// Random delay in `[min_delay_ms, max_delay_ms]`
    fn jitter(&self) -> Duration {
        if self.max_delay_ms <= self.min_delay_ms {
            return Duration::from_millis(self.min_delay_ms);
        }
        let ms = rand::rng().random_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }
}
