//! Crawler coordinator - main harvest orchestration logic
//!
//! This module ties the pipeline together:
//! - Walking the listing to collect node links
//! - Fetching and extracting every node concurrently
//! - Settling folder names in discovery order
//! - Archiving images and writing every node concurrently
//! - Writing the summary index in discovery order

use crate::config::{CollisionPolicy, Config};
use crate::content::folder::disambiguate;
use crate::content::{ContentExtractor, Html2MdConverter, MarkdownConverter, NodeDraft};
use crate::crawler::links::{LinkSelectors, NodeLink};
use crate::crawler::pagination::PaginationCrawler;
use crate::crawler::FetchClient;
use crate::images::{FormatSniffer, ImagePipeline, ImageTranscoder};
use crate::output::{write_summary, CrawlReport, NodeFailure, NodePersister, NodeSummary};
use crate::url::{parse_seed, BaseUrl};
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A node that made it to disk
struct SavedNode {
    summary: NodeSummary,
    images: usize,
}

/// Main harvest coordinator
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: FetchClient,
    selectors: LinkSelectors,
    extractor: ContentExtractor,
    images: ImagePipeline,
    persister: NodePersister,
}

impl Coordinator {
    /// Creates a coordinator using the default Markdown converter and image
    /// transcoder
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid selectors or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        Self::with_capabilities(config, Arc::new(Html2MdConverter), Arc::new(FormatSniffer))
    }

    /// Creates a coordinator with custom conversion capabilities
    pub fn with_capabilities(
        config: Config,
        converter: Arc<dyn MarkdownConverter>,
        transcoder: Arc<dyn ImageTranscoder>,
    ) -> Result<Self, HarvestError> {
        let fetcher = FetchClient::new(&config.crawler)?;
        let selectors = LinkSelectors::from_config(&config.selectors)?;
        let extractor = ContentExtractor::new(
            &config.selectors,
            converter,
            config.output.save_path.clone(),
        )?;
        let images = ImagePipeline::new(fetcher.clone(), transcoder, &config.images);
        let persister = NodePersister::new(config.output.index_file.clone());

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            selectors,
            extractor,
            images,
            persister,
        })
    }

    /// Harvests every node reachable from `seed`
    ///
    /// Node failures do not stop the run: they are logged, listed in the
    /// report and left out of the summary. Use [`CrawlReport::into_result`] to
    /// turn them into an error.
    ///
    /// # Errors
    ///
    /// * An invalid seed URL
    /// * Any listing page failing to load
    /// * The summary index failing to write
    /// * Cancellation
    pub async fn run(
        &self,
        seed: &str,
        cancel: &CancellationToken,
    ) -> Result<CrawlReport, HarvestError> {
        let seed = parse_seed(seed)?;
        let base = BaseUrl::from_url(&seed)?;
        tracing::info!("Base URL: {}", base.as_str());

        let crawler =
            PaginationCrawler::new(&self.fetcher, &self.selectors, self.config.crawler.max_pages);
        let listing = crawler.crawl(&seed, &base, cancel).await?;
        tracing::info!("Found {} nodes.", listing.node_links.len());

        let links = listing.node_links;
        let limit = self.concurrency_limit(links.len());

        // Stage 1: fetch and extract every node
        let drafts: Vec<Result<NodeDraft, HarvestError>> = cancellable(
            cancel,
            stream::iter(links.iter())
                .map(|link| self.prepare_node(link))
                .buffered(limit)
                .collect::<Vec<_>>(),
        )
        .await?;

        let drafts = self.assign_folders(drafts);

        // Stage 2: archive images and write every node
        let outcomes: Vec<Result<SavedNode, HarvestError>> = cancellable(
            cancel,
            stream::iter(drafts)
                .map(|draft| async move {
                    match draft {
                        Ok(draft) => self.save_node(draft).await,
                        Err(e) => Err(e),
                    }
                })
                .buffered(limit)
                .collect::<Vec<_>>(),
        )
        .await?;

        let mut report = CrawlReport {
            pages_visited: listing.pages_visited,
            nodes_found: links.len(),
            summary_path: self
                .config
                .output
                .save_path
                .join(&self.config.output.summary_file),
            ..CrawlReport::default()
        };

        for (link, outcome) in links.iter().zip(outcomes) {
            match outcome {
                Ok(saved) => {
                    report.images_saved += saved.images;
                    report.saved.push(saved.summary);
                }
                Err(e) => {
                    tracing::error!("Failed to harvest {}: {}", link, e);
                    report.failures.push(NodeFailure {
                        url: link.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("Saved {} nodes.", report.saved.len());

        write_summary(
            &report.summary_path,
            &report.saved,
            &self.config.output.index_file,
        )
        .await?;
        tracing::info!("Summary saved to {}", report.summary_path.display());

        Ok(report)
    }

    /// Fetches a node page and extracts its draft
    async fn prepare_node(&self, link: &NodeLink) -> Result<NodeDraft, HarvestError> {
        let doc = self.fetcher.fetch_document(link).await?;
        self.extractor.extract(&doc)
    }

    /// Archives a node's images and writes its Markdown
    ///
    /// If the node fails after its folder was created here, the folder and any
    /// images already in it are removed. A folder that existed before the run
    /// is left alone.
    async fn save_node(&self, draft: NodeDraft) -> Result<SavedNode, HarvestError> {
        let folder = draft.folder_path.clone();
        let created = !tokio::fs::try_exists(&folder).await.unwrap_or(true);

        if let Err(e) = tokio::fs::create_dir_all(&folder).await {
            tracing::warn!("Could not create {}: {}", folder.display(), e);
        }

        let result = self.write_node(draft).await;
        if result.is_err() {
            discard_partial(&folder, created).await;
        }
        result
    }

    async fn write_node(&self, draft: NodeDraft) -> Result<SavedNode, HarvestError> {
        let refs = self
            .images
            .process_images(&draft.markdown, &draft.url, &draft.folder_path)
            .await?;
        let images = refs.len();
        let summary = self.persister.finalize(draft, &refs).await?;

        Ok(SavedNode { summary, images })
    }

    /// Gives every draft a folder no earlier draft uses
    ///
    /// Drafts are settled in discovery order, so the first node to claim a name
    /// keeps it.
    fn assign_folders(
        &self,
        drafts: Vec<Result<NodeDraft, HarvestError>>,
    ) -> Vec<Result<NodeDraft, HarvestError>> {
        let policy = self.config.output.on_collision;
        let mut taken = HashSet::new();

        drafts
            .into_iter()
            .map(|draft| {
                let mut draft = draft?;
                if taken.insert(draft.folder_name.clone()) {
                    return Ok(draft);
                }

                match policy {
                    CollisionPolicy::Fail => Err(HarvestError::FolderCollision {
                        url: draft.url.to_string(),
                        folder: draft.folder_name,
                    }),
                    CollisionPolicy::Suffix => {
                        let mut candidate = disambiguate(&draft.folder_name, &draft.url);
                        let mut attempt = 1;
                        while taken.contains(&candidate) {
                            attempt += 1;
                            candidate = format!(
                                "{}-{}",
                                disambiguate(&draft.folder_name, &draft.url),
                                attempt
                            );
                        }

                        tracing::warn!(
                            "Folder '{}' already used, saving {} as '{}'",
                            draft.folder_name,
                            draft.url,
                            candidate
                        );
                        taken.insert(candidate.clone());
                        draft.rename_folder(candidate);
                        Ok(draft)
                    }
                }
            })
            .collect()
    }

    fn concurrency_limit(&self, nodes: usize) -> usize {
        match self.config.crawler.max_concurrent_nodes {
            0 => nodes.max(1),
            limit => limit,
        }
    }
}

/// Cleans up after a node that failed part way through
async fn discard_partial(folder: &Path, created: bool) {
    if !created {
        tracing::warn!(
            "{} existed before this run; partial output left in place",
            folder.display()
        );
        return;
    }

    match tokio::fs::remove_dir_all(folder).await {
        Ok(()) => tracing::debug!("Removed partial output {}", folder.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "Could not remove partial output {}: {}",
            folder.display(),
            e
        ),
    }
}

/// Runs `future` unless `cancel` fires first
async fn cancellable<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = T>,
) -> Result<T, HarvestError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HarvestError::Cancelled),
        value = future => Ok(value),
    }
}

/// Runs a complete harvest
///
/// This is the main entry point for a harvest. It will:
/// 1. Build the coordinator from the configuration
/// 2. Walk the listing starting at `seed`
/// 3. Save every node and the summary index
/// 4. Fail with [`HarvestError::Aggregate`] if any node failed
///
/// # Example
///
/// ```no_run
/// use md_harvest::config::Config;
/// use md_harvest::crawler::harvest;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = harvest(Config::default(), "http://example.com/blog", &CancellationToken::new()).await?;
/// println!("{} nodes saved", report.saved.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    config: Config,
    seed: &str,
    cancel: &CancellationToken,
) -> Result<CrawlReport, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(seed, cancel).await?.into_result()
}
