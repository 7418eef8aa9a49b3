use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::catalog::select::CatalogSelector;
use crate::compose::{ContentComposer, ContentSource};
use crate::dedup::DedupStore;
use crate::media::MediaFetcher;
use crate::publish::{PublishError, ThreadPost, ThreadPublisher};

/// How a single select → compose → publish cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing eligible today.
    NoContent,
    Published {
        item_id: String,
        title: String,
        source: ContentSource,
        posts: Vec<ThreadPost>,
    },
    /// Publishing stopped part way. The item stays recorded as published.
    Aborted {
        item_id: String,
        error: PublishError,
    },
}

impl CycleOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::NoContent => "no_content",
            CycleOutcome::Published { .. } => "published",
            CycleOutcome::Aborted { .. } => "aborted",
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::NoContent => write!(f, "no eligible movie"),
            CycleOutcome::Published {
                item_id,
                title,
                source,
                posts,
            } => write!(
                f,
                "published '{}' ({}) as {} posts, {:?} content",
                title,
                item_id,
                posts.len(),
                source
            ),
            CycleOutcome::Aborted { item_id, error } => {
                write!(f, "aborted {}: {}", item_id, error)
            }
        }
    }
}

pub struct Orchestrator {
    dedup: Arc<dyn DedupStore>,
    selector: CatalogSelector,
    composer: ContentComposer,
    media: Arc<dyn MediaFetcher>,
    publisher: ThreadPublisher,
    /// Held for the whole cycle so scheduled and triggered runs never overlap.
    running: Mutex<()>,
}

impl Orchestrator {
    pub fn new(
        dedup: Arc<dyn DedupStore>,
        selector: CatalogSelector,
        composer: ContentComposer,
        media: Arc<dyn MediaFetcher>,
        publisher: ThreadPublisher,
    ) -> Self {
        Self {
            dedup,
            selector,
            composer,
            media,
            publisher,
            running: Mutex::new(()),
        }
    }

    /// Run one cycle. Every failure is handled here; nothing propagates.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let _running = self.running.lock().await;

        let excluded = self.dedup.load().await;
        let Some(item) = self.selector.select(&excluded).await else {
            info!(known_ids = excluded.len(), "No movie to post this cycle");
            return CycleOutcome::NoContent;
        };

        let composition = self.composer.compose(&item).await;
        // Dropped at the end of this function, which deletes the local file.
        let media = self.media.fetch(&item.media_url).await;
        if media.is_none() {
            info!(item_id = %item.id, "Posting without poster");
        }

        match self
            .publisher
            .publish(&composition.segments, media.as_ref())
            .await
        {
            Ok(posts) => {
                info!(
                    item_id = %item.id,
                    title = %item.title,
                    posts = posts.len(),
                    source = ?composition.source,
                    "Thread published"
                );
                CycleOutcome::Published {
                    item_id: item.id,
                    title: item.title,
                    source: composition.source,
                    posts,
                }
            }
            Err(e) => {
                error!(item_id = %item.id, title = %item.title, error = %e, "Cycle aborted");
                CycleOutcome::Aborted {
                    item_id: item.id,
                    error: e,
                }
            }
        }
    }
}
