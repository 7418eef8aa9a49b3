pub mod x;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::chunker::Segment;
use crate::media::LocalMedia;

/// Failures a social platform can report. All of them end the current cycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The account's access level does not allow this call.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Network failures and anything the platform did not classify.
    #[error("transient error: {0}")]
    Transient(String),
}

/// Posting and media upload on a social platform.
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    /// Returns the platform media id to attach to a post.
    async fn upload_media(&self, bytes: Vec<u8>) -> Result<String, PlatformError>;

    /// Returns the new post's id.
    async fn create_post(
        &self,
        text: &str,
        media_id: Option<&str>,
        reply_to: Option<&str>,
    ) -> Result<String, PlatformError>;
}

/// A post that made it onto the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadPost {
    pub post_id: String,
    /// Id of the post published immediately before this one.
    pub reply_to_id: Option<String>,
    pub has_media: bool,
    pub segment_index: usize,
    pub posted_at: DateTime<Utc>,
}

/// A thread that stopped part way. Posts already published stay up.
#[derive(Debug, Error)]
#[error(
    "thread stopped after {published_count} of {total} posts: {source}",
    published_count = .published.len()
)]
pub struct PublishError {
    pub published: Vec<ThreadPost>,
    pub total: usize,
    #[source]
    pub source: PlatformError,
}

pub struct ThreadPublisher {
    platform: Arc<dyn SocialPlatform>,
}

impl ThreadPublisher {
    pub fn new(platform: Arc<dyn SocialPlatform>) -> Self {
        Self { platform }
    }

    /// Publish `segments` in order as a reply chain. Media, when present, is
    /// only attached to the first post.
    pub async fn publish(
        &self,
        segments: &[Segment],
        media: Option<&LocalMedia>,
    ) -> Result<Vec<ThreadPost>, PublishError> {
        let total = segments.len();
        let mut published: Vec<ThreadPost> = Vec::with_capacity(total);
        let mut previous: Option<String> = None;

        for (i, segment) in segments.iter().enumerate() {
            let media_id = if i == 0 {
                self.upload_lead_media(media).await
            } else {
                None
            };

            let result = self
                .platform
                .create_post(&segment.text, media_id.as_deref(), previous.as_deref())
                .await;

            match result {
                Ok(post_id) => {
                    info!(
                        part = segment.index,
                        total = segment.total,
                        post_id = %post_id,
                        "Posted part"
                    );
                    published.push(ThreadPost {
                        post_id: post_id.clone(),
                        reply_to_id: previous.replace(post_id),
                        has_media: media_id.is_some(),
                        segment_index: segment.index,
                        posted_at: Utc::now(),
                    });
                }
                Err(source) => {
                    error!(
                        part = i + 1,
                        total,
                        published = published.len(),
                        error = %source,
                        "Posting failed, stopping thread"
                    );
                    return Err(PublishError {
                        published,
                        total,
                        source,
                    });
                }
            }
        }

        Ok(published)
    }

    /// Upload problems degrade the lead post to text-only.
    async fn upload_lead_media(&self, media: Option<&LocalMedia>) -> Option<String> {
        let media = media?;
        let bytes = match media.read().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Could not read poster, posting without media");
                return None;
            }
        };
        match self.platform.upload_media(bytes).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Media upload failed, posting without media");
                None
            }
        }
    }
}
