pub mod prompts;

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::catalog::types::Item;
use crate::chunker::{self, Segment};
use crate::llm::TextGenerator;
use crate::state::CycleConfig;

/// Where the body posts of a thread came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Composition {
    /// Lead segments first, numbered across the whole thread.
    pub segments: Vec<Segment>,
    pub source: ContentSource,
}

pub struct ContentComposer {
    generator: Arc<dyn TextGenerator>,
    config: CycleConfig,
}

impl ContentComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, config: CycleConfig) -> Self {
        Self { generator, config }
    }

    /// Never fails: a generation error switches to the fixed fallback posts.
    pub async fn compose(&self, item: &Item) -> Composition {
        let max_len = self.config.max_post_len;
        let lead = prompts::lead_post(item, self.config.hashtag);
        let mut segments = chunker::split(&lead, max_len);

        let (posts, source) = match self.generate_posts(item).await {
            Ok(posts) => (posts, ContentSource::Generated),
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "Text generation failed, using fallback posts");
                (
                    prompts::fallback_posts(item, self.config.hashtag),
                    ContentSource::Fallback,
                )
            }
        };

        for post in &posts {
            segments.extend(chunker::split(post, max_len));
        }
        let segments = chunker::renumber(segments);

        info!(
            item_id = %item.id,
            segments = segments.len(),
            source = ?source,
            "Thread composed"
        );
        Composition { segments, source }
    }

    async fn generate_posts(&self, item: &Item) -> Result<Vec<String>> {
        let prompt = prompts::thread_prompt(item, self.config.max_post_len, self.config.hashtag);
        let text = self.generator.generate(&prompt).await?;
        if text.trim().is_empty() {
            bail!("generator returned no text");
        }

        let posts = parse_posts(&text, self.config.max_post_len);
        debug!(
            returned_lines = text.lines().count(),
            kept = posts.len(),
            "generated posts parsed"
        );
        Ok(posts)
    }
}

/// One post per non-blank line; lines over `max_len` are dropped.
pub fn parse_posts(text: &str, max_len: usize) -> Vec<String> {
    text.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().count() <= max_len)
        .map(str::to_string)
        .collect()
}
