use std::sync::Arc;
use std::time::Duration;

use crate::cycle::Orchestrator;

/// Fixed cycle parameters. Not read from the environment.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Hard per-post length limit, in characters.
    pub max_post_len: usize,
    pub max_attempts: u32,
    /// Inclusive discover page range.
    pub min_page: u32,
    pub max_page: u32,
    pub max_credits: usize,
    pub interval: Duration,
    pub hashtag: &'static str,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_post_len: 280,
            max_attempts: 3,
            min_page: 1,
            max_page: 5,
            max_credits: 3,
            interval: Duration::from_secs(60),
            hashtag: "#AfricanCinema",
        }
    }
}

/// Shared with the trigger endpoint.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}
