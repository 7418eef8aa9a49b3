use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Process configuration, read once from the environment and handed to each
/// collaborator's constructor.
#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_bearer_token: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// OAuth 2.0 user-context token with tweet.write + media.write scopes.
    pub x_access_token: String,
    pub data_dir: PathBuf,
    pub trigger_addr: Option<SocketAddr>,
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let trigger_addr = match optional("TRIGGER_ADDR") {
            Some(addr) => Some(
                addr.parse::<SocketAddr>()
                    .with_context(|| format!("TRIGGER_ADDR is not a socket address: {}", addr))?,
            ),
            None => None,
        };
        let rng_seed = match optional("RNG_SEED") {
            Some(seed) => Some(
                seed.parse::<u64>()
                    .with_context(|| format!("RNG_SEED is not a u64: {}", seed))?,
            ),
            None => None,
        };

        Ok(Self {
            tmdb_bearer_token: required("TMDB_BEARER_TOKEN")?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_model: optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            x_access_token: required("X_ACCESS_TOKEN")?,
            data_dir: optional("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            trigger_addr,
            rng_seed,
        })
    }

    pub fn dedup_dir(&self) -> PathBuf {
        self.data_dir.join("dedup")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.data_dir.join("media")
    }
}

fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("{} required", key))
}

/// Unset and empty are treated the same.
fn optional(key: &str) -> Option<String> {
    dotenv::var(key).ok().filter(|v| !v.trim().is_empty())
}
