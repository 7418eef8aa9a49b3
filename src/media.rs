use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

/// A downloaded image on local disk. The file is removed when this is dropped.
#[derive(Debug)]
pub struct LocalMedia {
    path: PathBuf,
}

impl LocalMedia {
    /// Take ownership of an existing file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read media file {:?}", self.path))
    }
}

impl Drop for LocalMedia {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = ?self.path, "media file released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?self.path, error = %e, "Failed to remove media file"),
        }
    }
}

/// Fetches a remote image into a scoped local file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// `None` on any failure; callers continue without media.
    async fn fetch(&self, url: &str) -> Option<LocalMedia>;
}

pub struct HttpMediaFetcher {
    client: reqwest::Client,
    dir: PathBuf,
}

impl HttpMediaFetcher {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, dir })
    }

    fn target_path(&self, url: &str) -> PathBuf {
        let name = blake3::hash(url.as_bytes()).to_hex();
        self.dir.join(format!("{}.jpg", name))
    }

    async fn download(&self, url: &str) -> Result<LocalMedia> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("Media request failed")?;
        if !resp.status().is_success() {
            bail!("media fetch returned {}", resp.status().as_u16());
        }
        let bytes = resp.bytes().await.context("Failed to read media body")?;
        if bytes.is_empty() {
            bail!("media fetch returned an empty body");
        }

        let path = self.target_path(url);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write media file {:?}", path))?;
        debug!(url, path = ?path, size = bytes.len(), "media downloaded");
        Ok(LocalMedia::new(path))
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Option<LocalMedia> {
        match self.download(url).await {
            Ok(media) => Some(media),
            Err(e) => {
                warn!(url, error = %e, "Error downloading poster");
                None
            }
        }
    }
}
