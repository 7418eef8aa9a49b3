//! Hand-written fakes for the collaborator traits.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use crate::catalog::types::{CastMember, CatalogEntry, DiscoverQuery, Item};
use crate::catalog::Catalog;
use crate::dedup::DedupStore;
use crate::llm::TextGenerator;
use crate::media::{LocalMedia, MediaFetcher};
use crate::publish::{PlatformError, SocialPlatform};

pub fn entry(id: u64) -> CatalogEntry {
    CatalogEntry {
        id,
        title: Some(format!("Movie {}", id)),
        overview: Some(long_summary()),
        poster_path: Some(format!("/poster{}.jpg", id)),
        release_date: Some("2019-05-01".to_string()),
        vote_average: Some(7.2),
    }
}

pub fn item(id: &str) -> Item {
    Item {
        id: id.to_string(),
        title: format!("Movie {}", id),
        summary: long_summary(),
        origin: "Nigeria".to_string(),
        media_url: format!("https://image.tmdb.org/t/p/w500/poster{}.jpg", id),
        credits: vec!["Genevieve Nnaji as Ada".to_string()],
        release_year: "2019".to_string(),
        rating: 7.2,
    }
}

/// Roughly 600 characters of sentence-structured plot.
fn long_summary() -> String {
    (0..12)
        .map(|i| format!("In chapter {} the family gathers in Lagos again", i))
        .collect::<Vec<_>>()
        .join(". ")
        + "."
}

/// Writes a small file into a fresh temp dir and hands it over as media.
pub fn scratch_media() -> (TempDir, LocalMedia) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("poster.jpg");
    std::fs::write(&path, b"\xFF\xD8\xFFjpeg").unwrap();
    (dir, LocalMedia::new(path))
}

#[derive(Default)]
pub struct MemoryDedupStore {
    ids: Mutex<HashSet<String>>,
    adds: Mutex<Vec<String>>,
}

impl MemoryDedupStore {
    pub fn with_ids(ids: &[&str]) -> Self {
        let store = Self::default();
        store
            .ids
            .lock()
            .unwrap()
            .extend(ids.iter().map(|s| s.to_string()));
        store
    }

    pub fn adds(&self) -> Vec<String> {
        self.adds.lock().unwrap().clone()
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn load(&self) -> HashSet<String> {
        self.ids.lock().unwrap().clone()
    }

    async fn add(&self, id: &str) {
        self.adds.lock().unwrap().push(id.to_string());
        self.ids.lock().unwrap().insert(id.to_string());
    }
}

/// Returns the same discover page for every query.
pub struct FakeCatalog {
    results: Option<Vec<CatalogEntry>>,
    cast: Option<Vec<CastMember>>,
    queries: Mutex<Vec<DiscoverQuery>>,
}

impl FakeCatalog {
    pub fn with_results(results: Vec<CatalogEntry>) -> Self {
        Self {
            results: Some(results),
            cast: Some(vec![CastMember {
                name: "Genevieve Nnaji".to_string(),
                character: Some("Ada".to_string()),
            }]),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: None,
            ..Self::with_results(Vec::new())
        }
    }

    pub fn with_cast(mut self, cast: Vec<CastMember>) -> Self {
        self.cast = Some(cast);
        self
    }

    pub fn without_credits(mut self) -> Self {
        self.cast = None;
        self
    }

    pub fn discover_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<DiscoverQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<CatalogEntry>> {
        self.queries.lock().unwrap().push(query.clone());
        self.results
            .clone()
            .ok_or_else(|| anyhow!("TMDb API error: 500 - upstream"))
    }

    async fn credits(&self, _id: &str) -> Result<Vec<CastMember>> {
        self.cast
            .clone()
            .ok_or_else(|| anyhow!("TMDb API error: 404 - not found"))
    }
}

pub struct FakeGenerator {
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response
            .clone()
            .ok_or_else(|| anyhow!("Gemini API error: 503 - overloaded"))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub text: String,
    pub media_id: Option<String>,
    pub reply_to: Option<String>,
}

#[derive(Default)]
pub struct FakePlatform {
    /// 1-based post attempt that fails, with the error it fails with.
    fail_at: Option<(usize, PlatformError)>,
    fail_upload: bool,
    attempts: AtomicUsize,
    uploads: AtomicUsize,
    posts: Mutex<Vec<RecordedPost>>,
}

impl FakePlatform {
    pub fn fail_post_at(mut self, attempt: usize, error: PlatformError) -> Self {
        self.fail_at = Some((attempt, error));
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SocialPlatform for FakePlatform {
    async fn upload_media(&self, _bytes: Vec<u8>) -> Result<String, PlatformError> {
        if self.fail_upload {
            return Err(PlatformError::Transient("upload rejected".to_string()));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("media-{}", n))
    }

    async fn create_post(
        &self,
        text: &str,
        media_id: Option<&str>,
        reply_to: Option<&str>,
    ) -> Result<String, PlatformError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, error)) = &self.fail_at {
            if *at == attempt {
                return Err(error.clone());
            }
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push(RecordedPost {
            text: text.to_string(),
            media_id: media_id.map(str::to_string),
            reply_to: reply_to.map(str::to_string),
        });
        Ok(format!("post-{}", posts.len()))
    }
}

/// Writes a file per fetch, or fails every fetch.
pub struct FakeMediaFetcher {
    dir: TempDir,
    available: bool,
    fetched: Mutex<Vec<PathBuf>>,
}

impl FakeMediaFetcher {
    pub fn available() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            available: true,
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    pub fn fetched(&self) -> Vec<PathBuf> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for FakeMediaFetcher {
    async fn fetch(&self, _url: &str) -> Option<LocalMedia> {
        if !self.available {
            return None;
        }
        let mut fetched = self.fetched.lock().unwrap();
        let path = self.dir.path().join(format!("poster-{}.jpg", fetched.len()));
        std::fs::write(&path, b"\xFF\xD8\xFFjpeg").ok()?;
        fetched.push(path.clone());
        Some(LocalMedia::new(path))
    }
}
