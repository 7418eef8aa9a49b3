pub mod select;
pub mod types;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use types::{CastMember, CatalogEntry, Credits, DiscoverPage, DiscoverQuery};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Movie catalog lookups.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// One page of discover results. A non-success status is an error.
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<CatalogEntry>>;

    /// Billed cast for a title, in billing order.
    async fn credits(&self, id: &str) -> Result<Vec<CastMember>>;
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TmdbClient {
    pub fn new(bearer_token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: TMDB_BASE_URL.to_string(),
            bearer_token,
        })
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .header("accept", "application/json")
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .context("TMDb request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read TMDb response")?;
        if !status.is_success() {
            bail!("TMDb API error: {} - {}", status.as_u16(), body);
        }
        Ok(body)
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<CatalogEntry>> {
        let body = self.get("discover/movie", &query.params()).await?;
        let page: DiscoverPage =
            serde_json::from_str(&body).context("Failed to parse discover JSON")?;
        debug!(
            country = query.origin_country,
            page = query.page,
            results = page.results.len(),
            "discover page fetched"
        );
        Ok(page.results)
    }

    async fn credits(&self, id: &str) -> Result<Vec<CastMember>> {
        let body = self.get(&format!("movie/{}/credits", id), &[]).await?;
        let credits: Credits = serde_json::from_str(&body).context("Failed to parse credits JSON")?;
        Ok(credits.cast)
    }
}
