use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::types::{credit_lines, CatalogEntry, DiscoverQuery, Item, CATEGORIES};
use super::Catalog;
use crate::dedup::DedupStore;
use crate::state::CycleConfig;

/// Picks one not-yet-published title from a random origin country.
pub struct CatalogSelector {
    catalog: Arc<dyn Catalog>,
    dedup: Arc<dyn DedupStore>,
    rng: Mutex<StdRng>,
    config: CycleConfig,
}

impl CatalogSelector {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        dedup: Arc<dyn DedupStore>,
        rng: StdRng,
        config: CycleConfig,
    ) -> Self {
        Self {
            catalog,
            dedup,
            rng: Mutex::new(rng),
            config,
        }
    }

    /// Returns `None` when no attempt turns up an eligible title; that is a
    /// normal outcome. On success the id is already recorded in the dedup
    /// store, so a failed publish still spends the title.
    pub async fn select(&self, excluded: &HashSet<String>) -> Option<Item> {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let (category, page) = {
                let mut rng = self.rng.lock().await;
                let category = *CATEGORIES.choose(&mut *rng)?;
                let page = rng.random_range(self.config.min_page..=self.config.max_page);
                (category, page)
            };
            info!(
                attempt,
                max_attempts,
                country = category.name,
                code = category.code,
                page,
                "Querying catalog"
            );

            let query = DiscoverQuery {
                origin_country: category.code,
                page,
            };
            let entries = match self.catalog.discover(&query).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(country = category.name, error = %e, "Catalog query failed");
                    continue;
                }
            };
            if entries.is_empty() {
                info!(country = category.name, "No titles found");
                continue;
            }

            let candidates: Vec<&CatalogEntry> = entries
                .iter()
                .filter(|e| e.is_publishable() && !excluded.contains(&e.id.to_string()))
                .collect();

            let picked = {
                let mut rng = self.rng.lock().await;
                candidates.choose(&mut *rng).copied()
            };
            let Some(entry) = picked else {
                info!(
                    country = category.name,
                    fetched = entries.len(),
                    "No unpublished titles with poster and overview"
                );
                continue;
            };

            let credits = self.fetch_credits(entry.id).await;
            let item = Item::from_entry(entry, &category, credits);

            self.dedup.add(&item.id).await;
            info!(
                item_id = %item.id,
                title = %item.title,
                country = %item.origin,
                credits = item.credits.len(),
                "Title selected"
            );
            return Some(item);
        }

        info!(max_attempts, "No eligible title found");
        None
    }

    /// Best-effort: any failure yields an empty credit list.
    async fn fetch_credits(&self, id: u64) -> Vec<String> {
        match self.catalog.credits(&id.to_string()).await {
            Ok(cast) => credit_lines(&cast, self.config.max_credits),
            Err(e) => {
                warn!(item_id = id, error = %e, "Credits lookup failed, continuing without cast");
                Vec::new()
            }
        }
    }
}
