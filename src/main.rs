mod catalog;
mod chunker;
mod compose;
mod config;
mod cycle;
mod dedup;
mod llm;
mod media;
mod publish;
mod scheduler;
mod server;
mod state;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use catalog::select::CatalogSelector;
use catalog::TmdbClient;
use compose::ContentComposer;
use config::Config;
use cycle::Orchestrator;
use dedup::{DedupStore, PublishedStore};
use llm::GeminiClient;
use media::HttpMediaFetcher;
use publish::x::XClient;
use publish::ThreadPublisher;
use scheduler::Scheduler;
use state::{AppState, CycleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = Config::from_env()?;
    let cycle_config = CycleConfig::default();

    // Init storage
    let dedup_dir = config.dedup_dir();
    let dedup: Arc<dyn DedupStore> = Arc::new(PublishedStore::new(&dedup_dir).await?);
    info!("Published-id store initialized at {:?}", dedup_dir);

    // Init provider clients
    let catalog = Arc::new(TmdbClient::new(config.tmdb_bearer_token.clone())?);
    let generator = Arc::new(GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
    )?);
    let platform = Arc::new(XClient::new(config.x_access_token.clone())?);
    let media = Arc::new(HttpMediaFetcher::new(config.media_dir())?);
    info!(model = %config.gemini_model, "Provider clients initialized");

    let rng = match config.rng_seed {
        Some(seed) => {
            info!(seed, "Using seeded selection");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let orchestrator = Arc::new(Orchestrator::new(
        dedup.clone(),
        CatalogSelector::new(catalog, dedup, rng, cycle_config.clone()),
        ContentComposer::new(generator, cycle_config.clone()),
        media,
        ThreadPublisher::new(platform),
    ));

    let scheduler = Scheduler::new(cycle_config.interval);
    let scheduled = scheduler.run(orchestrator.clone());

    match config.trigger_addr {
        Some(addr) => {
            let state = AppState { orchestrator };
            tokio::select! {
                _ = scheduled => {}
                res = server::serve(addr, state) => res?,
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
        None => {
            tokio::select! {
                _ = scheduled => {}
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
    }

    Ok(())
}
