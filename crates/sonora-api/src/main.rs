use tracing_subscriber::EnvFilter;

use sonora_api::config::{ServiceConfig, StoreKind};
use sonora_api::state::AppState;
use sonora_storage::objects::ObjectStore;
use sonora_storage::records::Records;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServiceConfig::from_env()?;

    let store = match config.store {
        StoreKind::S3 => {
            let client = sonora_storage::client::build_client().await;
            ObjectStore::s3(client, config.bucket.clone())
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store, records are lost on exit");
            ObjectStore::in_memory()
        }
    };

    tracing::info!(
        backend = store.backend_name(),
        bucket = %config.bucket,
        time_zone = %config.time_zone_name,
        "starting sonora-api"
    );

    let state = AppState::new(Records::new(store), config.time_zone.clone());
    let app = sonora_api::app(state);

    match config.listen_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "listening");
            axum::serve(listener, app).await?;
        }
        None => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))?,
    }

    Ok(())
}
