use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use shelf_api::{app, worker, AppState};
use shelf_offer::{OffersClient, OffersGateway};
use shelf_store::{app_config::Config, DbClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf_api=debug,shelf_offer=debug,shelf_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Shelf API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .context("Failed to open database")?;
    db.migrate().await.context("Failed to run migrations")?;

    let gateway: Arc<dyn OffersGateway> =
        Arc::new(OffersClient::new(&config.offers).context("Failed to build offers client")?);

    let (registrations, _registration_worker) =
        worker::start_registration_worker(&config, gateway.clone());
    let refresh_worker = worker::start_refresh_worker(&config, &db, gateway);

    let app = app(AppState::new(&db, registrations));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    // A failed refresh tick takes the whole process down.
    tokio::select! {
        served = axum::serve(listener, app).into_future() => {
            served.context("HTTP server failed")?;
        }
        refreshed = refresh_worker => {
            refreshed.context("Offer refresh task aborted")??;
        }
    }

    Ok(())
}
