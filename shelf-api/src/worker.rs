use std::sync::Arc;
use shelf_offer::{OffersGateway, RefreshScheduler, RegistrationQueue, SyncError};
use shelf_store::app_config::Config;
use shelf_store::{DbClient, StoreOfferRepository, StoreProductRepository};
use tokio::task::JoinHandle;
use tracing::info;

/// Background task registering new products with the offers service
pub fn start_registration_worker(
    config: &Config,
    gateway: Arc<dyn OffersGateway>,
) -> (RegistrationQueue, JoinHandle<()>) {
    info!(
        "Starting registration worker, queue capacity {}",
        config.registration.queue_capacity
    );
    RegistrationQueue::spawn(gateway, config.registration.queue_capacity)
}

/// Background task refreshing offers for every product.
///
/// The handle resolves only if a tick fails.
pub fn start_refresh_worker(
    config: &Config,
    db: &DbClient,
    gateway: Arc<dyn OffersGateway>,
) -> JoinHandle<Result<(), SyncError>> {
    let scheduler = RefreshScheduler::new(
        Arc::new(StoreProductRepository::new(db.pool.clone())),
        Arc::new(StoreOfferRepository::new(db.pool.clone())),
        gateway,
        config.refresh.interval(),
    );

    tokio::spawn(scheduler.run())
}
