use std::sync::Arc;
use shelf_core::{OfferRepository, ProductRepository};
use shelf_offer::RegistrationQueue;
use shelf_store::{DbClient, StoreOfferRepository, StoreProductRepository};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub offers: Arc<dyn OfferRepository>,
    pub registrations: RegistrationQueue,
}

impl AppState {
    pub fn new(db: &DbClient, registrations: RegistrationQueue) -> Self {
        Self {
            products: Arc::new(StoreProductRepository::new(db.pool.clone())),
            offers: Arc::new(StoreOfferRepository::new(db.pool.clone())),
            registrations,
        }
    }
}
