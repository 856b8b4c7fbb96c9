use async_trait::async_trait;
use shelf_catalog::{NewProduct, Offer, Product, ProductUpdate};
use crate::CoreResult;

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: &NewProduct) -> CoreResult<Product>;

    async fn get_product(&self, id: i64) -> CoreResult<Option<Product>>;

    /// Every product, ordered by id. No pagination.
    async fn list_products(&self) -> CoreResult<Vec<Product>>;

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> CoreResult<Product>;

    /// Removes the product's offers, then the product itself.
    async fn delete_product(&self, id: i64) -> CoreResult<Product>;
}

/// Repository trait for offers, always scoped to a product
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn find_offer(&self, product_id: i64, offer_id: i64) -> CoreResult<Option<Offer>>;

    /// Fails with `ConstraintViolation` if `(product_id, offer_id)` already exists.
    async fn insert_offer(
        &self,
        product_id: i64,
        offer_id: i64,
        price: i64,
        items_in_stock: i64,
    ) -> CoreResult<Offer>;

    async fn update_offer(
        &self,
        existing: &Offer,
        price: i64,
        items_in_stock: i64,
    ) -> CoreResult<Offer>;

    async fn list_offers(&self, product_id: i64) -> CoreResult<Vec<Offer>>;
}
