use serde::{Deserialize, Serialize};

/// A locally stored offer.
///
/// `id` comes from the remote offers service and is only unique within its
/// product, so `(product_id, id)` is the key used for reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: i64,
    pub price: i64,
    pub items_in_stock: i64,
    pub product_id: i64,
}

/// One element of the remote `GET /products/{id}/offers` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferSnapshot {
    pub id: i64,
    pub price: i64,
    pub items_in_stock: i64,
}

impl Offer {
    /// True when the snapshot is this offer with the same price and stock
    pub fn matches(&self, snapshot: &OfferSnapshot) -> bool {
        self.id == snapshot.id
            && self.price == snapshot.price
            && self.items_in_stock == snapshot.items_in_stock
    }
}
