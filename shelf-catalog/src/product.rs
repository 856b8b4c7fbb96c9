use serde::{Deserialize, Serialize};
use crate::offer::Offer;

/// A catalog product. The id is assigned locally by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Payload for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
}

/// Partial update. Only the fields that are present get written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    /// Apply the present fields onto an existing product
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
    }
}

/// A product together with the offers synchronized for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOffers {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub offers: Vec<Offer>,
}

impl ProductOffers {
    pub fn new(product: Product, offers: Vec<Offer>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            offers,
        }
    }
}
