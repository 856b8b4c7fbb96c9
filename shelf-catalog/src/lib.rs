pub mod product;
pub mod offer;

pub use product::{NewProduct, Product, ProductOffers, ProductUpdate};
pub use offer::{Offer, OfferSnapshot};
