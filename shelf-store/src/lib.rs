pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod offer_repo;

pub use database::DbClient;
pub use catalog_repo::StoreProductRepository;
pub use offer_repo::StoreOfferRepository;

use shelf_core::CoreError;

pub(crate) fn store_error(err: sqlx::Error) -> CoreError {
    match err {
        sqlx::Error::RowNotFound => CoreError::NotFound("Row".to_string()),
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.message().contains("constraint failed") =>
        {
            CoreError::ConstraintViolation(db.message().to_string())
        }
        other => CoreError::Storage(other.to_string()),
    }
}
