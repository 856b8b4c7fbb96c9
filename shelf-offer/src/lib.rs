pub mod merge;
pub mod client;
pub mod registration;
pub mod refresh;

pub use merge::{MergeOutcome, MergeSummary, OfferMerger};
pub use client::{OffersClient, OffersGateway};
pub use registration::RegistrationQueue;
pub use refresh::{RefreshScheduler, TickReport};

use shelf_core::CoreError;

/// Failures talking to the remote offers service
#[derive(Debug, thiserror::Error)]
pub enum OffersError {
    #[error("Offers service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Offers service answered with status {0}")]
    Status(reqwest::StatusCode),
}

/// A fault that aborts a refresh tick
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Offer refresh failed: {0}")]
    Store(#[from] CoreError),
}
