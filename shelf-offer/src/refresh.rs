use std::sync::Arc;
use std::time::Duration;
use shelf_core::{CoreError, OfferRepository, ProductRepository};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use crate::client::OffersGateway;
use crate::merge::{MergeSummary, OfferMerger};
use crate::SyncError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub products: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Products deleted while their offers were being merged
    pub skipped: usize,
}

impl TickReport {
    fn absorb(&mut self, summary: MergeSummary) {
        self.inserted += summary.inserted;
        self.updated += summary.updated;
        self.unchanged += summary.unchanged;
    }
}

/// Periodically pulls offers for every product and merges them locally.
pub struct RefreshScheduler {
    products: Arc<dyn ProductRepository>,
    merger: OfferMerger,
    gateway: Arc<dyn OffersGateway>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        offers: Arc<dyn OfferRepository>,
        gateway: Arc<dyn OffersGateway>,
        interval: Duration,
    ) -> Self {
        Self {
            products,
            merger: OfferMerger::new(offers),
            gateway,
            interval,
        }
    }

    /// Refresh every product once, one after the other.
    pub async fn run_tick(&self) -> Result<TickReport, SyncError> {
        let products = self.products.list_products().await?;
        let mut report = TickReport {
            products: products.len(),
            ..Default::default()
        };

        for product in &products {
            let snapshots = self.gateway.fetch_offers(product.id).await;
            debug!("Merging {} offers for product {}", snapshots.len(), product.id);

            match self.merger.merge_batch(product.id, &snapshots).await {
                Ok(summary) => report.absorb(summary),
                // Insert hits the foreign key, update finds its row gone.
                Err(e @ (CoreError::ConstraintViolation(_) | CoreError::NotFound(_))) => {
                    if self.products.get_product(product.id).await?.is_some() {
                        return Err(e.into());
                    }
                    warn!("Product {} was deleted during refresh, skipping: {}", product.id, e);
                    report.skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(report)
    }

    /// Tick immediately, then once per interval, until a tick fails.
    ///
    /// Ticks never overlap: the next one is only scheduled after the previous
    /// one has finished. The first failing tick ends the loop with its error.
    pub async fn run(self) -> Result<(), SyncError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Offer refresh scheduler started, interval {:?}", self.interval);

        loop {
            ticker.tick().await;
            match self.run_tick().await {
                Ok(report) => info!(
                    "Offer refresh done: {} products, {} inserted, {} updated, {} unchanged, {} skipped",
                    report.products, report.inserted, report.updated, report.unchanged, report.skipped
                ),
                Err(e) => {
                    error!("Offer refresh tick failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
