use std::sync::Arc;
use shelf_catalog::{Offer, OfferSnapshot};
use shelf_core::{CoreResult, OfferRepository};

/// What a single merge did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First sighting of this remote offer for the product
    Inserted(Offer),
    /// Existing offer overwritten with new price/stock
    Updated(Offer),
    /// Existing offer overwritten with the values it already had
    Unchanged(Offer),
}

impl MergeOutcome {
    pub fn offer(&self) -> &Offer {
        match self {
            MergeOutcome::Inserted(offer)
            | MergeOutcome::Updated(offer)
            | MergeOutcome::Unchanged(offer) => offer,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl MergeSummary {
    fn record(&mut self, outcome: &MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted(_) => self.inserted += 1,
            MergeOutcome::Updated(_) => self.updated += 1,
            MergeOutcome::Unchanged(_) => self.unchanged += 1,
        }
    }
}

/// Reconciles remote offer snapshots with the offers stored for a product.
///
/// Create-or-update by the natural key `(product_id, snapshot.id)`. An
/// existing offer is always overwritten with the snapshot's price and stock,
/// there is no version or timestamp comparison.
#[derive(Clone)]
pub struct OfferMerger {
    repo: Arc<dyn OfferRepository>,
}

impl OfferMerger {
    pub fn new(repo: Arc<dyn OfferRepository>) -> Self {
        Self { repo }
    }

    pub async fn merge_snapshot(
        &self,
        product_id: i64,
        snapshot: &OfferSnapshot,
    ) -> CoreResult<MergeOutcome> {
        match self.repo.find_offer(product_id, snapshot.id).await? {
            None => {
                let offer = self
                    .repo
                    .insert_offer(product_id, snapshot.id, snapshot.price, snapshot.items_in_stock)
                    .await?;
                Ok(MergeOutcome::Inserted(offer))
            }
            Some(existing) => {
                let unchanged = existing.matches(snapshot);
                let offer = self
                    .repo
                    .update_offer(&existing, snapshot.price, snapshot.items_in_stock)
                    .await?;

                if unchanged {
                    Ok(MergeOutcome::Unchanged(offer))
                } else {
                    Ok(MergeOutcome::Updated(offer))
                }
            }
        }
    }

    /// Merge every snapshot independently. Each write is persisted as it
    /// happens; an error stops the batch and earlier writes stay.
    pub async fn merge_batch(
        &self,
        product_id: i64,
        snapshots: &[OfferSnapshot],
    ) -> CoreResult<MergeSummary> {
        let mut summary = MergeSummary::default();
        for snapshot in snapshots {
            let outcome = self.merge_snapshot(product_id, snapshot).await?;
            summary.record(&outcome);
        }
        Ok(summary)
    }
}
