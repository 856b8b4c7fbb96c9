use std::sync::Arc;
use shelf_catalog::Product;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::client::OffersGateway;

/// Hands newly created products to a background task that registers them
/// with the offers service.
///
/// Enqueueing never waits and never fails the caller. Registrations that
/// cannot be queued, or that the offers service rejects, are logged and
/// dropped.
#[derive(Clone)]
pub struct RegistrationQueue {
    tx: mpsc::Sender<Product>,
}

impl RegistrationQueue {
    /// Start the registration worker. It stops once every queue handle has
    /// been dropped and the backlog is drained.
    pub fn spawn(gateway: Arc<dyn OffersGateway>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_registrations(rx, gateway));
        (Self { tx }, handle)
    }

    /// Returns false when the registration was dropped
    pub fn enqueue(&self, product: Product) -> bool {
        match self.tx.try_send(product) {
            Ok(()) => true,
            Err(TrySendError::Full(product)) => {
                warn!("Registration queue full, dropping registration of product {}", product.id);
                false
            }
            Err(TrySendError::Closed(product)) => {
                warn!("Registration worker gone, dropping registration of product {}", product.id);
                false
            }
        }
    }
}

async fn run_registrations(mut rx: mpsc::Receiver<Product>, gateway: Arc<dyn OffersGateway>) {
    info!("Registration worker started");

    while let Some(product) = rx.recv().await {
        match gateway.register_product(&product).await {
            Ok(()) => debug!("Registered product {} with offers service", product.id),
            Err(e) => warn!("Failed to register product {}: {}", product.id, e),
        }
    }

    info!("Registration worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shelf_catalog::OfferSnapshot;
    use std::sync::Mutex;
    use tokio::sync::{Notify, Semaphore};
    use crate::OffersError;

    #[derive(Default)]
    struct RecordingGateway {
        registered: Mutex<Vec<i64>>,
        reject: bool,
    }

    #[async_trait]
    impl OffersGateway for RecordingGateway {
        async fn register_product(&self, product: &Product) -> Result<(), OffersError> {
            self.registered.lock().unwrap().push(product.id);
            if self.reject {
                return Err(OffersError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(())
        }

        async fn fetch_offers(&self, _product_id: i64) -> Vec<OfferSnapshot> {
            Vec::new()
        }
    }

    /// Blocks inside `register_product` until the gate opens
    struct GatedGateway {
        started: Notify,
        gate: Semaphore,
        registered: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl OffersGateway for GatedGateway {
        async fn register_product(&self, product: &Product) -> Result<(), OffersError> {
            self.started.notify_one();
            let _permit = self.gate.acquire().await.unwrap();
            self.registered.lock().unwrap().push(product.id);
            Ok(())
        }

        async fn fetch_offers(&self, _product_id: i64) -> Vec<OfferSnapshot> {
            Vec::new()
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("product{}", id),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_queued_products_get_registered_in_order() {
        let gateway = Arc::new(RecordingGateway::default());
        let (queue, worker) = RegistrationQueue::spawn(gateway.clone(), 8);

        assert!(queue.enqueue(product(1)));
        assert!(queue.enqueue(product(2)));
        drop(queue);
        worker.await.unwrap();

        assert_eq!(*gateway.registered.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_rejections_do_not_stop_the_worker() {
        let gateway = Arc::new(RecordingGateway {
            reject: true,
            ..Default::default()
        });
        let (queue, worker) = RegistrationQueue::spawn(gateway.clone(), 8);

        assert!(queue.enqueue(product(1)));
        assert!(queue.enqueue(product(2)));
        drop(queue);
        worker.await.unwrap();

        assert_eq!(*gateway.registered.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking() {
        let gateway = Arc::new(GatedGateway {
            started: Notify::new(),
            gate: Semaphore::new(0),
            registered: Mutex::new(Vec::new()),
        });
        let (queue, worker) = RegistrationQueue::spawn(gateway.clone(), 1);

        assert!(queue.enqueue(product(1)));
        gateway.started.notified().await;

        // Worker is busy with product 1, the single slot takes product 2
        assert!(queue.enqueue(product(2)));
        assert!(!queue.enqueue(product(3)));

        gateway.gate.add_permits(2);
        drop(queue);
        worker.await.unwrap();

        assert_eq!(*gateway.registered.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_enqueue_after_worker_exit() {
        let gateway = Arc::new(RecordingGateway::default());
        let (queue, worker) = RegistrationQueue::spawn(gateway.clone(), 8);
        worker.abort();
        let _ = worker.await;

        assert!(!queue.enqueue(product(1)));
        assert!(gateway.registered.lock().unwrap().is_empty());
    }
}
