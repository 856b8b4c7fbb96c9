use async_trait::async_trait;
use reqwest::StatusCode;
use shelf_catalog::{OfferSnapshot, Product};
use shelf_store::app_config::OffersConfig;
use tracing::{debug, warn};
use crate::OffersError;

/// Header the offers service reads the access token from
const ACCESS_TOKEN_HEADER: &str = "Bearer";

/// Gateway to the remote offers service
#[async_trait]
pub trait OffersGateway: Send + Sync {
    /// Announce a newly created product to the offers service
    async fn register_product(&self, product: &Product) -> Result<(), OffersError>;

    /// Current offers for a product. Any failure yields an empty list.
    async fn fetch_offers(&self, product_id: i64) -> Vec<OfferSnapshot>;
}

pub struct OffersClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl OffersClient {
    pub fn new(config: &OffersConfig) -> Result<Self, OffersError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    async fn try_fetch_offers(&self, product_id: i64) -> Result<Vec<OfferSnapshot>, OffersError> {
        let url = format!("{}/products/{}/offers", self.base_url, product_id);
        let response = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(OffersError::Status(response.status()));
        }

        Ok(response.json::<Vec<OfferSnapshot>>().await?)
    }
}

#[async_trait]
impl OffersGateway for OffersClient {
    async fn register_product(&self, product: &Product) -> Result<(), OffersError> {
        let url = format!("{}/products/register", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(product)
            .send()
            .await?;

        // The body is never read.
        if !response.status().is_success() {
            return Err(OffersError::Status(response.status()));
        }
        Ok(())
    }

    async fn fetch_offers(&self, product_id: i64) -> Vec<OfferSnapshot> {
        match self.try_fetch_offers(product_id).await {
            Ok(snapshots) => {
                debug!("Fetched {} offers for product {}", snapshots.len(), product_id);
                snapshots
            }
            Err(e) => {
                warn!("Offers unavailable for product {}: {}", product_id, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(uri: &str, timeout_seconds: u64) -> OffersClient {
        OffersClient::new(&OffersConfig {
            base_url: uri.to_string(),
            access_token: "test-token".to_string(),
            timeout_seconds,
        })
        .unwrap()
    }

    fn product() -> Product {
        Product {
            id: 1,
            name: "p1".to_string(),
            description: "first product".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_offers_decodes_success_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1/offers"))
            .and(header("Bearer", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 10, "price": 500, "items_in_stock": 3 },
                { "id": 11, "price": 650, "items_in_stock": 0 }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let offers = client_for(&mock_server.uri(), 5).fetch_offers(1).await;

        assert_eq!(
            offers,
            vec![
                OfferSnapshot { id: 10, price: 500, items_in_stock: 3 },
                OfferSnapshot { id: 11, price: 650, items_in_stock: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_offers_non_200_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1/offers"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/2/offers"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), 5);
        assert!(client.fetch_offers(1).await.is_empty());
        assert!(client.fetch_offers(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_offers_other_success_status_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1/offers"))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!([
                { "id": 10, "price": 500, "items_in_stock": 3 }
            ])))
            .mount(&mock_server)
            .await;

        assert!(client_for(&mock_server.uri(), 5).fetch_offers(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_offers_undecodable_body_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1/offers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        assert!(client_for(&mock_server.uri(), 5).fetch_offers(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_offers_unreachable_service_is_empty() {
        let client = client_for("http://127.0.0.1:1", 5);

        let err = client.try_fetch_offers(1).await.unwrap_err();
        assert!(matches!(err, OffersError::Transport(_)));
        assert!(client.fetch_offers(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_offers_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1/offers"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), 1);
        let err = client.try_fetch_offers(1).await.unwrap_err();
        assert!(matches!(err, OffersError::Transport(ref e) if e.is_timeout()));
        assert!(client.fetch_offers(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_register_product_posts_identity() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products/register"))
            .and(header("Bearer", "test-token"))
            .and(body_json(serde_json::json!({
                "id": 1,
                "name": "p1",
                "description": "first product"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base = format!("{}/", mock_server.uri());
        client_for(&base, 5).register_product(&product()).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_product_reports_rejection() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products/register"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server.uri(), 5)
            .register_product(&product())
            .await
            .unwrap_err();
        assert!(matches!(err, OffersError::Status(StatusCode::UNAUTHORIZED)));
    }
}
