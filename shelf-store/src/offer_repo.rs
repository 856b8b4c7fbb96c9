use async_trait::async_trait;
use sqlx::SqlitePool;
use shelf_catalog::Offer;
use shelf_core::{CoreError, CoreResult, OfferRepository};
use crate::store_error;

pub struct StoreOfferRepository {
    pool: SqlitePool,
}

impl StoreOfferRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OfferRow {
    id: i64,
    product_id: i64,
    price: i64,
    items_in_stock: i64,
}

impl From<OfferRow> for Offer {
    fn from(row: OfferRow) -> Self {
        Offer {
            id: row.id,
            price: row.price,
            items_in_stock: row.items_in_stock,
            product_id: row.product_id,
        }
    }
}

#[async_trait]
impl OfferRepository for StoreOfferRepository {
    async fn find_offer(&self, product_id: i64, offer_id: i64) -> CoreResult<Option<Offer>> {
        let row = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT id, product_id, price, items_in_stock
            FROM offers
            WHERE product_id = ?1 AND id = ?2
            "#,
        )
        .bind(product_id)
        .bind(offer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Offer::from))
    }

    async fn insert_offer(
        &self,
        product_id: i64,
        offer_id: i64,
        price: i64,
        items_in_stock: i64,
    ) -> CoreResult<Offer> {
        // Plain INSERT: a duplicate natural key must fail, never overwrite.
        sqlx::query(
            r#"
            INSERT INTO offers (id, product_id, price, items_in_stock)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(offer_id)
        .bind(product_id)
        .bind(price)
        .bind(items_in_stock)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(Offer {
            id: offer_id,
            price,
            items_in_stock,
            product_id,
        })
    }

    async fn update_offer(
        &self,
        existing: &Offer,
        price: i64,
        items_in_stock: i64,
    ) -> CoreResult<Offer> {
        let result = sqlx::query(
            r#"
            UPDATE offers
            SET price = ?1, items_in_stock = ?2
            WHERE product_id = ?3 AND id = ?4
            "#,
        )
        .bind(price)
        .bind(items_in_stock)
        .bind(existing.product_id)
        .bind(existing.id)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "Offer {} of product {}",
                existing.id, existing.product_id
            )));
        }

        Ok(Offer {
            price,
            items_in_stock,
            ..existing.clone()
        })
    }

    async fn list_offers(&self, product_id: i64) -> CoreResult<Vec<Offer>> {
        let rows = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT id, product_id, price, items_in_stock
            FROM offers
            WHERE product_id = ?1
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Offer::from).collect())
    }
}
