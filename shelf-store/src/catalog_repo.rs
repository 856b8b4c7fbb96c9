use async_trait::async_trait;
use sqlx::SqlitePool;
use shelf_catalog::{NewProduct, Product, ProductUpdate};
use shelf_core::{CoreError, CoreResult, ProductRepository};
use crate::store_error;

pub struct StoreProductRepository {
    pool: SqlitePool,
}

impl StoreProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

fn product_not_found(id: i64) -> CoreError {
    CoreError::NotFound(format!("Product {}", id))
}

#[async_trait]
impl ProductRepository for StoreProductRepository {
    async fn create_product(&self, product: &NewProduct) -> CoreResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (name, description) VALUES (?1, ?2) RETURNING id, name, description",
        )
        .bind(&product.name)
        .bind(&product.description)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.into())
    }

    async fn get_product(&self, id: i64) -> CoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> CoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> CoreResult<Product> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let mut product: Product = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?
        .ok_or_else(|| product_not_found(id))?
        .into();

        update.apply(&mut product);

        sqlx::query("UPDATE products SET name = ?1, description = ?2 WHERE id = ?3")
            .bind(&product.name)
            .bind(&product.description)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> CoreResult<Product> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let product: Product = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?
        .ok_or_else(|| product_not_found(id))?
        .into();

        // Offers first, the foreign key forbids orphans.
        sqlx::query("DELETE FROM offers WHERE product_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        Ok(product)
    }
}
