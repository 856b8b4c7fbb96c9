use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shelf_catalog::{NewProduct, Product, ProductOffers, ProductUpdate};
use shelf_core::CoreError;
use crate::{error::AppError, state::AppState};

const PRODUCT_NOT_FOUND: &str = "Product not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(read_products).post(create_product))
        .route(
            "/products/{product_id}",
            get(read_product).put(update_product).delete(remove_product),
        )
        .route("/products/{product_id}/offers", get(read_product_offers))
}

fn product_error(err: CoreError) -> AppError {
    if err.is_not_found() {
        AppError::NotFoundError(PRODUCT_NOT_FOUND.to_string())
    } else {
        err.into()
    }
}

async fn find_product(state: &AppState, product_id: i64) -> Result<Product, AppError> {
    state
        .products
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(PRODUCT_NOT_FOUND.to_string()))
}

/// POST /products
/// The product is committed before its registration with the offers
/// service is queued.
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products.create_product(&req).await?;
    tracing::info!("Created product {}", product.id);

    state.registrations.enqueue(product.clone());

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products
async fn read_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list_products().await?))
}

/// GET /products/{product_id}
async fn read_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(find_product(&state, product_id).await?))
}

/// PUT /products/{product_id}
async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(req): Json<ProductUpdate>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products
        .update_product(product_id, &req)
        .await
        .map_err(product_error)?;

    Ok(Json(product))
}

/// DELETE /products/{product_id}
/// Deletes the product's offers along with it.
async fn remove_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products
        .delete_product(product_id)
        .await
        .map_err(product_error)?;
    tracing::info!("Removed product {}", product.id);

    Ok(Json(product))
}

/// GET /products/{product_id}/offers
/// The offers as last synchronized, with no call to the offers service.
async fn read_product_offers(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductOffers>, AppError> {
    let product = find_product(&state, product_id).await?;
    let offers = state.offers.list_offers(product.id).await?;

    Ok(Json(ProductOffers::new(product, offers)))
}
