use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use crate::db::{price_queries, product_queries};
use crate::errors::AppError;
use crate::external::price_source::PriceSourceError;
use crate::models::{CreateProductRequest, UpdateThresholdRequest};
use crate::services::product_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products", get(list_products))
        .route("/products/:slug", patch(update_threshold))
        .route("/products/:slug", delete(delete_product))
}

/// Register a StockX URL for tracking. The current price is fetched up
/// front: it seeds the history and becomes the registration-time reference.
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let slug = product_service::slug_from_url(&req.url).ok_or_else(|| {
        AppError::Validation("Could not extract product slug from URL".to_string())
    })?;

    if product_queries::fetch_by_slug(&state.pool, &slug).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Product with slug '{}' already exists",
            slug
        )));
    }

    let threshold = req
        .threshold
        .map(product_service::validate_threshold)
        .transpose()?;

    let price = state
        .scan
        .price_source
        .lowest_ask(&slug)
        .await
        .map_err(|e| match e {
            PriceSourceError::RateLimited => AppError::RateLimited,
            other => AppError::External(format!("Failed to fetch StockX price: {}", other)),
        })?;

    let name = product_service::slug_to_name(&slug);
    let product =
        product_queries::create(&state.pool, &slug, &name, threshold, Some(price)).await?;
    price_queries::insert(&state.pool, product.id, price).await?;

    info!("Now tracking {} at {:.2}", product.slug, price);
    Ok((StatusCode::CREATED, Json(product)))
}

/// All products with last price, display reference and discount.
async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = product_queries::fetch_all(&state.pool).await?;

    let mut summaries = Vec::with_capacity(products.len());
    for product in products {
        summaries.push(product_service::summarize(&state.pool, product).await?);
    }

    Ok(Json(summaries))
}

async fn update_threshold(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateThresholdRequest>,
) -> Result<impl IntoResponse, AppError> {
    let threshold = product_service::validate_threshold(req.threshold)?;

    if !product_queries::update_threshold(&state.pool, &slug, threshold).await? {
        return Err(AppError::NotFound(format!("Product '{}' not found", slug)));
    }

    info!("Threshold for {} set to {}%", slug, threshold);
    Ok(Json(json!({ "ok": true })))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !product_queries::delete_by_slug(&state.pool, &slug).await? {
        return Err(AppError::NotFound(format!("Product '{}' not found", slug)));
    }

    info!("Stopped tracking {}", slug);
    Ok(Json(json!({ "ok": true })))
}
