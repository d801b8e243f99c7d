use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use shopkit_core::{default_trace, Repository, ServiceError};

use crate::models::{Category, Product};
use crate::service::ProductService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    category_id: Option<u64>,
}

#[derive(Deserialize)]
struct StockParams {
    quantity: u32,
}

/// Assemble the product router over a constructed service.
pub fn router<R>(service: ProductService<R>) -> Router
where
    R: Repository<Product> + Clone + 'static,
{
    Router::new()
        .route(
            "/products",
            get(list_products::<R>).post(create_product::<R>),
        )
        .route(
            "/products/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .route("/products/{id}/stock", put(adjust_stock::<R>))
        .route("/categories", get(list_categories::<R>))
        .layer(default_trace())
        .with_state(service)
}

async fn list_products<R>(
    State(service): State<ProductService<R>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    match params.category_id {
        None => {
            let products = service.list_all().await?;
            if products.is_empty() {
                Ok(StatusCode::NO_CONTENT.into_response())
            } else {
                Ok(Json(products).into_response())
            }
        }
        Some(category_id) => {
            let products = service.list_by_category(category_id).await?;
            Ok(Json(products).into_response())
        }
    }
}

async fn get_product<R>(
    State(service): State<ProductService<R>>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    service.get(id).await.map(Json)
}

async fn create_product<R>(
    State(service): State<ProductService<R>>,
    Json(body): Json<Product>,
) -> Result<(StatusCode, Json<Product>), ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    let created = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product<R>(
    State(service): State<ProductService<R>>,
    Path(id): Path<u64>,
    Json(body): Json<Product>,
) -> Result<Json<Product>, ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    service.update(id, body).await.map(Json)
}

async fn delete_product<R>(
    State(service): State<ProductService<R>>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    service.delete(id).await.map(Json)
}

/// The consistency-critical adjustment route: one atomic decrement applied
/// at the stock's owner.
async fn adjust_stock<R>(
    State(service): State<ProductService<R>>,
    Path(id): Path<u64>,
    Query(params): Query<StockParams>,
) -> Result<Json<Product>, ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    service.adjust_stock(id, params.quantity).await.map(Json)
}

async fn list_categories<R>(
    State(service): State<ProductService<R>>,
) -> Result<Json<Vec<Category>>, ServiceError>
where
    R: Repository<Product> + Clone + 'static,
{
    service.categories().await.map(Json)
}
