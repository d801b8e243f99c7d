use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use shopkit_core::{default_trace, Repository, ServiceError};

use crate::models::{Invoice, InvoiceDetail};
use crate::service::ShoppingService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    customer_id: Option<u64>,
}

/// Assemble the invoice router over a constructed service.
pub fn router<R>(service: ShoppingService<R>) -> Router
where
    R: Repository<Invoice> + Clone + 'static,
{
    Router::new()
        .route("/invoices", get(list_invoices::<R>).post(create_invoice::<R>))
        .route(
            "/invoices/{id}",
            get(get_invoice::<R>)
                .put(update_invoice::<R>)
                .delete(delete_invoice::<R>),
        )
        .layer(default_trace())
        .with_state(service)
}

async fn list_invoices<R>(
    State(service): State<ShoppingService<R>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError>
where
    R: Repository<Invoice> + Clone + 'static,
{
    match params.customer_id {
        None => {
            let invoices = service.list_all().await?;
            if invoices.is_empty() {
                Ok(StatusCode::NO_CONTENT.into_response())
            } else {
                Ok(Json(invoices).into_response())
            }
        }
        Some(customer_id) => {
            let invoices = service.list_by_customer(customer_id).await?;
            Ok(Json(invoices).into_response())
        }
    }
}

async fn get_invoice<R>(
    State(service): State<ShoppingService<R>>,
    Path(id): Path<u64>,
) -> Result<Json<InvoiceDetail>, ServiceError>
where
    R: Repository<Invoice> + Clone + 'static,
{
    service.detail(id).await.map(Json)
}

async fn create_invoice<R>(
    State(service): State<ShoppingService<R>>,
    Json(body): Json<Invoice>,
) -> Result<(StatusCode, Json<Invoice>), ServiceError>
where
    R: Repository<Invoice> + Clone + 'static,
{
    let created = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_invoice<R>(
    State(service): State<ShoppingService<R>>,
    Path(id): Path<u64>,
    Json(body): Json<Invoice>,
) -> Result<Json<Invoice>, ServiceError>
where
    R: Repository<Invoice> + Clone + 'static,
{
    service.update(id, body).await.map(Json)
}

async fn delete_invoice<R>(
    State(service): State<ShoppingService<R>>,
    Path(id): Path<u64>,
) -> Result<Json<Invoice>, ServiceError>
where
    R: Repository<Invoice> + Clone + 'static,
{
    service.delete(id).await.map(Json)
}
