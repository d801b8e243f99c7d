use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use shopkit_core::{default_trace, Repository, ServiceError};

use crate::models::Customer;
use crate::service::CustomerService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    region_id: Option<u64>,
}

/// Assemble the customer router over a constructed service.
pub fn router<R>(service: CustomerService<R>) -> Router
where
    R: Repository<Customer> + Clone + 'static,
{
    Router::new()
        .route(
            "/customers",
            get(list_customers::<R>).post(create_customer::<R>),
        )
        .route(
            "/customers/{id}",
            get(get_customer::<R>)
                .put(update_customer::<R>)
                .delete(delete_customer::<R>),
        )
        .route("/regions", get(list_regions::<R>))
        .layer(default_trace())
        .with_state(service)
}

async fn list_customers<R>(
    State(service): State<CustomerService<R>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError>
where
    R: Repository<Customer> + Clone + 'static,
{
    match params.region_id {
        None => {
            let customers = service.list_all().await?;
            if customers.is_empty() {
                Ok(StatusCode::NO_CONTENT.into_response())
            } else {
                Ok(Json(customers).into_response())
            }
        }
        Some(region_id) => {
            let customers = service.list_by_region(region_id).await?;
            Ok(Json(customers).into_response())
        }
    }
}

async fn get_customer<R>(
    State(service): State<CustomerService<R>>,
    Path(id): Path<u64>,
) -> Result<Json<Customer>, ServiceError>
where
    R: Repository<Customer> + Clone + 'static,
{
    service.get(id).await.map(Json)
}

async fn create_customer<R>(
    State(service): State<CustomerService<R>>,
    Json(body): Json<Customer>,
) -> Result<(StatusCode, Json<Customer>), ServiceError>
where
    R: Repository<Customer> + Clone + 'static,
{
    let created = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_customer<R>(
    State(service): State<CustomerService<R>>,
    Path(id): Path<u64>,
    Json(body): Json<Customer>,
) -> Result<Json<Customer>, ServiceError>
where
    R: Repository<Customer> + Clone + 'static,
{
    service.update(id, body).await.map(Json)
}

async fn delete_customer<R>(
    State(service): State<CustomerService<R>>,
    Path(id): Path<u64>,
) -> Result<Json<Customer>, ServiceError>
where
    R: Repository<Customer> + Clone + 'static,
{
    service.delete(id).await.map(Json)
}

async fn list_regions<R>(
    State(service): State<CustomerService<R>>,
) -> Result<Json<Vec<crate::models::Region>>, ServiceError>
where
    R: Repository<Customer> + Clone + 'static,
{
    service.regions().await.map(Json)
}
