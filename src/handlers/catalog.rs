// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::actors::CompanyActor,
    models::catalog::{Service, ServiceListing, ServicePayload},
};

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Services reserváveis (ativos, de empresas aprovadas)", body = Vec<ServiceListing>)
    )
)]
pub async fn list_bookable(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ServiceListing>>, AppError> {
    let listing = app_state.catalog_service.list_bookable().await?;
    Ok(Json(listing))
}

// POST /api/company/services
#[utoipa::path(
    post,
    path = "/api/company/services",
    tag = "Catalog",
    request_body = ServicePayload,
    responses(
        (status = 201, description = "Service criado", body = Service),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Apenas empresas")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Json(payload): Json<ServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = app_state.catalog_service.create_service(&company, payload).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/company/services
#[utoipa::path(
    get,
    path = "/api/company/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Services da empresa", body = Vec<Service>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_services(
    State(app_state): State<AppState>,
    company: CompanyActor,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = app_state.catalog_service.list_company_services(&company).await?;
    Ok(Json(services))
}

// GET /api/company/services/{id}
#[utoipa::path(
    get,
    path = "/api/company/services/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do Service")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 403, description = "Service de outra empresa"),
        (status = 404, description = "Service não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_service(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, AppError> {
    let service = app_state.catalog_service.get_company_service(&company, id).await?;
    Ok(Json(service))
}

// PUT /api/company/services/{id}
#[utoipa::path(
    put,
    path = "/api/company/services/{id}",
    tag = "Catalog",
    request_body = ServicePayload,
    params(("id" = Uuid, Path, description = "ID do Service")),
    responses(
        (status = 200, description = "Service atualizado", body = Service),
        (status = 403, description = "Service de outra empresa"),
        (status = 404, description = "Service não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<Service>, AppError> {
    payload.validate()?;

    let service = app_state
        .catalog_service
        .update_service(&company, id, payload)
        .await?;

    Ok(Json(service))
}

// DELETE /api/company/services/{id}
#[utoipa::path(
    delete,
    path = "/api/company/services/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do Service")),
    responses(
        (status = 204, description = "Service removido"),
        (status = 403, description = "Service de outra empresa"),
        (status = 409, description = "Service com prestations vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_service(&company, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
