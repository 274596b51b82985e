// src/handlers/company.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::actors::CompanyActor,
    models::{
        parties::Prestataire,
        prestation::{AssignPrestationPayload, Prestation, PrestationDetail, PricingPayload},
    },
    services::prestation_service::Viewer,
};

// GET /api/company/prestations
#[utoipa::path(
    get,
    path = "/api/company/prestations",
    tag = "Company",
    responses((status = 200, description = "Prestations dos services da empresa", body = Vec<Prestation>)),
    security(("api_jwt" = []))
)]
pub async fn list_prestations(
    State(app_state): State<AppState>,
    company: CompanyActor,
) -> Result<Json<Vec<Prestation>>, AppError> {
    Ok(Json(app_state.prestation_service.get_company_prestations(&company).await?))
}

// GET /api/company/prestations/{id}
#[utoipa::path(
    get,
    path = "/api/company/prestations/{id}",
    tag = "Company",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Detalhe", body = PrestationDetail),
        (status = 403, description = "Prestation de outra empresa"),
        (status = 404, description = "Prestation não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_detail(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Path(id): Path<Uuid>,
) -> Result<Json<PrestationDetail>, AppError> {
    let detail = app_state
        .prestation_service
        .detail(Viewer::Company(&company), id)
        .await?;
    Ok(Json(detail))
}

// GET /api/company/providers
#[utoipa::path(
    get,
    path = "/api/company/providers",
    tag = "Company",
    responses((status = 200, description = "Prestataires aprovados disponíveis para atribuição", body = Vec<Prestataire>)),
    security(("api_jwt" = []))
)]
pub async fn assignment_pool(
    State(app_state): State<AppState>,
    company: CompanyActor,
) -> Result<Json<Vec<Prestataire>>, AppError> {
    Ok(Json(app_state.prestation_service.assignment_pool(&company).await?))
}

// POST /api/company/prestations/{id}/assign
#[utoipa::path(
    post,
    path = "/api/company/prestations/{id}/assign",
    tag = "Company",
    request_body = AssignPrestationPayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Atribuída (Assigned)", body = Prestation),
        (status = 403, description = "Prestation de outra empresa"),
        (status = 404, description = "Prestation ou prestataire não encontrado"),
        (status = 422, description = "Transição inválida ou prestataire não aprovado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignPrestationPayload>,
) -> Result<Json<Prestation>, AppError> {
    let prestation = app_state
        .prestation_service
        .assign(&company, id, payload.provider_id)
        .await?;
    Ok(Json(prestation))
}

// PUT /api/company/prestations/{id}/pricing
#[utoipa::path(
    put,
    path = "/api/company/prestations/{id}/pricing",
    tag = "Company",
    request_body = PricingPayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Preço final atualizado", body = Prestation),
        (status = 400, description = "Preço não positivo"),
        (status = 403, description = "Prestation de outra empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_pricing(
    State(app_state): State<AppState>,
    company: CompanyActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<PricingPayload>,
) -> Result<Json<Prestation>, AppError> {
    let prestation = app_state
        .prestation_service
        .update_pricing(&company, id, payload.final_price)
        .await?;
    Ok(Json(prestation))
}
