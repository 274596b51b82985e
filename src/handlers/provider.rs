// src/handlers/provider.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::actors::ProviderActor,
    models::{
        parties::{AvailabilityPayload, Prestataire, UpdateProviderProfilePayload},
        prestation::{
            PausePayload, Prestation, PrestationDetail, ProgressPayload, ReviewResponsePayload,
            UpdateStatusPayload,
        },
    },
    services::prestation_service::Viewer,
};

// =============================================================================
//  1. PERFIL
// =============================================================================

// GET /api/provider/profile
#[utoipa::path(
    get,
    path = "/api/provider/profile",
    tag = "Provider",
    responses((status = 200, description = "Perfil do prestataire", body = Prestataire)),
    security(("api_jwt" = []))
)]
pub async fn get_profile(provider: ProviderActor) -> Json<Prestataire> {
    Json(provider.provider)
}

// PUT /api/provider/profile
#[utoipa::path(
    put,
    path = "/api/provider/profile",
    tag = "Provider",
    request_body = UpdateProviderProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = Prestataire),
        (status = 400, description = "Campos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Json(payload): Json<UpdateProviderProfilePayload>,
) -> Result<Json<Prestataire>, AppError> {
    payload.validate()?;
    let saved = app_state.provider_service.update_profile(&provider, payload).await?;
    Ok(Json(saved))
}

// PUT /api/provider/availability
#[utoipa::path(
    put,
    path = "/api/provider/availability",
    tag = "Provider",
    request_body = AvailabilityPayload,
    responses((status = 200, description = "Disponibilidade atualizada", body = Prestataire)),
    security(("api_jwt" = []))
)]
pub async fn set_availability(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Json(payload): Json<AvailabilityPayload>,
) -> Result<Json<Prestataire>, AppError> {
    let saved = app_state
        .provider_service
        .set_availability(&provider, payload.is_available)
        .await?;
    Ok(Json(saved))
}

// =============================================================================
//  2. CONSULTAS
// =============================================================================

// GET /api/provider/prestations
#[utoipa::path(
    get,
    path = "/api/provider/prestations",
    tag = "Provider",
    responses((status = 200, description = "Prestations atribuídas", body = Vec<Prestation>)),
    security(("api_jwt" = []))
)]
pub async fn list_assigned(
    State(app_state): State<AppState>,
    provider: ProviderActor,
) -> Result<Json<Vec<Prestation>>, AppError> {
    Ok(Json(app_state.prestation_service.get_assigned(&provider).await?))
}

// GET /api/provider/prestations/available
#[utoipa::path(
    get,
    path = "/api/provider/prestations/available",
    tag = "Provider",
    responses((status = 200, description = "Pool compatível com a especialidade", body = Vec<Prestation>)),
    security(("api_jwt" = []))
)]
pub async fn list_available(
    State(app_state): State<AppState>,
    provider: ProviderActor,
) -> Result<Json<Vec<Prestation>>, AppError> {
    Ok(Json(app_state.prestation_service.get_available(&provider).await?))
}

// GET /api/provider/prestations/{id}
#[utoipa::path(
    get,
    path = "/api/provider/prestations/{id}",
    tag = "Provider",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Detalhe", body = PrestationDetail),
        (status = 403, description = "Atribuída a outro prestataire"),
        (status = 404, description = "Prestation não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_detail(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
) -> Result<Json<PrestationDetail>, AppError> {
    let detail = app_state
        .prestation_service
        .detail(Viewer::Provider(&provider), id)
        .await?;
    Ok(Json(detail))
}

// =============================================================================
//  3. CICLO DE VIDA
// =============================================================================

// POST /api/provider/prestations/{id}/claim
#[utoipa::path(
    post,
    path = "/api/provider/prestations/{id}/claim",
    tag = "Provider",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Reservada (continua Planned)", body = Prestation),
        (status = 403, description = "Não aprovado, especialidade incompatível ou de outro prestataire"),
        (status = 422, description = "Não está livre ou o service não está mais disponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn claim(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Prestation>, AppError> {
    Ok(Json(app_state.prestation_service.claim(&provider, id).await?))
}

// POST /api/provider/prestations/{id}/accept
#[utoipa::path(
    post,
    path = "/api/provider/prestations/{id}/accept",
    tag = "Provider",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Aceita (Assigned)", body = Prestation),
        (status = 403, description = "Não aprovado ou não vinculado a este prestataire"),
        (status = 422, description = "Transição inválida ou service indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn accept(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Prestation>, AppError> {
    Ok(Json(app_state.prestation_service.accept(&provider, id).await?))
}

// POST /api/provider/prestations/{id}/refuse
#[utoipa::path(
    post,
    path = "/api/provider/prestations/{id}/refuse",
    tag = "Provider",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Devolvida ao pool (Planned)", body = Prestation),
        (status = 403, description = "Não atribuída a este prestataire")
    ),
    security(("api_jwt" = []))
)]
pub async fn refuse(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Prestation>, AppError> {
    Ok(Json(app_state.prestation_service.refuse(&provider, id).await?))
}

// PUT /api/provider/prestations/{id}/status
#[utoipa::path(
    put,
    path = "/api/provider/prestations/{id}/status",
    tag = "Provider",
    request_body = UpdateStatusPayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Status atualizado", body = Prestation),
        (status = 409, description = "Alterada por outra requisição"),
        (status = 422, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<Prestation>, AppError> {
    payload.validate()?;
    let prestation = app_state
        .prestation_service
        .update_status(&provider, id, payload)
        .await?;
    Ok(Json(prestation))
}

// POST /api/provider/prestations/{id}/progress
#[utoipa::path(
    post,
    path = "/api/provider/prestations/{id}/progress",
    tag = "Provider",
    request_body = ProgressPayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses((status = 200, description = "Entrada adicionada ao diário", body = Prestation)),
    security(("api_jwt" = []))
)]
pub async fn record_progress(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProgressPayload>,
) -> Result<Json<Prestation>, AppError> {
    payload.validate()?;
    let prestation = app_state
        .prestation_service
        .record_progress(&provider, id, payload.note)
        .await?;
    Ok(Json(prestation))
}

// PUT /api/provider/prestations/{id}/pause
#[utoipa::path(
    put,
    path = "/api/provider/prestations/{id}/pause",
    tag = "Provider",
    request_body = PausePayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Pausa atualizada", body = Prestation),
        (status = 422, description = "Prestation não está em execução")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_paused(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<PausePayload>,
) -> Result<Json<Prestation>, AppError> {
    let prestation = app_state
        .prestation_service
        .set_paused(&provider, id, payload.paused)
        .await?;
    Ok(Json(prestation))
}

// POST /api/provider/prestations/{id}/review-response
#[utoipa::path(
    post,
    path = "/api/provider/prestations/{id}/review-response",
    tag = "Provider",
    request_body = ReviewResponsePayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses((status = 200, description = "Resposta registrada", body = Prestation)),
    security(("api_jwt" = []))
)]
pub async fn respond_to_review(
    State(app_state): State<AppState>,
    provider: ProviderActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewResponsePayload>,
) -> Result<Json<Prestation>, AppError> {
    payload.validate()?;
    let prestation = app_state
        .prestation_service
        .respond_to_review(&provider, id, &payload.response)
        .await?;
    Ok(Json(prestation))
}
