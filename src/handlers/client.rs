// src/handlers/client.rs

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
    middleware::actors::ClientActor,
    models::prestation::{
        CreatePrestationPayload, Prestation, PrestationDetail, RatePrestationPayload,
    },
    services::prestation_service::Viewer,
};

// POST /api/client/prestations
#[utoipa::path(
    post,
    path = "/api/client/prestations",
    tag = "Client",
    request_body = CreatePrestationPayload,
    responses(
        (status = 201, description = "Prestation criada (Planned)", body = Prestation),
        (status = 404, description = "Service não encontrado"),
        (status = 422, description = "Service inativo ou empresa não aprovada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    client: ClientActor,
    Json(payload): Json<CreatePrestationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prestation = app_state
        .prestation_service
        .create_request(&client, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(prestation)))
}

// GET /api/client/prestations
#[utoipa::path(
    get,
    path = "/api/client/prestations",
    tag = "Client",
    responses((status = 200, description = "Histórico do cliente", body = Vec<Prestation>)),
    security(("api_jwt" = []))
)]
pub async fn list_history(
    State(app_state): State<AppState>,
    client: ClientActor,
) -> Result<Json<Vec<Prestation>>, AppError> {
    Ok(Json(app_state.prestation_service.get_history(&client).await?))
}

// GET /api/client/prestations/active
#[utoipa::path(
    get,
    path = "/api/client/prestations/active",
    tag = "Client",
    responses((status = 200, description = "Prestations em aberto", body = Vec<Prestation>)),
    security(("api_jwt" = []))
)]
pub async fn list_active(
    State(app_state): State<AppState>,
    client: ClientActor,
) -> Result<Json<Vec<Prestation>>, AppError> {
    Ok(Json(app_state.prestation_service.get_client_active(&client).await?))
}

// GET /api/client/prestations/{id}
#[utoipa::path(
    get,
    path = "/api/client/prestations/{id}",
    tag = "Client",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Detalhe", body = PrestationDetail),
        (status = 403, description = "Prestation de outro cliente"),
        (status = 404, description = "Prestation não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_detail(
    State(app_state): State<AppState>,
    client: ClientActor,
    Path(id): Path<Uuid>,
) -> Result<Json<PrestationDetail>, AppError> {
    let detail = app_state
        .prestation_service
        .detail(Viewer::Client(&client), id)
        .await?;
    Ok(Json(detail))
}

// POST /api/client/prestations/{id}/rate
#[utoipa::path(
    post,
    path = "/api/client/prestations/{id}/rate",
    tag = "Client",
    request_body = RatePrestationPayload,
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Avaliação registrada", body = Prestation),
        (status = 400, description = "Nota fora de [1,5]"),
        (status = 409, description = "Alterada por outra requisição"),
        (status = 422, description = "Prestation ainda não concluída")
    ),
    security(("api_jwt" = []))
)]
pub async fn rate(
    State(app_state): State<AppState>,
    client: ClientActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<RatePrestationPayload>,
) -> Result<Json<Prestation>, AppError> {
    let prestation = app_state
        .prestation_service
        .rate(&client, id, payload.rating, payload.feedback)
        .await?;
    Ok(Json(prestation))
}

// POST /api/client/prestations/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/client/prestations/{id}/cancel",
    tag = "Client",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Prestation cancelada", body = Prestation),
        (status = 422, description = "Já concluída ou validada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel(
    State(app_state): State<AppState>,
    client: ClientActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Prestation>, AppError> {
    let prestation = app_state.prestation_service.cancel(&client, id).await?;
    Ok(Json(prestation))
}
