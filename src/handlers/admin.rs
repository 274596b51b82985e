// src/handlers/admin.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    domain::approval::ApprovalState,
    middleware::actors::AdminActor,
    models::{
        auth::UserWithRole,
        parties::{Prestataire, Societe},
        prestation::{Prestation, PrestationDetail},
    },
    services::prestation_service::Viewer,
};

// =============================================================================
//  1. CONTAS
// =============================================================================

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses((status = 200, description = "Usuários com papel e status", body = Vec<UserWithRole>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    admin: AdminActor,
) -> Result<Json<Vec<UserWithRole>>, AppError> {
    Ok(Json(app_state.account_service.list_users(&admin).await?))
}

// POST /api/admin/users/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/deactivate",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Conta bloqueada"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.account_service.deactivate(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/admin/users/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reactivate",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Conta desbloqueada"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reactivate_user(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.account_service.reactivate(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Conta e dados vinculados removidos"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.account_service.delete_account(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. APROVAÇÕES
// =============================================================================

// GET /api/admin/approvals/providers
#[utoipa::path(
    get,
    path = "/api/admin/approvals/providers",
    tag = "Admin",
    responses((status = 200, description = "Prestataires pendentes", body = Vec<Prestataire>)),
    security(("api_jwt" = []))
)]
pub async fn pending_providers(
    State(app_state): State<AppState>,
    admin: AdminActor,
) -> Result<Json<Vec<Prestataire>>, AppError> {
    Ok(Json(app_state.approval_service.pending_providers(&admin).await?))
}

// POST /api/admin/approvals/providers/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/approvals/providers/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do Prestataire")),
    responses(
        (status = 200, description = "Aprovado", body = Prestataire),
        (status = 422, description = "Cadastro não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_provider(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Prestataire>, AppError> {
    Ok(Json(app_state.approval_service.approve_provider(&admin, id).await?))
}

// POST /api/admin/approvals/providers/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/approvals/providers/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do Prestataire")),
    responses(
        (status = 200, description = "Rejeitado (conta bloqueada)", body = ApprovalState),
        (status = 422, description = "Cadastro não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_provider(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApprovalState>, AppError> {
    Ok(Json(app_state.approval_service.reject_provider(&admin, id).await?))
}

// GET /api/admin/approvals/companies
#[utoipa::path(
    get,
    path = "/api/admin/approvals/companies",
    tag = "Admin",
    responses((status = 200, description = "Societes pendentes", body = Vec<Societe>)),
    security(("api_jwt" = []))
)]
pub async fn pending_companies(
    State(app_state): State<AppState>,
    admin: AdminActor,
) -> Result<Json<Vec<Societe>>, AppError> {
    Ok(Json(app_state.approval_service.pending_companies(&admin).await?))
}

// POST /api/admin/approvals/companies/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/approvals/companies/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da Societe")),
    responses(
        (status = 200, description = "Aprovada", body = Societe),
        (status = 422, description = "Cadastro não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_company(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Societe>, AppError> {
    Ok(Json(app_state.approval_service.approve_company(&admin, id).await?))
}

// POST /api/admin/approvals/companies/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/approvals/companies/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da Societe")),
    responses(
        (status = 200, description = "Rejeitada (conta bloqueada)", body = ApprovalState),
        (status = 422, description = "Cadastro não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_company(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApprovalState>, AppError> {
    Ok(Json(app_state.approval_service.reject_company(&admin, id).await?))
}

// =============================================================================
//  3. PRESTATIONS
// =============================================================================

// GET /api/admin/prestations
#[utoipa::path(
    get,
    path = "/api/admin/prestations",
    tag = "Admin",
    responses((status = 200, description = "Todas as prestations", body = Vec<Prestation>)),
    security(("api_jwt" = []))
)]
pub async fn list_prestations(
    State(app_state): State<AppState>,
    admin: AdminActor,
) -> Result<Json<Vec<Prestation>>, AppError> {
    Ok(Json(app_state.prestation_service.get_all(&admin).await?))
}

// GET /api/admin/prestations/{id}
#[utoipa::path(
    get,
    path = "/api/admin/prestations/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da Prestation")),
    responses(
        (status = 200, description = "Detalhe", body = PrestationDetail),
        (status = 404, description = "Prestation não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_prestation(
    State(app_state): State<AppState>,
    admin: AdminActor,
    Path(id): Path<Uuid>,
) -> Result<Json<PrestationDetail>, AppError> {
    let detail = app_state
        .prestation_service
        .detail(Viewer::Admin(&admin), id)
        .await?;
    Ok(Json(detail))
}
