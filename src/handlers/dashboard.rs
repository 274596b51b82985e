// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::actors::{AdminActor, ClientActor, CompanyActor, ProviderActor},
    models::dashboard::{AdminDashboard, ClientDashboard, CompanyDashboard, ProviderDashboard},
};

// GET /api/dashboard/admin
#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Visão geral da plataforma", body = AdminDashboard),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_dashboard(
    State(app_state): State<AppState>,
    admin: AdminActor,
) -> Result<Json<AdminDashboard>, AppError> {
    Ok(Json(app_state.dashboard_service.admin(&admin).await?))
}

// GET /api/dashboard/company
#[utoipa::path(
    get,
    path = "/api/dashboard/company",
    tag = "Dashboard",
    responses((status = 200, description = "Resumo da empresa", body = CompanyDashboard)),
    security(("api_jwt" = []))
)]
pub async fn company_dashboard(
    State(app_state): State<AppState>,
    company: CompanyActor,
) -> Result<Json<CompanyDashboard>, AppError> {
    Ok(Json(app_state.dashboard_service.company(&company).await?))
}

// GET /api/dashboard/provider
#[utoipa::path(
    get,
    path = "/api/dashboard/provider",
    tag = "Dashboard",
    responses((status = 200, description = "Resumo do prestataire", body = ProviderDashboard)),
    security(("api_jwt" = []))
)]
pub async fn provider_dashboard(
    State(app_state): State<AppState>,
    provider: ProviderActor,
) -> Result<Json<ProviderDashboard>, AppError> {
    Ok(Json(app_state.dashboard_service.provider(&provider).await?))
}

// GET /api/dashboard/client
#[utoipa::path(
    get,
    path = "/api/dashboard/client",
    tag = "Dashboard",
    responses((status = 200, description = "Resumo do cliente", body = ClientDashboard)),
    security(("api_jwt" = []))
)]
pub async fn client_dashboard(
    State(app_state): State<AppState>,
    client: ClientActor,
) -> Result<Json<ClientDashboard>, AppError> {
    Ok(Json(app_state.dashboard_service.client(&client).await?))
}
