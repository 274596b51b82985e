// src/middleware/actors.rs
//
// Extratores por papel. Cada um re-deriva, a partir da identidade autenticada,
// o registro de papel do chamador (cliente, prestataire, empresa) consultando
// o store. Nunca confiamos num id de dono vindo do cliente HTTP.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{Role, User},
        parties::{Client, Prestataire, Societe},
    },
};

#[derive(Debug, Clone)]
pub struct ClientActor {
    pub user: User,
    pub client: Client,
}

#[derive(Debug, Clone)]
pub struct ProviderActor {
    pub user: User,
    pub provider: Prestataire,
}

#[derive(Debug, Clone)]
pub struct CompanyActor {
    pub user: User,
    pub company: Societe,
}

#[derive(Debug, Clone)]
pub struct AdminActor {
    pub user: User,
}

fn require_role(parts: &Parts, role: Role) -> Result<User, AppError> {
    let AuthenticatedUser(user) = parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    if user.role != role {
        tracing::warn!(user_id = %user.id, required = role.as_str(), actual = user.role.as_str(), "papel incompatível");
        return Err(AppError::forbidden(format!(
            "Você precisa do papel '{}' para realizar esta ação.",
            role.as_str()
        )));
    }
    Ok(user)
}

impl<S> FromRequestParts<S> for ClientActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = require_role(parts, Role::Client)?;
        let app_state = AppState::from_ref(state);
        let client = app_state
            .store
            .find_client_by_user(user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Client"))?;
        Ok(ClientActor { user, client })
    }
}

impl<S> FromRequestParts<S> for ProviderActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = require_role(parts, Role::Prestataire)?;
        let app_state = AppState::from_ref(state);
        let provider = app_state
            .store
            .find_provider_by_user(user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Prestataire"))?;
        Ok(ProviderActor { user, provider })
    }
}

impl<S> FromRequestParts<S> for CompanyActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = require_role(parts, Role::Societe)?;
        let app_state = AppState::from_ref(state);
        let company = app_state
            .store
            .find_company_by_user(user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Societe"))?;
        Ok(CompanyActor { user, company })
    }
}

impl<S> FromRequestParts<S> for AdminActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = require_role(parts, Role::Admin)?;
        Ok(AdminActor { user })
    }
}
