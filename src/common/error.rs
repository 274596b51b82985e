// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::prestation::PrestationStatus;

// Taxonomia de erros do sistema.
// Existência é revelada de forma consistente: registro ausente => 404,
// registro de outro dono => 403.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campo inválido '{field}': {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("{0} não encontrado")]
    NotFound(String),

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Transição inválida: {from:?} -> {to:?}")]
    InvalidTransition {
        from: PrestationStatus,
        to: PrestationStatus,
    },

    #[error("Regra de fluxo violada: {0}")]
    WorkflowViolation(String),

    #[error("O registro foi alterado por outra requisição")]
    ConcurrentModification,

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta bloqueada")]
    AccountLocked,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        AppError::Forbidden(reason.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidTransition { .. } | AppError::WorkflowViolation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ConcurrentModification
            | AppError::Conflict(_)
            | AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::AccountLocked => StatusCode::LOCKED,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidField { field, ref message } => json!({
                "error": "Um ou mais campos são inválidos.",
                "details": { field: [message] },
            }),
            AppError::InvalidTransition { from, to } => json!({
                "error": "Transição de status não permitida.",
                "details": { "from": from, "to": to },
            }),

            // Erros de infraestrutura viram 500 genérico; o detalhe fica no log.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }

            ref e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_forbidden_are_distinct() {
        assert_eq!(AppError::not_found("Prestation").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::forbidden("outro dono").status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_workflow_errors_map_to_unprocessable() {
        let err = AppError::InvalidTransition {
            from: PrestationStatus::Validated,
            to: PrestationStatus::Cancelled,
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::ConcurrentModification.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("segredo")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
