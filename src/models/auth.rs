// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Client,
    Prestataire,
    Societe,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Client => "Client",
            Role::Prestataire => "Prestataire",
            Role::Societe => "Societe",
        }
    }
}

// Representa uma identidade vinda do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,

    // Lockout é o marcador de "desativado"/"rejeitado"
    pub is_locked: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        !self.is_locked
    }
}

// Dados para registro de um novo usuário.
// Os campos opcionais dependem do tipo de conta escolhido.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@example.com")]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "A senha deve ter entre 6 e 100 caracteres."))]
    pub password: String,

    pub role: Role,

    #[validate(length(min = 1, max = 100, message = "required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "required"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 20, message = "required"))]
    pub phone: String,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    // Prestataire
    #[validate(length(max = 100))]
    #[schema(example = "Plomberie")]
    pub specialty: Option<String>,

    // Societe
    #[validate(length(max = 100))]
    pub company_name: Option<String>,
    #[validate(length(max = 255))]
    pub company_address: Option<String>,
    #[validate(length(max = 50))]
    pub company_registration_number: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // Subject (ID do usuário)
    pub role: Role,  // Apenas informativo; o papel real é relido do banco
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued At
}

// Visão administrativa de um usuário
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRole {
    #[serde(flatten)]
    pub user: User,
    pub is_active: bool,
    // ID do registro de papel (cliente, prestataire, societe), se existir
    pub party_id: Option<Uuid>,
}
