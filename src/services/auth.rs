// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{NewAccount, NewParty, Store},
    models::auth::{Claims, RegisterUserPayload, Role, User},
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl,
            bcrypt_cost,
        }
    }

    /// Cria a identidade + registro de papel e devolve o token.
    /// Prestataire e Societe nascem pendentes de aprovação.
    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<String, AppError> {
        let party = party_for(&payload)?;

        // Hashing fora do runtime assíncrono
        let password_hash = self.hash_password(&payload.password).await?;

        let user = self
            .store
            .register_account(NewAccount {
                email: payload.email,
                password_hash,
                first_name: payload.first_name,
                last_name: payload.last_name,
                phone: payload.phone,
                party,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Conta registrada");
        self.create_token(&user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }
        if user.is_locked {
            tracing::warn!(user_id = %user.id, "Login recusado: conta bloqueada");
            return Err(AppError::AccountLocked);
        }

        self.create_token(&user)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .store
            .find_user_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.is_locked {
            return Err(AppError::AccountLocked);
        }
        Ok(user)
    }

    /// Cria o administrador inicial se o e-mail ainda não existir.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.store.find_user_by_email(email).await?.is_some() {
            tracing::info!("Administrador inicial já existe");
            return Ok(());
        }

        let password_hash = self.hash_password(password).await?;
        let admin = self
            .store
            .register_account(NewAccount {
                email: email.to_owned(),
                password_hash,
                first_name: "Admin".into(),
                last_name: "System".into(),
                phone: "0000000000".into(),
                party: NewParty::Admin,
            })
            .await?;

        tracing::info!(user_id = %admin.id, "Administrador inicial criado");
        Ok(())
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// Campos obrigatórios por tipo de conta
fn party_for(payload: &RegisterUserPayload) -> Result<NewParty, AppError> {
    fn required(value: &Option<String>, field: &'static str) -> Result<String, AppError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .ok_or(AppError::InvalidField {
                field,
                message: "required".into(),
            })
    }

    match payload.role {
        Role::Admin => Err(AppError::forbidden("contas de administrador não podem ser auto-registradas")),
        Role::Client => Ok(NewParty::Client {
            address: payload.address.clone(),
        }),
        Role::Prestataire => Ok(NewParty::Prestataire {
            specialty: required(&payload.specialty, "specialty")?,
        }),
        Role::Societe => Ok(NewParty::Societe {
            name: required(&payload.company_name, "companyName")?,
            address: required(&payload.company_address, "companyAddress")?,
            registration_number: required(
                &payload.company_registration_number,
                "companyRegistrationNumber",
            )?,
        }),
    }
}
