// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;
use chrono::Duration;

use crate::{
    common::startup,
    db::{MemoryStore, PgStore, Store},
    domain::skills::SkillMatchPolicy,
    services::{
        account_service::AccountService, approval_service::ApprovalService, auth::AuthService,
        catalog_service::CatalogService, dashboard_service::DashboardService,
        prestation_service::PrestationService, provider_service::ProviderService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

// Configuração lida do ambiente (.env opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_connect_retries: u32,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub skill_policy: SkillMatchPolicy,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store_backend = match get("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("STORE_BACKEND inválido: {}", other),
        };

        let database_url = get("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL deve ser definida");
        }

        let jwt_secret = get("JWT_SECRET")
            .filter(|v| !v.trim().is_empty())
            .context("JWT_SECRET deve ser definido")?;

        let skill_policy = match get("SKILL_MATCH_POLICY") {
            Some(raw) => raw.parse().context("SKILL_MATCH_POLICY")?,
            None => SkillMatchPolicy::default(),
        };

        let token_ttl_hours: i64 = parse_or(&get, "TOKEN_TTL_HOURS", 168)?;

        Ok(Self {
            store_backend,
            database_url,
            jwt_secret,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            db_connect_retries: parse_or(&get, "DB_CONNECT_RETRIES", 10)?,
            token_ttl: Duration::hours(token_ttl_hours),
            bcrypt_cost: parse_or(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            skill_policy,
            admin_email: get("ADMIN_EMAIL").filter(|v| !v.trim().is_empty()),
            admin_password: get("ADMIN_PASSWORD").filter(|v| !v.trim().is_empty()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("valor inválido para {}", key)),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth_service: AuthService,
    pub prestation_service: PrestationService,
    pub catalog_service: CatalogService,
    pub approval_service: ApprovalService,
    pub account_service: AccountService,
    pub provider_service: ProviderService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.store_backend {
            StoreBackend::Postgres => {
                let pool = startup::connect_with_retry(config).await?;
                startup::run_migrations(&pool).await?;
                Arc::new(PgStore::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Usando store em memória: os dados não sobrevivem ao restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(store, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            auth_service: AuthService::new(
                store.clone(),
                config.jwt_secret.clone(),
                config.token_ttl,
                config.bcrypt_cost,
            ),
            prestation_service: PrestationService::new(store.clone(), config.skill_policy),
            catalog_service: CatalogService::new(store.clone()),
            approval_service: ApprovalService::new(store.clone()),
            account_service: AccountService::new(store.clone()),
            provider_service: ProviderService::new(store.clone()),
            dashboard_service: DashboardService::new(store.clone()),
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_for_memory_backend() {
        let config =
            Config::from_lookup(lookup(&[("STORE_BACKEND", "memory"), ("JWT_SECRET", "s")])).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.token_ttl, Duration::hours(168));
        assert_eq!(config.skill_policy, SkillMatchPolicy::Substring);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s")])).is_err());
    }

    #[test]
    fn test_invalid_values_fail_startup() {
        let bad_cost = lookup(&[("STORE_BACKEND", "memory"), ("JWT_SECRET", "s"), ("BCRYPT_COST", "x")]);
        assert!(Config::from_lookup(bad_cost).is_err());

        let bad_policy = lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "s"),
            ("SKILL_MATCH_POLICY", "fuzzy"),
        ]);
        assert!(Config::from_lookup(bad_policy).is_err());
    }
}
