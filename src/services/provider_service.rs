// src/services/provider_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::Store,
    middleware::actors::ProviderActor,
    models::parties::{Prestataire, UpdateProviderProfilePayload},
};

#[derive(Clone)]
pub struct ProviderService {
    store: Arc<dyn Store>,
}

impl ProviderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn update_profile(
        &self,
        provider: &ProviderActor,
        payload: UpdateProviderProfilePayload,
    ) -> Result<Prestataire, AppError> {
        if payload.hourly_rate < Decimal::ZERO {
            return Err(AppError::InvalidField {
                field: "hourlyRate",
                message: "A taxa horária não pode ser negativa.".into(),
            });
        }

        let mut profile = provider.provider.clone();
        profile.last_name = payload.last_name;
        profile.first_name = payload.first_name;
        profile.phone = payload.phone;
        profile.specialty = payload.specialty.filter(|s| !s.trim().is_empty());
        profile.hourly_rate = payload.hourly_rate;

        let saved = self.store.update_provider(&profile).await?;
        tracing::info!(provider_id = %saved.id, "Perfil do prestataire atualizado");
        Ok(saved)
    }

    pub async fn set_availability(
        &self,
        provider: &ProviderActor,
        is_available: bool,
    ) -> Result<Prestataire, AppError> {
        let mut profile = provider.provider.clone();
        profile.is_available = is_available;

        let saved = self.store.update_provider(&profile).await?;
        tracing::info!(provider_id = %saved.id, is_available, "Disponibilidade atualizada");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    #[tokio::test]
    async fn test_profile_update_keeps_approval() {
        let store = testing::memory_store();
        let providers = ProviderService::new(store.clone());
        let provider = testing::provider(&store, "Plomberie", true).await;

        let saved = providers
            .update_profile(
                &provider,
                UpdateProviderProfilePayload {
                    last_name: "Martin".into(),
                    first_name: "Luc".into(),
                    phone: "0611111111".into(),
                    specialty: Some("Chauffage".into()),
                    hourly_rate: Decimal::new(4500, 2),
                },
            )
            .await
            .unwrap();

        assert_eq!(saved.specialty.as_deref(), Some("Chauffage"));
        assert_eq!(saved.full_name(), "Luc Martin");
        assert!(saved.is_approved);

        let saved = providers.set_availability(&provider, false).await.unwrap();
        assert!(!saved.is_available);
    }

    #[tokio::test]
    async fn test_negative_rate_is_rejected() {
        let store = testing::memory_store();
        let providers = ProviderService::new(store.clone());
        let provider = testing::provider(&store, "Plomberie", true).await;

        let err = providers
            .update_profile(
                &provider,
                UpdateProviderProfilePayload {
                    last_name: "Martin".into(),
                    first_name: "Luc".into(),
                    phone: "0611111111".into(),
                    specialty: None,
                    hourly_rate: Decimal::new(-1, 0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { field: "hourlyRate", .. }));
    }
}
