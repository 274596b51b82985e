// src/services/approval_service.rs
//
// Aprovação de Prestataires e Societes pelo administrador.
// Rejeitar = bloquear a conta; reativar a conta devolve o cadastro à fila.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    domain::approval::{self, ApprovalStamp, ApprovalState},
    middleware::actors::AdminActor,
    models::parties::{Prestataire, Societe},
};

#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<dyn Store>,
}

impl ApprovalService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn pending_providers(&self, _admin: &AdminActor) -> Result<Vec<Prestataire>, AppError> {
        self.store.list_pending_providers().await
    }

    pub async fn pending_companies(&self, _admin: &AdminActor) -> Result<Vec<Societe>, AppError> {
        self.store.list_pending_companies().await
    }

    pub async fn approve_provider(&self, admin: &AdminActor, id: Uuid) -> Result<Prestataire, AppError> {
        let provider = self.find_provider(id).await?;
        let state = self.state_of(provider.is_approved, provider.user_id).await?;
        approval::ensure_pending(state)?;

        let approved = self.store.approve_provider(id, stamp(admin)).await?;
        tracing::info!(provider_id = %id, approved_by = %admin.user.id, "Prestataire aprovado");
        Ok(approved)
    }

    pub async fn reject_provider(&self, admin: &AdminActor, id: Uuid) -> Result<ApprovalState, AppError> {
        let provider = self.find_provider(id).await?;
        let state = self.state_of(provider.is_approved, provider.user_id).await?;
        approval::ensure_pending(state)?;

        self.store.set_user_locked(provider.user_id, true).await?;
        tracing::info!(provider_id = %id, rejected_by = %admin.user.id, "Prestataire rejeitado");
        Ok(ApprovalState::Rejected)
    }

    pub async fn approve_company(&self, admin: &AdminActor, id: Uuid) -> Result<Societe, AppError> {
        let company = self.find_company(id).await?;
        let state = self.state_of(company.is_approved, company.user_id).await?;
        approval::ensure_pending(state)?;

        let approved = self.store.approve_company(id, stamp(admin)).await?;
        tracing::info!(company_id = %id, approved_by = %admin.user.id, "Societe aprovada");
        Ok(approved)
    }

    pub async fn reject_company(&self, admin: &AdminActor, id: Uuid) -> Result<ApprovalState, AppError> {
        let company = self.find_company(id).await?;
        let state = self.state_of(company.is_approved, company.user_id).await?;
        approval::ensure_pending(state)?;

        self.store.set_user_locked(company.user_id, true).await?;
        tracing::info!(company_id = %id, rejected_by = %admin.user.id, "Societe rejeitada");
        Ok(ApprovalState::Rejected)
    }

    async fn find_provider(&self, id: Uuid) -> Result<Prestataire, AppError> {
        self.store
            .find_provider(id)
            .await?
            .ok_or_else(|| AppError::not_found("Prestataire"))
    }

    async fn find_company(&self, id: Uuid) -> Result<Societe, AppError> {
        self.store
            .find_company(id)
            .await?
            .ok_or_else(|| AppError::not_found("Societe"))
    }

    async fn state_of(&self, is_approved: bool, user_id: Uuid) -> Result<ApprovalState, AppError> {
        let locked = self
            .store
            .find_user_by_id(user_id)
            .await?
            .is_some_and(|u| u.is_locked);
        Ok(ApprovalState::derive(is_approved, locked))
    }
}

fn stamp(admin: &AdminActor) -> ApprovalStamp {
    ApprovalStamp {
        approved_by: admin.user.id,
        approved_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    #[tokio::test]
    async fn test_approve_stamps_and_leaves_queue() {
        let store = testing::memory_store();
        let approvals = ApprovalService::new(store.clone());
        let admin = testing::admin(&store).await;
        let provider = testing::provider(&store, "Plomberie", false).await;

        assert_eq!(approvals.pending_providers(&admin).await.unwrap().len(), 1);

        let approved = approvals.approve_provider(&admin, provider.provider.id).await.unwrap();
        assert!(approved.is_approved);
        assert_eq!(approved.approved_by, Some(admin.user.id));
        assert!(approved.approved_at.is_some());
        assert!(approvals.pending_providers(&admin).await.unwrap().is_empty());

        // Segunda aprovação é recusada
        assert!(matches!(
            approvals.approve_provider(&admin, provider.provider.id).await,
            Err(AppError::WorkflowViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_reject_locks_and_reactivation_requeues() {
        let store = testing::memory_store();
        let approvals = ApprovalService::new(store.clone());
        let admin = testing::admin(&store).await;
        let company = testing::company(&store, false).await;

        let state = approvals.reject_company(&admin, company.company.id).await.unwrap();
        assert_eq!(state, ApprovalState::Rejected);
        assert!(approvals.pending_companies(&admin).await.unwrap().is_empty());
        assert!(store.find_user_by_id(company.user.id).await.unwrap().unwrap().is_locked);

        // Rejeitada não pode ser aprovada sem antes reativar a conta
        assert!(matches!(
            approvals.approve_company(&admin, company.company.id).await,
            Err(AppError::WorkflowViolation(_))
        ));

        store.set_user_locked(company.user.id, false).await.unwrap();
        assert_eq!(approvals.pending_companies(&admin).await.unwrap().len(), 1);
        assert!(approvals.approve_company(&admin, company.company.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = testing::memory_store();
        let approvals = ApprovalService::new(store.clone());
        let admin = testing::admin(&store).await;

        assert!(matches!(
            approvals.approve_company(&admin, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            approvals.reject_provider(&admin, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
