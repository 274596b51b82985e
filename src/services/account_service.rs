// src/services/account_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    middleware::actors::AdminActor,
    models::auth::{Role, UserWithRole},
};

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self, _admin: &AdminActor) -> Result<Vec<UserWithRole>, AppError> {
        let users = self.store.list_users().await?;

        let mut result = Vec::with_capacity(users.len());
        for user in users {
            let party_id = match user.role {
                Role::Admin => None,
                Role::Client => self.store.find_client_by_user(user.id).await?.map(|c| c.id),
                Role::Prestataire => self.store.find_provider_by_user(user.id).await?.map(|p| p.id),
                Role::Societe => self.store.find_company_by_user(user.id).await?.map(|c| c.id),
            };
            result.push(UserWithRole {
                is_active: user.is_active(),
                party_id,
                user,
            });
        }
        Ok(result)
    }

    pub async fn deactivate(&self, admin: &AdminActor, user_id: Uuid) -> Result<(), AppError> {
        ensure_not_self(admin, user_id)?;
        self.set_locked(user_id, true).await?;
        tracing::info!(%user_id, by = %admin.user.id, "Conta desativada");
        Ok(())
    }

    pub async fn reactivate(&self, admin: &AdminActor, user_id: Uuid) -> Result<(), AppError> {
        self.set_locked(user_id, false).await?;
        tracing::info!(%user_id, by = %admin.user.id, "Conta reativada");
        Ok(())
    }

    /// Remove a conta e, em cascata, o papel e o que ele possui.
    pub async fn delete_account(&self, admin: &AdminActor, user_id: Uuid) -> Result<(), AppError> {
        ensure_not_self(admin, user_id)?;
        if !self.store.delete_account(user_id).await? {
            return Err(AppError::not_found("Usuário"));
        }
        tracing::info!(%user_id, by = %admin.user.id, "Conta removida");
        Ok(())
    }

    async fn set_locked(&self, user_id: Uuid, locked: bool) -> Result<(), AppError> {
        if !self.store.set_user_locked(user_id, locked).await? {
            return Err(AppError::not_found("Usuário"));
        }
        Ok(())
    }
}

fn ensure_not_self(admin: &AdminActor, user_id: Uuid) -> Result<(), AppError> {
    if admin.user.id == user_id {
        return Err(AppError::WorkflowViolation(
            "o administrador não pode desativar ou remover a própria conta".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::PrestationScope,
        domain::skills::SkillMatchPolicy,
        models::prestation::CreatePrestationPayload,
        services::{prestation_service::PrestationService, testing},
    };

    #[tokio::test]
    async fn test_list_users_reports_party_and_activity() {
        let store = testing::memory_store();
        let accounts = AccountService::new(store.clone());
        let admin = testing::admin(&store).await;
        let client = testing::client(&store).await;

        accounts.deactivate(&admin, client.user.id).await.unwrap();

        let users = accounts.list_users(&admin).await.unwrap();
        let listed = users.iter().find(|u| u.user.id == client.user.id).unwrap();
        assert!(!listed.is_active);
        assert_eq!(listed.party_id, Some(client.client.id));

        accounts.reactivate(&admin, client.user.id).await.unwrap();
        assert!(!store.find_user_by_id(client.user.id).await.unwrap().unwrap().is_locked);
    }

    #[tokio::test]
    async fn test_admin_cannot_remove_self() {
        let store = testing::memory_store();
        let accounts = AccountService::new(store.clone());
        let admin = testing::admin(&store).await;

        assert!(accounts.deactivate(&admin, admin.user.id).await.is_err());
        assert!(accounts.delete_account(&admin, admin.user.id).await.is_err());
        assert!(matches!(
            accounts.delete_account(&admin, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_company_deletion_cascades() {
        let store = testing::memory_store();
        let accounts = AccountService::new(store.clone());
        let prestations = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);
        let admin = testing::admin(&store).await;
        let company = testing::company(&store, true).await;
        let client = testing::client(&store).await;
        let service = testing::service(&store, company.company.id, None).await;

        prestations
            .create_request(
                &client,
                CreatePrestationPayload {
                    service_id: service.id,
                    description: "x".into(),
                },
            )
            .await
            .unwrap();

        accounts.delete_account(&admin, company.user.id).await.unwrap();

        assert!(store.find_company(company.company.id).await.unwrap().is_none());
        assert!(store.find_service(service.id).await.unwrap().is_none());
        assert!(store
            .list_prestations(PrestationScope::Client(client.client.id))
            .await
            .unwrap()
            .is_empty());
        // O cliente continua existindo
        assert!(store.find_client(client.client.id).await.unwrap().is_some());
    }
}
