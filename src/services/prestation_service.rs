// src/services/prestation_service.rs
//
// Orquestra o ciclo de vida: carrega, checa dono, aplica a regra pura de
// domain::lifecycle e grava com UM commit por operação.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PrestationScope, Store},
    domain::{approval::ApprovalState, lifecycle, ownership, skills::SkillMatchPolicy},
    middleware::actors::{AdminActor, ClientActor, CompanyActor, ProviderActor},
    models::{
        catalog::Service,
        parties::Prestataire,
        prestation::{
            CreatePrestationPayload, Prestation, PrestationDetail, PrestationStatus,
            UpdateStatusPayload,
        },
    },
};

/// Quem está pedindo a visão de detalhe.
pub enum Viewer<'a> {
    Client(&'a ClientActor),
    Provider(&'a ProviderActor),
    Company(&'a CompanyActor),
    Admin(&'a AdminActor),
}

/// Nota inteira em [1,5], checada antes de qualquer acesso ao store.
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::InvalidField {
            field: "rating",
            message: "A nota deve estar entre 1 e 5.".into(),
        });
    }
    Ok(())
}

#[derive(Clone)]
pub struct PrestationService {
    store: Arc<dyn Store>,
    skill_policy: SkillMatchPolicy,
}

impl PrestationService {
    pub fn new(store: Arc<dyn Store>, skill_policy: SkillMatchPolicy) -> Self {
        Self { store, skill_policy }
    }

    // =========================================================================
    //  CLIENTE
    // =========================================================================

    pub async fn create_request(
        &self,
        client: &ClientActor,
        payload: CreatePrestationPayload,
    ) -> Result<Prestation, AppError> {
        let service = self
            .store
            .find_service(payload.service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        self.ensure_bookable(&service).await?;

        let prestation = Prestation::new_request(
            service.id,
            client.client.id,
            payload.description,
            service.base_price,
            service.estimated_hours,
            Utc::now(),
        );
        let saved = self.store.insert_prestation(&prestation).await?;

        tracing::info!(
            prestation_id = %saved.id,
            service_id = %service.id,
            client_id = %client.client.id,
            status = ?saved.status,
            "Prestation criada"
        );
        Ok(saved)
    }

    pub async fn rate(
        &self,
        client: &ClientActor,
        id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<Prestation, AppError> {
        validate_rating(rating)?;

        let prestation = self.load(id).await?;
        ownership::ensure_client_owns(&prestation, client.client.id)?;

        let next = lifecycle::rate(&prestation, client.user.id, rating, feedback, Utc::now())?;
        self.commit(&next, "Prestation avaliada").await
    }

    pub async fn cancel(&self, client: &ClientActor, id: Uuid) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        ownership::ensure_client_owns(&prestation, client.client.id)?;

        let next = lifecycle::cancel(&prestation, Utc::now())?;
        self.commit(&next, "Prestation cancelada").await
    }

    pub async fn get_history(&self, client: &ClientActor) -> Result<Vec<Prestation>, AppError> {
        self.store
            .list_prestations(PrestationScope::Client(client.client.id))
            .await
    }

    /// Planned, Assigned ou InProgress.
    pub async fn get_client_active(&self, client: &ClientActor) -> Result<Vec<Prestation>, AppError> {
        let history = self.get_history(client).await?;
        Ok(history
            .into_iter()
            .filter(|p| p.status == PrestationStatus::Planned || p.status.is_active())
            .collect())
    }

    // =========================================================================
    //  EMPRESA
    // =========================================================================

    pub async fn assign(
        &self,
        company: &CompanyActor,
        id: Uuid,
        provider_id: Uuid,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load_owned_by_company(company, id).await?;

        let provider = self
            .store
            .find_provider(provider_id)
            .await?
            .ok_or_else(|| AppError::not_found("Prestataire"))?;
        if !self.is_operational(&provider).await? {
            tracing::warn!(
                prestation_id = %id,
                provider_id = %provider_id,
                by = %company.user.id,
                "Atribuição a prestataire não aprovado"
            );
            return Err(AppError::WorkflowViolation(
                "o prestataire não está aprovado".into(),
            ));
        }

        let next = lifecycle::assign(&prestation, provider.id, Utc::now())?;
        self.commit(&next, "Prestation atribuída").await
    }

    pub async fn update_pricing(
        &self,
        company: &CompanyActor,
        id: Uuid,
        price: Decimal,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load_owned_by_company(company, id).await?;

        let next = lifecycle::update_pricing(&prestation, price)?;
        self.commit(&next, "Preço final atualizado").await
    }

    pub async fn get_company_prestations(
        &self,
        company: &CompanyActor,
    ) -> Result<Vec<Prestation>, AppError> {
        self.store
            .list_prestations(PrestationScope::Company(company.company.id))
            .await
    }

    /// Prestataires aprovados e ativos que a empresa pode atribuir.
    pub async fn assignment_pool(&self, _company: &CompanyActor) -> Result<Vec<Prestataire>, AppError> {
        self.store.list_approved_providers().await
    }

    // =========================================================================
    //  PRESTATAIRE
    // =========================================================================

    /// Reserva uma prestation livre do pool (continua Planned).
    pub async fn claim(&self, provider: &ProviderActor, id: Uuid) -> Result<Prestation, AppError> {
        self.ensure_operational(provider).await?;

        let prestation = self.load(id).await?;
        let service = self
            .store
            .find_service(prestation.service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        let next = lifecycle::claim(&prestation, provider.provider.id)?;
        self.ensure_bookable(&service).await?;
        if !self.skill_policy.matches(
            service.skills_required.as_deref(),
            provider.provider.specialty.as_deref(),
        ) {
            tracing::warn!(prestation_id = %id, provider_id = %provider.provider.id, "Especialidade incompatível");
            return Err(AppError::forbidden("especialidade incompatível com o service"));
        }

        self.commit(&next, "Prestation reservada").await
    }

    /// Planned -> Assigned, apenas para o prestataire já vinculado.
    pub async fn accept(&self, provider: &ProviderActor, id: Uuid) -> Result<Prestation, AppError> {
        self.ensure_operational(provider).await?;

        let prestation = self.load(id).await?;
        let next = lifecycle::accept(&prestation, provider.provider.id, Utc::now())?;

        let service = self
            .store
            .find_service(prestation.service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;
        self.ensure_bookable(&service).await?;

        self.commit(&next, "Prestation aceita").await
    }

    pub async fn refuse(&self, provider: &ProviderActor, id: Uuid) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        let next = lifecycle::refuse(&prestation, provider.provider.id)?;
        self.commit(&next, "Prestation devolvida ao pool").await
    }

    pub async fn update_status(
        &self,
        provider: &ProviderActor,
        id: Uuid,
        payload: UpdateStatusPayload,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        let next = lifecycle::update_status(
            &prestation,
            provider.provider.id,
            payload.status,
            payload.notes,
            payload.final_report,
            Utc::now(),
        )?;
        self.commit(&next, "Status atualizado").await
    }

    pub async fn record_progress(
        &self,
        provider: &ProviderActor,
        id: Uuid,
        note: String,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        let next = lifecycle::record_progress(&prestation, provider.provider.id, note, Utc::now())?;
        self.commit(&next, "Progresso registrado").await
    }

    pub async fn set_paused(
        &self,
        provider: &ProviderActor,
        id: Uuid,
        paused: bool,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        let next = lifecycle::set_paused(&prestation, provider.provider.id, paused)?;
        self.commit(&next, if paused { "Prestation pausada" } else { "Prestation retomada" })
            .await
    }

    pub async fn respond_to_review(
        &self,
        provider: &ProviderActor,
        id: Uuid,
        response: &str,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        let next = lifecycle::respond_to_review(&prestation, provider.provider.id, response)?;
        self.commit(&next, "Resposta à avaliação registrada").await
    }

    /// Ordenado pela data de atribuição (desc).
    pub async fn get_assigned(&self, provider: &ProviderActor) -> Result<Vec<Prestation>, AppError> {
        self.store
            .list_prestations(PrestationScope::Provider(provider.provider.id))
            .await
    }

    /// Prestations livres compatíveis com a especialidade.
    /// Prestataire não aprovado não enxerga nenhuma.
    pub async fn get_available(&self, provider: &ProviderActor) -> Result<Vec<Prestation>, AppError> {
        if !self.is_operational(&provider.provider).await? {
            return Ok(Vec::new());
        }

        let specialty = provider.provider.specialty.as_deref();
        let open = self.store.list_open_prestations().await?;
        Ok(open
            .into_iter()
            .filter(|(_, service)| {
                self.skill_policy
                    .matches(service.skills_required.as_deref(), specialty)
            })
            .map(|(prestation, _)| prestation)
            .collect())
    }

    // =========================================================================
    //  ADMIN / DETALHE
    // =========================================================================

    pub async fn get_all(&self, _admin: &AdminActor) -> Result<Vec<Prestation>, AppError> {
        self.store.list_prestations(PrestationScope::All).await
    }

    pub async fn detail(&self, viewer: Viewer<'_>, id: Uuid) -> Result<PrestationDetail, AppError> {
        let prestation = self.load(id).await?;
        let service = self.store.find_service(prestation.service_id).await?;
        let company_id = ownership::owning_company(&prestation, service.as_ref())?;

        match viewer {
            Viewer::Client(client) => ownership::ensure_client_owns(&prestation, client.client.id)?,
            Viewer::Provider(provider) => {
                // Livre (no pool) ou atribuída a ele
                if prestation.provider_id.is_some() {
                    lifecycle::ensure_assignee(&prestation, provider.provider.id)?;
                }
            }
            Viewer::Company(company) => ownership::ensure_company_owns_prestation(
                &prestation,
                service.as_ref(),
                company.company.id,
            )?,
            Viewer::Admin(admin) => {
                tracing::info!(prestation_id = %id, admin_id = %admin.user.id, "Detalhe consultado pelo admin");
            }
        }

        let company_name = self.store.find_company(company_id).await?.map(|c| c.name);
        let client_name = self
            .store
            .find_client(prestation.client_id)
            .await?
            .map(|c| format!("{} {}", c.first_name, c.last_name));
        let provider_name = match prestation.provider_id {
            Some(provider_id) => self.store.find_provider(provider_id).await?.map(|p| p.full_name()),
            None => None,
        };

        Ok(PrestationDetail {
            annotation: prestation.annotation(Utc::now()),
            service_name: service.map(|s| s.name).unwrap_or_default(),
            company_id,
            company_name,
            client_name,
            provider_name,
            prestation,
        })
    }

    // =========================================================================
    //  INTERNOS
    // =========================================================================

    async fn load(&self, id: Uuid) -> Result<Prestation, AppError> {
        self.store
            .find_prestation(id)
            .await?
            .ok_or_else(|| AppError::not_found("Prestation"))
    }

    // Dono real = dono do Service, nunca um id vindo da requisição
    async fn load_owned_by_company(
        &self,
        company: &CompanyActor,
        id: Uuid,
    ) -> Result<Prestation, AppError> {
        let prestation = self.load(id).await?;
        let service = self.store.find_service(prestation.service_id).await?;
        ownership::ensure_company_owns_prestation(&prestation, service.as_ref(), company.company.id)?;
        Ok(prestation)
    }

    async fn ensure_operational(&self, provider: &ProviderActor) -> Result<(), AppError> {
        if !self.is_operational(&provider.provider).await? {
            tracing::warn!(
                provider_id = %provider.provider.id,
                user_id = %provider.user.id,
                "Prestataire não aprovado tentou operar o pool"
            );
            return Err(AppError::forbidden("prestataire ainda não aprovado"));
        }
        Ok(())
    }

    // Service ativo, de empresa aprovada e com conta não bloqueada.
    // Mesma regra aplicada por Store::list_bookable_services e list_open_prestations.
    async fn ensure_bookable(&self, service: &Service) -> Result<(), AppError> {
        if !service.is_active {
            return Err(AppError::WorkflowViolation("o service está inativo".into()));
        }

        let company = self
            .store
            .find_company(service.company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Societe"))?;
        let locked = self
            .store
            .find_user_by_id(company.user_id)
            .await?
            .is_none_or(|u| u.is_locked);
        if !company.is_approved || locked {
            return Err(AppError::WorkflowViolation(
                "a empresa do service não está aprovada".into(),
            ));
        }
        Ok(())
    }

    async fn is_operational(&self, provider: &Prestataire) -> Result<bool, AppError> {
        let locked = self
            .store
            .find_user_by_id(provider.user_id)
            .await?
            .is_none_or(|u| u.is_locked);
        Ok(ApprovalState::derive(provider.is_approved, locked).is_operational() && !locked)
    }

    async fn commit(&self, next: &Prestation, action: &str) -> Result<Prestation, AppError> {
        let saved = self.store.update_prestation(next).await?;
        tracing::info!(
            prestation_id = %saved.id,
            status = ?saved.status,
            version = saved.version,
            "{}",
            action
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    fn status(to: PrestationStatus) -> UpdateStatusPayload {
        UpdateStatusPayload {
            status: to,
            notes: None,
            final_report: None,
        }
    }

    fn request(service_id: Uuid) -> CreatePrestationPayload {
        CreatePrestationPayload {
            service_id,
            description: "Fuite sous l'évier".into(),
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Planned);
        assert_eq!(p.final_price, Decimal::new(100, 0));
        assert_eq!(p.estimated_hours, 2);

        let p = svc.assign(&company, p.id, provider.provider.id).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Assigned);
        assert!(p.assigned_at.is_some());

        let p = svc
            .update_status(&provider, p.id, status(PrestationStatus::InProgress))
            .await
            .unwrap();
        assert_eq!(p.status, PrestationStatus::InProgress);
        assert!(p.started_at.is_some());

        let p = svc
            .update_status(&provider, p.id, status(PrestationStatus::Completed))
            .await
            .unwrap();
        assert_eq!(p.status, PrestationStatus::Completed);
        assert!(p.ended_at.is_some());

        let p = svc.rate(&client, p.id, 4, Some("Bien".into())).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Validated);
        assert!(p.validated_at.is_some());
        assert_eq!(p.client_rating, Some(4));
        assert!(p.quality_validated);
        assert_eq!(p.validated_by, Some(client.user.id));
    }

    #[tokio::test]
    async fn test_refuse_returns_prestation_to_the_pool() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, Some("Plomberie")).await;
        let client = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        let p = svc.claim(&provider, p.id).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Planned);
        assert!(svc.get_available(&provider).await.unwrap().is_empty());

        let p = svc.accept(&provider, p.id).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Assigned);

        let p = svc.refuse(&provider, p.id).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Planned);
        assert!(p.provider_id.is_none());

        let available = svc.get_available(&provider).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, p.id);
    }

    #[tokio::test]
    async fn test_unapproved_provider_sees_nothing() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, Some("Plomberie")).await;
        let client = testing::client(&store).await;
        let pending = testing::provider(&store, "Plomberie", false).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();

        assert!(svc.get_available(&pending).await.unwrap().is_empty());
        assert!(matches!(svc.claim(&pending, p.id).await, Err(AppError::Forbidden(_))));
        assert!(matches!(svc.accept(&pending, p.id).await, Err(AppError::Forbidden(_))));
        assert!(matches!(
            svc.assign(&company, p.id, pending.provider.id).await,
            Err(AppError::WorkflowViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_accept_without_claim_is_refused() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;
        let other = testing::provider(&store, "Plomberie", true).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        assert!(matches!(svc.accept(&provider, p.id).await, Err(AppError::Forbidden(_))));
        let unchanged = store.find_prestation(p.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, PrestationStatus::Planned);
        assert!(unchanged.provider_id.is_none());

        svc.claim(&provider, p.id).await.unwrap();
        assert!(matches!(svc.claim(&other, p.id).await, Err(AppError::Forbidden(_))));
        assert!(matches!(svc.accept(&other, p.id).await, Err(AppError::Forbidden(_))));

        let p = svc.accept(&provider, p.id).await.unwrap();
        assert_eq!(p.status, PrestationStatus::Assigned);
        assert_eq!(p.provider_id, Some(provider.provider.id));
    }

    #[tokio::test]
    async fn test_pool_hides_services_no_longer_bookable() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let locked_company = testing::company(&store, true).await;
        let locked_service = testing::service(&store, locked_company.company.id, None).await;
        let active_company = testing::company(&store, true).await;
        let mut paused_service = testing::service(&store, active_company.company.id, None).await;
        let client = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;

        let from_locked = svc.create_request(&client, request(locked_service.id)).await.unwrap();
        let from_paused = svc.create_request(&client, request(paused_service.id)).await.unwrap();
        let claimed = svc.create_request(&client, request(paused_service.id)).await.unwrap();
        svc.claim(&provider, claimed.id).await.unwrap();
        assert_eq!(svc.get_available(&provider).await.unwrap().len(), 2);

        store.set_user_locked(locked_company.user.id, true).await.unwrap();
        paused_service.is_active = false;
        store.update_service(&paused_service).await.unwrap();

        assert!(store.list_bookable_services().await.unwrap().is_empty());
        assert!(svc.get_available(&provider).await.unwrap().is_empty());
        assert!(matches!(
            svc.claim(&provider, from_locked.id).await,
            Err(AppError::WorkflowViolation(_))
        ));
        assert!(matches!(
            svc.claim(&provider, from_paused.id).await,
            Err(AppError::WorkflowViolation(_))
        ));
        assert!(matches!(
            svc.accept(&provider, claimed.id).await,
            Err(AppError::WorkflowViolation(_))
        ));
        let unchanged = store.find_prestation(claimed.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, PrestationStatus::Planned);
    }

    #[tokio::test]
    async fn test_available_filters_by_specialty() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let plumbing = testing::service(&store, company.company.id, Some("Plomberie")).await;
        let open = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;
        let electrician = testing::provider(&store, "Electricité", true).await;

        svc.create_request(&client, request(plumbing.id)).await.unwrap();
        let visible = svc.create_request(&client, request(open.id)).await.unwrap();

        let available = svc.get_available(&electrician).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, visible.id);
    }

    #[tokio::test]
    async fn test_spoofed_company_is_rejected() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let owner = testing::company(&store, true).await;
        let intruder = testing::company(&store, true).await;
        let service = testing::service(&store, owner.company.id, None).await;
        let client = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();

        assert!(matches!(
            svc.assign(&intruder, p.id, provider.provider.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            svc.update_pricing(&intruder, p.id, Decimal::new(150, 0)).await,
            Err(AppError::Forbidden(_))
        ));

        let p = svc.update_pricing(&owner, p.id, Decimal::new(150, 0)).await.unwrap();
        assert_eq!(p.final_price, Decimal::new(150, 0));
        assert_eq!(p.status, PrestationStatus::Planned);

        assert!(matches!(
            svc.update_pricing(&owner, p.id, Decimal::ZERO).await,
            Err(AppError::InvalidField { field: "finalPrice", .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_rules() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;
        let stranger = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        assert!(matches!(svc.cancel(&stranger, p.id).await, Err(AppError::Forbidden(_))));
        let cancelled = svc.cancel(&client, p.id).await.unwrap();
        assert_eq!(cancelled.status, PrestationStatus::Cancelled);

        // Concluída não pode mais ser cancelada
        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        svc.assign(&company, p.id, provider.provider.id).await.unwrap();
        svc.update_status(&provider, p.id, status(PrestationStatus::InProgress))
            .await
            .unwrap();
        svc.update_status(&provider, p.id, status(PrestationStatus::Completed))
            .await
            .unwrap();
        assert!(matches!(
            svc.cancel(&client, p.id).await,
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(matches!(
            svc.cancel(&client, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rating_is_validated_first() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);
        let client = testing::client(&store).await;

        for rating in [0, 6, -1] {
            let err = svc.rate(&client, Uuid::new_v4(), rating, None).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidField { field: "rating", .. }));
        }
    }

    #[tokio::test]
    async fn test_rating_before_completion_is_refused() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        assert!(matches!(
            svc.rate(&client, p.id, 5, None).await,
            Err(AppError::WorkflowViolation(_))
        ));
        let unchanged = store.find_prestation(p.id).await.unwrap().unwrap();
        assert_eq!(unchanged.client_rating, None);
        assert_eq!(unchanged.version, p.version);
    }

    #[tokio::test]
    async fn test_inactive_or_unapproved_service_cannot_be_requested() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);
        let client = testing::client(&store).await;

        let pending = testing::company(&store, false).await;
        let service = testing::service(&store, pending.company.id, None).await;
        assert!(matches!(
            svc.create_request(&client, request(service.id)).await,
            Err(AppError::WorkflowViolation(_))
        ));

        let approved = testing::company(&store, true).await;
        let mut inactive = testing::service(&store, approved.company.id, None).await;
        inactive.is_active = false;
        store.update_service(&inactive).await.unwrap();
        assert!(matches!(
            svc.create_request(&client, request(inactive.id)).await,
            Err(AppError::WorkflowViolation(_))
        ));

        assert!(matches!(
            svc.create_request(&client, request(Uuid::new_v4())).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_only_assignee_drives_status() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;
        let assignee = testing::provider(&store, "Plomberie", true).await;
        let other = testing::provider(&store, "Plomberie", true).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();
        svc.assign(&company, p.id, assignee.provider.id).await.unwrap();

        assert!(matches!(
            svc.update_status(&other, p.id, status(PrestationStatus::InProgress)).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            svc.record_progress(&other, p.id, "x".into()).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(svc.refuse(&other, p.id).await, Err(AppError::Forbidden(_))));

        // Pulo de etapa também é recusado
        assert!(matches!(
            svc.update_status(&assignee, p.id, status(PrestationStatus::Completed)).await,
            Err(AppError::InvalidTransition { .. })
        ));

        let p = svc.record_progress(&assignee, p.id, "Diagnostic".into()).await.unwrap();
        assert_eq!(p.progress_log.len(), 1);
        assert_eq!(p.status, PrestationStatus::Assigned);
    }

    #[tokio::test]
    async fn test_detail_respects_ownership() {
        let store = testing::memory_store();
        let svc = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let company = testing::company(&store, true).await;
        let other_company = testing::company(&store, true).await;
        let service = testing::service(&store, company.company.id, None).await;
        let client = testing::client(&store).await;
        let stranger = testing::client(&store).await;
        let admin = testing::admin(&store).await;

        let p = svc.create_request(&client, request(service.id)).await.unwrap();

        let detail = svc.detail(Viewer::Client(&client), p.id).await.unwrap();
        assert_eq!(detail.company_id, company.company.id);
        assert_eq!(detail.company_name.as_deref(), Some("ACME"));
        assert!(svc.detail(Viewer::Company(&company), p.id).await.is_ok());
        assert!(svc.detail(Viewer::Admin(&admin), p.id).await.is_ok());

        assert!(matches!(
            svc.detail(Viewer::Client(&stranger), p.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            svc.detail(Viewer::Company(&other_company), p.id).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
