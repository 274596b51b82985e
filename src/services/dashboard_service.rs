// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{PrestationScope, Store},
    domain::reporting::{self, RECENT_LIMIT},
    middleware::actors::{AdminActor, ClientActor, CompanyActor, ProviderActor},
    models::{
        auth::Role,
        dashboard::{AdminDashboard, ClientDashboard, CompanyDashboard, ProviderDashboard},
        prestation::PrestationStatus,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn admin(&self, _admin: &AdminActor) -> Result<AdminDashboard, AppError> {
        let users = self.store.list_users().await?;
        let prestations = self.store.list_prestations(PrestationScope::All).await?;
        let count_role = |role: Role| users.iter().filter(|u| u.role == role).count();

        Ok(AdminDashboard {
            total_clients: count_role(Role::Client),
            total_providers: count_role(Role::Prestataire),
            total_companies: count_role(Role::Societe),
            total_prestations: prestations.len(),
            active_prestations: reporting::count_active(&prestations),
            total_revenue: reporting::revenue(&prestations),
            prestations_by_status: reporting::count_by_status(&prestations),
            average_rating: reporting::average_rating(&prestations),
            recent_prestations: reporting::recent(&prestations, RECENT_LIMIT),
        })
    }

    pub async fn company(&self, company: &CompanyActor) -> Result<CompanyDashboard, AppError> {
        let services = self.store.list_company_services(company.company.id).await?;
        let prestations = self
            .store
            .list_prestations(PrestationScope::Company(company.company.id))
            .await?;

        Ok(CompanyDashboard {
            total_services: services.len(),
            active_prestations: reporting::count_active(&prestations),
            total_revenue: reporting::revenue(&prestations),
            average_rating: reporting::average_rating(&prestations),
            recent_prestations: reporting::recent(&prestations, RECENT_LIMIT),
        })
    }

    pub async fn provider(&self, provider: &ProviderActor) -> Result<ProviderDashboard, AppError> {
        let prestations = self
            .store
            .list_prestations(PrestationScope::Provider(provider.provider.id))
            .await?;

        Ok(ProviderDashboard {
            total_earnings: reporting::revenue(&prestations),
            completed_prestations: reporting::count_delivered(&prestations),
            // Atribuídas e ainda não iniciadas
            pending_prestations: prestations
                .iter()
                .filter(|p| p.status == PrestationStatus::Assigned)
                .count(),
            average_rating: reporting::average_rating(&prestations),
            active_prestations: prestations
                .iter()
                .filter(|p| p.status.is_active())
                .cloned()
                .collect(),
        })
    }

    pub async fn client(&self, client: &ClientActor) -> Result<ClientDashboard, AppError> {
        let prestations = self
            .store
            .list_prestations(PrestationScope::Client(client.client.id))
            .await?;

        Ok(ClientDashboard {
            total_prestations: prestations.len(),
            completed_prestations: reporting::count_delivered(&prestations),
            active_prestations: prestations
                .iter()
                .filter(|p| p.status == PrestationStatus::Planned || p.status.is_active())
                .cloned()
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        domain::skills::SkillMatchPolicy,
        models::prestation::{CreatePrestationPayload, UpdateStatusPayload},
        services::{prestation_service::PrestationService, testing},
    };

    #[tokio::test]
    async fn test_empty_dashboards_do_not_fail() {
        let store = testing::memory_store();
        let dashboards = DashboardService::new(store.clone());
        let admin = testing::admin(&store).await;
        let company = testing::company(&store, true).await;

        let summary = dashboards.admin(&admin).await.unwrap();
        assert_eq!(summary.total_prestations, 0);
        assert_eq!(summary.average_rating, Decimal::ZERO);
        assert_eq!(summary.total_companies, 1);

        let company_view = dashboards.company(&company).await.unwrap();
        assert_eq!(company_view.total_services, 0);
        assert!(company_view.recent_prestations.is_empty());
    }

    #[tokio::test]
    async fn test_dashboards_follow_lifecycle() {
        let store = testing::memory_store();
        let dashboards = DashboardService::new(store.clone());
        let prestations = PrestationService::new(store.clone(), SkillMatchPolicy::Substring);

        let admin = testing::admin(&store).await;
        let company = testing::company(&store, true).await;
        let client = testing::client(&store).await;
        let provider = testing::provider(&store, "Plomberie", true).await;
        let service = testing::service(&store, company.company.id, None).await;

        let p = prestations
            .create_request(
                &client,
                CreatePrestationPayload {
                    service_id: service.id,
                    description: "x".into(),
                },
            )
            .await
            .unwrap();
        prestations.assign(&company, p.id, provider.provider.id).await.unwrap();

        let provider_view = dashboards.provider(&provider).await.unwrap();
        assert_eq!(provider_view.pending_prestations, 1);
        assert_eq!(provider_view.active_prestations.len(), 1);

        for to in [PrestationStatus::InProgress, PrestationStatus::Completed] {
            prestations
                .update_status(
                    &provider,
                    p.id,
                    UpdateStatusPayload {
                        status: to,
                        notes: None,
                        final_report: None,
                    },
                )
                .await
                .unwrap();
        }
        prestations.rate(&client, p.id, 5, None).await.unwrap();

        let provider_view = dashboards.provider(&provider).await.unwrap();
        assert_eq!(provider_view.total_earnings, Decimal::new(100, 0));
        assert_eq!(provider_view.completed_prestations, 1);
        assert_eq!(provider_view.average_rating, Decimal::new(5, 0));

        let summary = dashboards.admin(&admin).await.unwrap();
        assert_eq!(summary.prestations_by_status["Validated"], 1);
        assert_eq!(summary.recent_prestations.len(), 1);

        let client_view = dashboards.client(&client).await.unwrap();
        assert_eq!(client_view.completed_prestations, 1);
        assert!(client_view.active_prestations.is_empty());
    }
}
