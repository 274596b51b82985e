// src/services/catalog_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    domain::ownership,
    middleware::actors::CompanyActor,
    models::catalog::{Service, ServiceListing, ServicePayload},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_service(
        &self,
        company: &CompanyActor,
        payload: ServicePayload,
    ) -> Result<Service, AppError> {
        check_amounts(&payload)?;

        let service = Service {
            id: Uuid::new_v4(),
            company_id: company.company.id,
            name: payload.name,
            description: payload.description,
            category: payload.category,
            base_price: payload.base_price,
            estimated_hours: payload.estimated_hours,
            is_active: payload.is_active,
            requires_approval: payload.requires_approval,
            max_concurrent_prestations: payload.max_concurrent_prestations,
            requirements: payload.requirements,
            deliverables: payload.deliverables,
            skills_required: payload.skills_required,
            billing_type: payload.billing_type,
            vat_rate: payload.vat_rate,
            created_at: Utc::now(),
            last_modified: None,
            total_prestations: 0,
            completed_prestations: 0,
            in_progress_count: 0,
            average_rating: 0.0,
        };

        let saved = self.store.insert_service(&service).await?;
        tracing::info!(service_id = %saved.id, company_id = %company.company.id, "Service criado");
        Ok(saved)
    }

    pub async fn update_service(
        &self,
        company: &CompanyActor,
        id: Uuid,
        payload: ServicePayload,
    ) -> Result<Service, AppError> {
        check_amounts(&payload)?;

        let mut service = self.load_owned(company, id).await?;
        service.name = payload.name;
        service.description = payload.description;
        service.category = payload.category;
        service.base_price = payload.base_price;
        service.estimated_hours = payload.estimated_hours;
        service.is_active = payload.is_active;
        service.requires_approval = payload.requires_approval;
        service.max_concurrent_prestations = payload.max_concurrent_prestations;
        service.requirements = payload.requirements;
        service.deliverables = payload.deliverables;
        service.skills_required = payload.skills_required;
        service.billing_type = payload.billing_type;
        service.vat_rate = payload.vat_rate;
        service.last_modified = Some(Utc::now());

        let saved = self.store.update_service(&service).await?;
        tracing::info!(service_id = %saved.id, is_active = saved.is_active, "Service atualizado");
        Ok(saved)
    }

    /// Recusado (409) enquanto houver prestations vinculadas.
    pub async fn delete_service(&self, company: &CompanyActor, id: Uuid) -> Result<(), AppError> {
        self.load_owned(company, id).await?;
        self.store.delete_service(id).await?;
        tracing::info!(service_id = %id, "Service removido");
        Ok(())
    }

    pub async fn list_company_services(&self, company: &CompanyActor) -> Result<Vec<Service>, AppError> {
        self.store.list_company_services(company.company.id).await
    }

    pub async fn get_company_service(&self, company: &CompanyActor, id: Uuid) -> Result<Service, AppError> {
        self.load_owned(company, id).await
    }

    /// Catálogo público: ativos de empresas aprovadas.
    pub async fn list_bookable(&self) -> Result<Vec<ServiceListing>, AppError> {
        let rows = self.store.list_bookable_services().await?;
        Ok(rows
            .into_iter()
            .map(|(service, company_name)| ServiceListing {
                is_available: service.is_available(),
                price_incl_vat: service.price_incl_vat().round_dp(2),
                completion_rate: service.completion_rate().round_dp(2),
                company_name,
                service,
            })
            .collect())
    }

    async fn load_owned(&self, company: &CompanyActor, id: Uuid) -> Result<Service, AppError> {
        let service = self
            .store
            .find_service(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;
        ownership::ensure_company_owns_service(&service, company.company.id)?;
        Ok(service)
    }
}

fn check_amounts(payload: &ServicePayload) -> Result<(), AppError> {
    if payload.base_price <= Decimal::ZERO {
        return Err(AppError::InvalidField {
            field: "basePrice",
            message: "O preço deve ser positivo.".into(),
        });
    }
    if payload.vat_rate < Decimal::ZERO || payload.vat_rate > Decimal::ONE_HUNDRED {
        return Err(AppError::InvalidField {
            field: "vatRate",
            message: "A taxa deve estar entre 0 e 100.".into(),
        });
    }
    Ok(())
}
