// src/domain/ownership.rs
//
// Resolução explícita do dono de cada recurso.
// A empresa dona de uma prestation é SEMPRE a dona do Service vinculado.

use anyhow::anyhow;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{catalog::Service, prestation::Prestation},
};

/// Empresa dona da prestation, via Service.
/// Falha explicitamente se o vínculo com o Service estiver quebrado.
pub fn owning_company(prestation: &Prestation, service: Option<&Service>) -> Result<Uuid, AppError> {
    let service = service.ok_or_else(|| {
        AppError::InternalServerError(anyhow!(
            "prestation {} sem vínculo com o service {}",
            prestation.id,
            prestation.service_id
        ))
    })?;

    if service.id != prestation.service_id {
        return Err(AppError::InternalServerError(anyhow!(
            "service {} carregado não corresponde ao da prestation {}",
            service.id,
            prestation.id
        )));
    }

    Ok(service.company_id)
}

pub fn ensure_company_owns_prestation(
    prestation: &Prestation,
    service: Option<&Service>,
    company_id: Uuid,
) -> Result<(), AppError> {
    if owning_company(prestation, service)? != company_id {
        tracing::warn!(prestation_id = %prestation.id, %company_id, "empresa não é dona da prestation");
        return Err(AppError::forbidden("prestation pertence a outra empresa"));
    }
    Ok(())
}

pub fn ensure_company_owns_service(service: &Service, company_id: Uuid) -> Result<(), AppError> {
    if service.company_id != company_id {
        tracing::warn!(service_id = %service.id, %company_id, "empresa não é dona do service");
        return Err(AppError::forbidden("service pertence a outra empresa"));
    }
    Ok(())
}

pub fn ensure_client_owns(prestation: &Prestation, client_id: Uuid) -> Result<(), AppError> {
    if prestation.client_id != client_id {
        tracing::warn!(prestation_id = %prestation.id, %client_id, "cliente não é dono da prestation");
        return Err(AppError::forbidden("prestation pertence a outro cliente"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::models::catalog::BillingType;

    fn service_of(company_id: Uuid) -> Service {
        Service {
            id: Uuid::new_v4(),
            company_id,
            name: "Nettoyage".into(),
            description: "Bureaux".into(),
            category: "Other".into(),
            base_price: Decimal::new(80, 0),
            estimated_hours: 3,
            is_active: true,
            requires_approval: false,
            max_concurrent_prestations: None,
            requirements: None,
            deliverables: None,
            skills_required: None,
            billing_type: BillingType::Hourly,
            vat_rate: Decimal::new(20, 0),
            created_at: Utc::now(),
            last_modified: None,
            total_prestations: 0,
            completed_prestations: 0,
            in_progress_count: 0,
            average_rating: 0.0,
        }
    }

    fn prestation_for(service: &Service) -> Prestation {
        Prestation::new_request(
            service.id,
            Uuid::new_v4(),
            "x".into(),
            service.base_price,
            service.estimated_hours,
            Utc::now(),
        )
    }

    #[test]
    fn test_owner_is_resolved_through_service() {
        let company = Uuid::new_v4();
        let service = service_of(company);
        let p = prestation_for(&service);
        assert_eq!(owning_company(&p, Some(&service)).unwrap(), company);
        assert!(ensure_company_owns_prestation(&p, Some(&service), company).is_ok());
    }

    #[test]
    fn test_spoofed_company_is_forbidden() {
        let service = service_of(Uuid::new_v4());
        let p = prestation_for(&service);
        let err = ensure_company_owns_prestation(&p, Some(&service), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_missing_service_link_fails_explicitly() {
        let service = service_of(Uuid::new_v4());
        let p = prestation_for(&service);
        assert!(matches!(
            owning_company(&p, None).unwrap_err(),
            AppError::InternalServerError(_)
        ));

        let other = service_of(service.company_id);
        assert!(owning_company(&p, Some(&other)).is_err());
    }

    #[test]
    fn test_client_ownership() {
        let service = service_of(Uuid::new_v4());
        let p = prestation_for(&service);
        assert!(ensure_client_owns(&p, p.client_id).is_ok());
        assert!(ensure_client_owns(&p, Uuid::new_v4()).is_err());
    }
}
