// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "billing_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingType {
    #[default]
    Fixed,
    Hourly,
    Milestone,
    Subscription,
}

// --- Service ---

// Oferta publicada por uma Societe.
// Os contadores de performance NÃO são colunas: são calculados na leitura
// a partir das prestations (ver SERVICE_SELECT no pg_store).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Réparation fuite")]
    pub name: String,
    pub description: String,
    #[schema(example = "Maintenance")]
    pub category: String,
    #[schema(example = "100.00")]
    pub base_price: Decimal,
    #[schema(example = 2)]
    pub estimated_hours: i32,
    pub is_active: bool,
    pub requires_approval: bool,
    pub max_concurrent_prestations: Option<i32>,
    pub requirements: Option<String>,
    pub deliverables: Option<String>,
    #[schema(example = "Plomberie")]
    pub skills_required: Option<String>,
    pub billing_type: BillingType,
    #[schema(example = "20.00")]
    pub vat_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub last_modified: Option<DateTime<Utc>>,

    // Contadores calculados
    pub total_prestations: i64,
    pub completed_prestations: i64,
    pub in_progress_count: i64,
    pub average_rating: f64,
}

impl Service {
    /// Ativo E (sem teto OU abaixo do teto de prestations em curso).
    pub fn is_available(&self) -> bool {
        self.is_active
            && self
                .max_concurrent_prestations
                .map_or(true, |cap| self.in_progress_count < i64::from(cap))
    }

    pub fn price_incl_vat(&self) -> Decimal {
        self.base_price * (Decimal::ONE + self.vat_rate / Decimal::ONE_HUNDRED)
    }

    pub fn completion_rate(&self) -> Decimal {
        if self.total_prestations == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.completed_prestations) / Decimal::from(self.total_prestations)
            * Decimal::ONE_HUNDRED
    }
}

// Resposta do catálogo público
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    #[serde(flatten)]
    pub service: Service,
    pub company_name: String,
    pub is_available: bool,
    pub price_incl_vat: Decimal,
    pub completion_rate: Decimal,
}

// Dados necessários para inserir/atualizar um Service
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub name: String,
    #[validate(length(min = 1, max = 500, message = "required"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub category: String,
    pub base_price: Decimal,
    #[validate(range(min = 1, message = "A duração estimada deve ser positiva."))]
    pub estimated_hours: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub requires_approval: bool,
    #[validate(range(min = 1))]
    pub max_concurrent_prestations: Option<i32>,
    #[validate(length(max = 1000))]
    pub requirements: Option<String>,
    #[validate(length(max = 1000))]
    pub deliverables: Option<String>,
    #[validate(length(max = 500))]
    pub skills_required: Option<String>,
    #[serde(default)]
    pub billing_type: BillingType,
    #[serde(default = "default_vat")]
    pub vat_rate: Decimal,
}

fn default_true() -> bool {
    true
}

fn default_vat() -> Decimal {
    Decimal::new(2000, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_service() -> Service {
        Service {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "Audit".into(),
            description: "Audit réseau".into(),
            category: "Consulting".into(),
            base_price: Decimal::new(10000, 2),
            estimated_hours: 2,
            is_active: true,
            requires_approval: false,
            max_concurrent_prestations: None,
            requirements: None,
            deliverables: None,
            skills_required: None,
            billing_type: BillingType::Fixed,
            vat_rate: Decimal::new(2000, 2),
            created_at: Utc::now(),
            last_modified: None,
            total_prestations: 0,
            completed_prestations: 0,
            in_progress_count: 0,
            average_rating: 0.0,
        }
    }

    #[test]
    fn test_available_without_cap() {
        let service = sample_service();
        assert!(service.is_available());
    }

    #[test]
    fn test_unavailable_when_inactive() {
        let mut service = sample_service();
        service.is_active = false;
        assert!(!service.is_available());
    }

    #[test]
    fn test_cap_reached_makes_service_unavailable() {
        let mut service = sample_service();
        service.max_concurrent_prestations = Some(2);
        service.in_progress_count = 1;
        assert!(service.is_available());
        service.in_progress_count = 2;
        assert!(!service.is_available());
    }

    #[test]
    fn test_price_and_completion_rate() {
        let mut service = sample_service();
        assert_eq!(service.price_incl_vat(), Decimal::new(120, 0));
        assert_eq!(service.completion_rate(), Decimal::ZERO);
        service.total_prestations = 4;
        service.completed_prestations = 1;
        assert_eq!(service.completion_rate(), Decimal::new(25, 0));
    }
}
