// src/models/prestation.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

// Mapeia o CREATE TYPE prestation_status do banco.
// As transições permitidas vivem numa única tabela em domain::lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "prestation_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrestationStatus {
    Planned,
    Assigned,
    InProgress,
    Completed,
    Validated,
    Cancelled,
}

impl PrestationStatus {
    pub const ALL: [PrestationStatus; 6] = [
        PrestationStatus::Planned,
        PrestationStatus::Assigned,
        PrestationStatus::InProgress,
        PrestationStatus::Completed,
        PrestationStatus::Validated,
        PrestationStatus::Cancelled,
    ];

    /// Em execução do ponto de vista dos dashboards.
    pub fn is_active(&self) -> bool {
        matches!(self, PrestationStatus::Assigned | PrestationStatus::InProgress)
    }

    /// Trabalho entregue (gera receita).
    pub fn is_delivered(&self) -> bool {
        matches!(self, PrestationStatus::Completed | PrestationStatus::Validated)
    }
}

// Anotação informativa, não bloqueia nenhuma transição
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PrestationAnnotation {
    Delayed,
    Paused,
}

// Uma linha do diário de progresso (append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub at: DateTime<Utc>,
    pub note: String,
}

// --- Prestation ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prestation {
    pub id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    // Vazio até alguém aceitar / ser atribuído
    pub provider_id: Option<Uuid>,
    pub description: String,
    pub status: PrestationStatus,

    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub validated_at: Option<DateTime<Utc>>,

    #[schema(example = "100.00")]
    pub final_price: Decimal,
    pub estimated_hours: i32,
    pub actual_hours: Option<i32>,

    pub client_rating: Option<i32>,
    pub client_feedback: Option<String>,

    pub provider_notes: Option<String>,
    #[sqlx(json)]
    pub progress_log: Vec<ProgressEntry>,
    pub final_report: Option<String>,
    pub is_paused: bool,

    pub quality_validated: bool,
    pub validated_by: Option<Uuid>,

    // Token de concorrência otimista
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

impl Prestation {
    /// Nova requisição no estado inicial, com preço e duração copiados do Service.
    pub fn new_request(
        service_id: Uuid,
        client_id: Uuid,
        description: String,
        base_price: Decimal,
        estimated_hours: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id,
            client_id,
            provider_id: None,
            description,
            status: PrestationStatus::Planned,
            created_at: now,
            assigned_at: None,
            started_at: None,
            ended_at: None,
            validated_at: None,
            final_price: base_price,
            estimated_hours,
            actual_hours: None,
            client_rating: None,
            client_feedback: None,
            provider_notes: None,
            progress_log: Vec::new(),
            final_report: None,
            is_paused: false,
            quality_validated: false,
            validated_by: None,
            version: 0,
            updated_at: now,
        }
    }

    pub fn annotation(&self, now: DateTime<Utc>) -> Option<PrestationAnnotation> {
        if self.status != PrestationStatus::InProgress {
            return None;
        }
        if self.is_paused {
            return Some(PrestationAnnotation::Paused);
        }
        let started = self.started_at?;
        let budget = Duration::hours(i64::from(self.estimated_hours));
        (now - started > budget).then_some(PrestationAnnotation::Delayed)
    }
}

// Prestation + dados auxiliares para a tela de detalhe
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrestationDetail {
    #[serde(flatten)]
    pub prestation: Prestation,
    pub service_name: String,
    // Sempre derivado de Service.company_id, nunca armazenado na prestation
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub client_name: Option<String>,
    pub provider_name: Option<String>,
    pub annotation: Option<PrestationAnnotation>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrestationPayload {
    pub service_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "required"))]
    #[schema(example = "Fuite sous l'évier de la cuisine")]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPrestationPayload {
    pub provider_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub status: PrestationStatus,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(length(max = 4000))]
    pub final_report: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatePrestationPayload {
    // Validado em services::prestation_service::validate_rating
    #[schema(example = 4)]
    pub rating: i32,
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPayload {
    #[validate(length(min = 1, max = 2000, message = "required"))]
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingPayload {
    #[schema(example = "150.00")]
    pub final_price: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PausePayload {
    pub paused: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponsePayload {
    #[validate(length(min = 1, max = 2000, message = "required"))]
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Prestation {
        Prestation::new_request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Test".into(),
            Decimal::new(100, 0),
            2,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_request_starts_planned_and_unassigned() {
        let p = request();
        assert_eq!(p.status, PrestationStatus::Planned);
        assert!(p.provider_id.is_none());
        assert_eq!(p.final_price, Decimal::new(100, 0));
        assert_eq!(p.estimated_hours, 2);
        assert_eq!(p.version, 0);
    }

    #[test]
    fn test_delayed_annotation_only_when_over_budget() {
        let mut p = request();
        let now = Utc::now();
        assert_eq!(p.annotation(now), None);

        p.status = PrestationStatus::InProgress;
        p.started_at = Some(now - Duration::hours(1));
        assert_eq!(p.annotation(now), None);

        p.started_at = Some(now - Duration::hours(3));
        assert_eq!(p.annotation(now), Some(PrestationAnnotation::Delayed));

        p.is_paused = true;
        assert_eq!(p.annotation(now), Some(PrestationAnnotation::Paused));
    }
}
