// src/models/parties.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Client
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub user_id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    #[schema(example = "Particulier")]
    pub client_type: String,
    pub registered_at: DateTime<Utc>,
}

// ---
// 2. Prestataire (o executor)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prestataire {
    pub id: Uuid,
    pub user_id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    #[schema(example = "Plomberie")]
    pub specialty: Option<String>,
    #[schema(example = "45.00")]
    pub hourly_rate: Decimal,
    pub is_available: bool,
    pub registered_at: DateTime<Utc>,

    // Aprovação
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
}

impl Prestataire {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ---
// 3. Societe (a empresa)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Societe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    pub registration_number: String,

    // Aprovação
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderProfilePayload {
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 20, message = "required"))]
    pub phone: String,
    #[validate(length(max = 100))]
    pub specialty: Option<String>,
    #[schema(example = "45.00")]
    pub hourly_rate: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    pub is_available: bool,
}
