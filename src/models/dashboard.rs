// src/models/dashboard.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::prestation::Prestation;

// 1. Visão do administrador
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_clients: usize,
    pub total_providers: usize,
    pub total_companies: usize,
    pub total_prestations: usize,
    pub active_prestations: usize,
    pub total_revenue: Decimal,
    // Chave = nome do status (ex: "InProgress")
    pub prestations_by_status: BTreeMap<String, usize>,
    pub average_rating: Decimal,
    pub recent_prestations: Vec<Prestation>,
}

// 2. Visão da empresa
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDashboard {
    pub total_services: usize,
    pub active_prestations: usize,
    pub total_revenue: Decimal,
    pub average_rating: Decimal,
    pub recent_prestations: Vec<Prestation>,
}

// 3. Visão do prestataire
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDashboard {
    pub total_earnings: Decimal,
    pub completed_prestations: usize,
    pub pending_prestations: usize,
    pub average_rating: Decimal,
    pub active_prestations: Vec<Prestation>,
}

// 4. Visão do cliente
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    pub total_prestations: usize,
    pub completed_prestations: usize,
    pub active_prestations: Vec<Prestation>,
}
