// src/domain/reporting.rs
//
// Agregações de leitura usadas pelos dashboards.
// Todas aceitam listas vazias sem erro.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::prestation::{Prestation, PrestationStatus};

pub const RECENT_LIMIT: usize = 10;

pub fn count_active(prestations: &[Prestation]) -> usize {
    prestations.iter().filter(|p| p.status.is_active()).count()
}

pub fn count_delivered(prestations: &[Prestation]) -> usize {
    prestations.iter().filter(|p| p.status.is_delivered()).count()
}

/// Soma do preço final das prestations entregues (Completed ou Validated).
pub fn revenue(prestations: &[Prestation]) -> Decimal {
    prestations
        .iter()
        .filter(|p| p.status.is_delivered())
        .map(|p| p.final_price)
        .sum()
}

/// Média das notas registradas; conjunto vazio => 0.
pub fn average_rating(prestations: &[Prestation]) -> Decimal {
    let ratings: Vec<i32> = prestations.iter().filter_map(|p| p.client_rating).collect();
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let total: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (Decimal::from(total) / Decimal::from(ratings.len())).round_dp(2)
}

/// Todos os status aparecem, mesmo com contagem zero.
pub fn count_by_status(prestations: &[Prestation]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = PrestationStatus::ALL
        .iter()
        .map(|s| (format!("{:?}", s), 0))
        .collect();
    for p in prestations {
        *counts.entry(format!("{:?}", p.status)).or_default() += 1;
    }
    counts
}

/// As `n` mais recentes por data de criação (desc).
pub fn recent(prestations: &[Prestation], n: usize) -> Vec<Prestation> {
    let mut sorted = prestations.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}
