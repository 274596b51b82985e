// src/services.rs

pub mod account_service;
pub mod approval_service;
pub mod auth;
pub mod catalog_service;
pub mod dashboard_service;
pub mod prestation_service;
pub mod provider_service;

#[cfg(test)]
pub(crate) mod testing;
