// src/models.rs

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod parties;
pub mod prestation;
