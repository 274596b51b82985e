// src/handlers.rs

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod company;
pub mod dashboard;
pub mod provider;
