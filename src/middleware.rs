// src/middleware.rs

pub mod actors;
pub mod auth;
