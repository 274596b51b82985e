// src/domain.rs
//
// Regras puras, sem I/O.

pub mod approval;
pub mod lifecycle;
pub mod ownership;
pub mod reporting;
pub mod skills;
