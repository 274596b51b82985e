// src/domain/approval.rs
//
// Fluxo de aprovação de Societe / Prestataire.
// Não existe status "rejeitado" gravado: rejeição = conta bloqueada.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalState {
    pub fn derive(is_approved: bool, account_locked: bool) -> Self {
        match (is_approved, account_locked) {
            (true, _) => ApprovalState::Approved,
            (false, true) => ApprovalState::Rejected,
            (false, false) => ApprovalState::Pending,
        }
    }

    /// Só entidades aprovadas entram nos pools de atribuição / catálogo.
    pub fn is_operational(&self) -> bool {
        *self == ApprovalState::Approved
    }
}

/// Carimbo gravado ao aprovar
#[derive(Debug, Clone, Copy)]
pub struct ApprovalStamp {
    pub approved_by: Uuid,
    pub approved_at: DateTime<Utc>,
}

pub fn ensure_pending(state: ApprovalState) -> Result<(), AppError> {
    match state {
        ApprovalState::Pending => Ok(()),
        ApprovalState::Approved => Err(AppError::WorkflowViolation("cadastro já aprovado".into())),
        ApprovalState::Rejected => Err(AppError::WorkflowViolation(
            "cadastro rejeitado; reative a conta antes".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_derivation() {
        assert_eq!(ApprovalState::derive(false, false), ApprovalState::Pending);
        assert_eq!(ApprovalState::derive(true, false), ApprovalState::Approved);
        assert_eq!(ApprovalState::derive(false, true), ApprovalState::Rejected);
        // bloquear uma conta já aprovada não apaga a aprovação
        assert_eq!(ApprovalState::derive(true, true), ApprovalState::Approved);
    }

    #[test]
    fn test_only_pending_can_be_resolved() {
        assert!(ensure_pending(ApprovalState::Pending).is_ok());
        assert!(ensure_pending(ApprovalState::Approved).is_err());
        assert!(ensure_pending(ApprovalState::Rejected).is_err());
    }
}
