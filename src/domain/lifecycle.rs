// src/domain/lifecycle.rs
//
// Máquina de estados da prestation.
// Toda mudança de status passa por `apply_transition`, que consulta a tabela
// TRANSITIONS. As operações abaixo são puras: recebem o registro carregado e
// devolvem uma cópia modificada, ou um erro sem tocar no original.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::prestation::{Prestation, PrestationStatus, ProgressEntry},
};

use PrestationStatus::*;

/// Condição extra exigida por uma linha da tabela.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    None,
    ProviderAttached,
    RatingRecorded,
}

impl Precondition {
    fn holds(&self, prestation: &Prestation) -> bool {
        match self {
            Precondition::None => true,
            Precondition::ProviderAttached => prestation.provider_id.is_some(),
            Precondition::RatingRecorded => prestation.client_rating.is_some(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Precondition::None => "",
            Precondition::ProviderAttached => "um prestataire deve estar vinculado",
            Precondition::RatingRecorded => "a avaliação do cliente deve estar registrada",
        }
    }
}

/// (de, para, pré-condição)
pub const TRANSITIONS: &[(PrestationStatus, PrestationStatus, Precondition)] = &[
    (Planned, Assigned, Precondition::ProviderAttached),
    (Assigned, InProgress, Precondition::None),
    (InProgress, Completed, Precondition::None),
    (Completed, Validated, Precondition::RatingRecorded),
    // Cancelamento: de qualquer estado exceto Completed/Validated
    (Planned, Cancelled, Precondition::None),
    (Assigned, Cancelled, Precondition::None),
    (InProgress, Cancelled, Precondition::None),
    (Cancelled, Cancelled, Precondition::None),
];

/// Estados a partir dos quais o prestataire pode devolver a prestation ao pool.
pub const RELEASABLE: &[PrestationStatus] = &[Planned, Assigned, InProgress];

pub fn find_rule(from: PrestationStatus, to: PrestationStatus) -> Option<Precondition> {
    TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, pre)| *pre)
}

pub fn can_transition(prestation: &Prestation, to: PrestationStatus) -> bool {
    check_transition(prestation, to).is_ok()
}

pub fn check_transition(prestation: &Prestation, to: PrestationStatus) -> Result<(), AppError> {
    let from = prestation.status;
    let precondition = find_rule(from, to).ok_or(AppError::InvalidTransition { from, to })?;

    if !precondition.holds(prestation) {
        return Err(AppError::WorkflowViolation(format!(
            "{:?} -> {:?}: {}",
            from,
            to,
            precondition.describe()
        )));
    }
    Ok(())
}

/// Valida e aplica a transição, carimbando as datas correspondentes.
pub fn apply_transition(
    prestation: &mut Prestation,
    to: PrestationStatus,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    check_transition(prestation, to)?;

    match to {
        Assigned => prestation.assigned_at = Some(now),
        InProgress => {
            prestation.started_at.get_or_insert(now);
        }
        Completed => {
            let ended = *prestation.ended_at.get_or_insert(now);
            prestation.actual_hours = prestation.started_at.map(|started| elapsed_hours(started, ended));
            prestation.is_paused = false;
        }
        Validated => prestation.validated_at = Some(now),
        Cancelled => prestation.is_paused = false,
        Planned => {}
    }

    prestation.status = to;
    Ok(())
}

// Horas inteiras, arredondadas para cima
fn elapsed_hours(started: DateTime<Utc>, ended: DateTime<Utc>) -> i32 {
    let minutes = (ended - started).num_minutes().max(0);
    i32::try_from((minutes + 59) / 60).unwrap_or(i32::MAX)
}

// =========================================================================
//  OPERAÇÕES
// =========================================================================

/// Atribuição feita pela empresa.
pub fn assign(
    prestation: &Prestation,
    provider_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Prestation, AppError> {
    let mut next = prestation.clone();
    next.provider_id = Some(provider_id);
    apply_transition(&mut next, Assigned, now)?;
    Ok(next)
}

/// Reserva de uma prestation livre do pool. O status continua Planned;
/// o aceite posterior faz Planned -> Assigned.
pub fn claim(prestation: &Prestation, provider_id: Uuid) -> Result<Prestation, AppError> {
    match prestation.provider_id {
        Some(current) if current != provider_id => {
            return Err(AppError::forbidden("prestation vinculada a outro prestataire"));
        }
        Some(_) => {
            return Err(AppError::WorkflowViolation(
                "prestation já reservada por este prestataire".into(),
            ));
        }
        None => {}
    }
    if prestation.status != Planned {
        return Err(AppError::WorkflowViolation(
            "apenas prestations planejadas podem ser reservadas".into(),
        ));
    }

    let mut next = prestation.clone();
    next.provider_id = Some(provider_id);
    Ok(next)
}

/// Aceite pelo prestataire já vinculado.
pub fn accept(
    prestation: &Prestation,
    provider_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Prestation, AppError> {
    ensure_assignee(prestation, provider_id)?;

    let mut next = prestation.clone();
    apply_transition(&mut next, Assigned, now)?;
    Ok(next)
}

/// Recusa: desvincula o prestataire e devolve a prestation ao pool.
pub fn refuse(prestation: &Prestation, provider_id: Uuid) -> Result<Prestation, AppError> {
    ensure_assignee(prestation, provider_id)?;

    if !RELEASABLE.contains(&prestation.status) {
        return Err(AppError::InvalidTransition {
            from: prestation.status,
            to: Planned,
        });
    }

    let mut next = prestation.clone();
    next.provider_id = None;
    next.status = Planned;
    next.assigned_at = None;
    next.started_at = None;
    next.is_paused = false;
    Ok(next)
}

/// Avanço genérico conduzido pelo prestataire.
pub fn update_status(
    prestation: &Prestation,
    provider_id: Uuid,
    target: PrestationStatus,
    notes: Option<String>,
    final_report: Option<String>,
    now: DateTime<Utc>,
) -> Result<Prestation, AppError> {
    ensure_assignee(prestation, provider_id)?;

    let mut next = prestation.clone();
    apply_transition(&mut next, target, now)?;

    if notes.is_some() {
        next.provider_notes = notes;
    }
    if target == Completed && final_report.is_some() {
        next.final_report = final_report;
    }
    Ok(next)
}

/// Avaliação do cliente. Em Completed, dispara Completed -> Validated.
/// O intervalo [1,5] é validado antes, em `validate_rating`.
pub fn rate(
    prestation: &Prestation,
    validator_id: Uuid,
    rating: i32,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<Prestation, AppError> {
    let mut next = prestation.clone();
    next.client_rating = Some(rating);
    next.client_feedback = feedback;

    match prestation.status {
        Completed => {
            apply_transition(&mut next, Validated, now)?;
            next.quality_validated = true;
            next.validated_by = Some(validator_id);
        }
        Validated => {}
        _ => {
            return Err(AppError::WorkflowViolation(
                "apenas prestations concluídas podem ser avaliadas".into(),
            ));
        }
    }
    Ok(next)
}

pub fn cancel(prestation: &Prestation, now: DateTime<Utc>) -> Result<Prestation, AppError> {
    let mut next = prestation.clone();
    apply_transition(&mut next, Cancelled, now)?;
    Ok(next)
}

pub fn record_progress(
    prestation: &Prestation,
    provider_id: Uuid,
    note: String,
    now: DateTime<Utc>,
) -> Result<Prestation, AppError> {
    ensure_assignee(prestation, provider_id)?;

    let mut next = prestation.clone();
    next.progress_log.push(ProgressEntry { at: now, note });
    Ok(next)
}

pub fn update_pricing(prestation: &Prestation, price: Decimal) -> Result<Prestation, AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::InvalidField {
            field: "finalPrice",
            message: "O preço deve ser positivo.".into(),
        });
    }

    let mut next = prestation.clone();
    next.final_price = price;
    Ok(next)
}

/// Pausa/retoma: anotação informativa, só faz sentido em execução.
pub fn set_paused(
    prestation: &Prestation,
    provider_id: Uuid,
    paused: bool,
) -> Result<Prestation, AppError> {
    ensure_assignee(prestation, provider_id)?;

    if prestation.status != InProgress {
        return Err(AppError::WorkflowViolation(
            "apenas prestations em execução podem ser pausadas".into(),
        ));
    }

    let mut next = prestation.clone();
    next.is_paused = paused;
    Ok(next)
}

pub fn respond_to_review(
    prestation: &Prestation,
    provider_id: Uuid,
    response: &str,
) -> Result<Prestation, AppError> {
    ensure_assignee(prestation, provider_id)?;

    let mut next = prestation.clone();
    let mut notes = next.provider_notes.take().unwrap_or_default();
    notes.push_str(&format!("\nResponse to review: {}", response));
    next.provider_notes = Some(notes);
    Ok(next)
}

pub fn ensure_assignee(prestation: &Prestation, provider_id: Uuid) -> Result<(), AppError> {
    if prestation.provider_id != Some(provider_id) {
        return Err(AppError::forbidden("prestation não atribuída a este prestataire"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prestation_in(status: PrestationStatus) -> Prestation {
        let mut p = Prestation::new_request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Teste".into(),
            Decimal::new(100, 0),
            2,
            Utc::now(),
        );
        p.status = status;
        p
    }

    // Coloca o registro num estado em que as pré-condições da linha valem
    fn satisfy(p: &mut Prestation, pre: Precondition) {
        match pre {
            Precondition::None => {}
            Precondition::ProviderAttached => p.provider_id = Some(Uuid::new_v4()),
            Precondition::RatingRecorded => p.client_rating = Some(5),
        }
    }

    #[test]
    fn test_every_listed_transition_succeeds() {
        for (from, to, pre) in TRANSITIONS {
            let mut p = prestation_in(*from);
            satisfy(&mut p, *pre);
            apply_transition(&mut p, *to, Utc::now())
                .unwrap_or_else(|e| panic!("{:?} -> {:?} falhou: {}", from, to, e));
            assert_eq!(p.status, *to);
        }
    }

    #[test]
    fn test_every_unlisted_transition_is_rejected() {
        for from in PrestationStatus::ALL {
            for to in PrestationStatus::ALL {
                if find_rule(from, to).is_some() {
                    continue;
                }
                let mut p = prestation_in(from);
                p.provider_id = Some(Uuid::new_v4());
                p.client_rating = Some(3);
                let err = apply_transition(&mut p, to, Utc::now()).unwrap_err();
                assert!(matches!(err, AppError::InvalidTransition { .. }));
                assert_eq!(p.status, from, "{:?} -> {:?} mudou o status", from, to);
            }
        }
    }

    #[test]
    fn test_preconditions_are_enforced() {
        let mut planned = prestation_in(Planned);
        let err = apply_transition(&mut planned, Assigned, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::WorkflowViolation(_)));
        assert_eq!(planned.status, Planned);

        let mut completed = prestation_in(Completed);
        assert!(!can_transition(&completed, Validated));
        assert!(apply_transition(&mut completed, Validated, Utc::now()).is_err());
    }

    #[test]
    fn test_start_and_end_stamps_are_set_once() {
        let mut p = prestation_in(Assigned);
        let first = Utc::now() - chrono::Duration::hours(3);
        apply_transition(&mut p, InProgress, first).unwrap();
        assert_eq!(p.started_at, Some(first));

        let end = Utc::now();
        apply_transition(&mut p, Completed, end).unwrap();
        assert_eq!(p.started_at, Some(first));
        assert_eq!(p.ended_at, Some(end));
        assert_eq!(p.actual_hours, Some(3));
    }

    #[test]
    fn test_cancel_blocked_after_completion() {
        for status in [Completed, Validated] {
            assert!(cancel(&prestation_in(status), Utc::now()).is_err());
        }
        for status in [Planned, Assigned, InProgress, Cancelled] {
            let cancelled = cancel(&prestation_in(status), Utc::now()).unwrap();
            assert_eq!(cancelled.status, Cancelled);
        }
    }

    #[test]
    fn test_accept_requires_attached_provider() {
        let provider = Uuid::new_v4();
        let free = prestation_in(Planned);

        let err = accept(&free, provider, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let claimed = claim(&free, provider).unwrap();
        assert_eq!(claimed.status, Planned);
        assert_eq!(claimed.provider_id, Some(provider));

        let accepted = accept(&claimed, provider, Utc::now()).unwrap();
        assert_eq!(accepted.status, Assigned);
        assert_eq!(accepted.provider_id, Some(provider));
        assert!(accepted.assigned_at.is_some());

        // Assigned -> Assigned não está na tabela
        assert!(matches!(
            accept(&accepted, provider, Utc::now()).unwrap_err(),
            AppError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn test_claim_only_free_planned_prestations() {
        let provider = Uuid::new_v4();

        let mut taken = prestation_in(Planned);
        taken.provider_id = Some(Uuid::new_v4());
        assert!(matches!(claim(&taken, provider).unwrap_err(), AppError::Forbidden(_)));

        taken.provider_id = Some(provider);
        assert!(matches!(
            claim(&taken, provider).unwrap_err(),
            AppError::WorkflowViolation(_)
        ));

        assert!(matches!(
            claim(&prestation_in(Cancelled), provider).unwrap_err(),
            AppError::WorkflowViolation(_)
        ));
    }

    #[test]
    fn test_accept_rejects_someone_elses_prestation() {
        let mut p = prestation_in(Planned);
        p.provider_id = Some(Uuid::new_v4());
        let err = accept(&p, Uuid::new_v4(), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_refuse_returns_to_pool() {
        let provider = Uuid::new_v4();
        let mut p = prestation_in(Assigned);
        p.provider_id = Some(provider);
        p.assigned_at = Some(Utc::now());

        let released = refuse(&p, provider).unwrap();
        assert_eq!(released.status, Planned);
        assert!(released.provider_id.is_none());
        assert!(released.assigned_at.is_none());

        assert!(refuse(&p, Uuid::new_v4()).is_err());

        p.status = Completed;
        assert!(matches!(
            refuse(&p, provider).unwrap_err(),
            AppError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn test_update_status_requires_assignee() {
        let provider = Uuid::new_v4();
        let mut p = prestation_in(Assigned);
        p.provider_id = Some(provider);

        let err = update_status(&p, Uuid::new_v4(), InProgress, None, None, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let next = update_status(&p, provider, InProgress, Some("a caminho".into()), None, Utc::now())
            .unwrap();
        assert_eq!(next.status, InProgress);
        assert_eq!(next.provider_notes.as_deref(), Some("a caminho"));
        // original intocado
        assert_eq!(p.status, Assigned);
    }

    #[test]
    fn test_rate_validates_completed_and_updates_validated() {
        let client = Uuid::new_v4();
        let completed = prestation_in(Completed);
        let validated = rate(&completed, client, 4, Some("bom".into()), Utc::now()).unwrap();
        assert_eq!(validated.status, Validated);
        assert_eq!(validated.client_rating, Some(4));
        assert!(validated.validated_at.is_some());
        assert!(validated.quality_validated);
        assert_eq!(validated.validated_by, Some(client));

        let stamp = validated.validated_at;
        let rerated = rate(&validated, client, 2, None, Utc::now()).unwrap();
        assert_eq!(rerated.status, Validated);
        assert_eq!(rerated.client_rating, Some(2));
        assert_eq!(rerated.validated_at, stamp);

        assert!(rate(&prestation_in(InProgress), client, 4, None, Utc::now()).is_err());
    }

    #[test]
    fn test_progress_is_append_only() {
        let provider = Uuid::new_v4();
        let mut p = prestation_in(InProgress);
        p.provider_id = Some(provider);

        let once = record_progress(&p, provider, "etapa 1".into(), Utc::now()).unwrap();
        let twice = record_progress(&once, provider, "etapa 2".into(), Utc::now()).unwrap();
        assert_eq!(twice.progress_log.len(), 2);
        assert_eq!(twice.progress_log[0].note, "etapa 1");
        assert_eq!(twice.status, InProgress);
        assert!(record_progress(&p, Uuid::new_v4(), "x".into(), Utc::now()).is_err());
    }

    #[test]
    fn test_pricing_must_be_positive() {
        let p = prestation_in(Planned);
        assert!(update_pricing(&p, Decimal::ZERO).is_err());
        assert!(update_pricing(&p, Decimal::new(-5, 0)).is_err());
        let repriced = update_pricing(&p, Decimal::new(150, 0)).unwrap();
        assert_eq!(repriced.final_price, Decimal::new(150, 0));
        assert_eq!(repriced.status, Planned);
    }

    #[test]
    fn test_pause_only_in_progress() {
        let provider = Uuid::new_v4();
        let mut p = prestation_in(Assigned);
        p.provider_id = Some(provider);
        assert!(set_paused(&p, provider, true).is_err());
        p.status = InProgress;
        assert!(set_paused(&p, provider, true).unwrap().is_paused);
    }
}
