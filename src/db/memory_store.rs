// src/db/memory_store.rs
//
// Adaptador em memória da porta `Store` (STORE_BACKEND=memory e testes).
// Um único RwLock sobre todas as tabelas: cada escrita é atômica.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{NewAccount, NewParty, PrestationScope, Store},
    domain::approval::ApprovalStamp,
    models::{
        auth::{Role, User},
        catalog::Service,
        parties::{Client, Prestataire, Societe},
        prestation::{Prestation, PrestationStatus},
    },
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    clients: HashMap<Uuid, Client>,
    providers: HashMap<Uuid, Prestataire>,
    companies: HashMap<Uuid, Societe>,
    services: HashMap<Uuid, Service>,
    prestations: HashMap<Uuid, Prestation>,
}

impl Tables {
    fn user_locked(&self, user_id: Uuid) -> bool {
        self.users.get(&user_id).is_some_and(|u| u.is_locked)
    }

    // Mesma semântica das subqueries do SERVICE_SELECT
    fn with_counters(&self, service: &Service) -> Service {
        let related: Vec<&Prestation> = self
            .prestations
            .values()
            .filter(|p| p.service_id == service.id)
            .collect();
        let ratings: Vec<i32> = related.iter().filter_map(|p| p.client_rating).collect();

        let mut s = service.clone();
        s.total_prestations = related.len() as i64;
        s.completed_prestations = related.iter().filter(|p| p.status.is_delivered()).count() as i64;
        s.in_progress_count = related.iter().filter(|p| p.status.is_active()).count() as i64;
        s.average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64
        };
        s
    }

    // Service ativo de empresa aprovada e não bloqueada
    fn is_bookable(&self, service: &Service) -> bool {
        service.is_active
            && self
                .companies
                .get(&service.company_id)
                .is_some_and(|c| c.is_approved && !self.user_locked(c.user_id))
    }

    fn company_of(&self, service_id: Uuid) -> Option<Uuid> {
        self.services.get(&service_id).map(|s| s.company_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut prestations: Vec<Prestation>) -> Vec<Prestation> {
    prestations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    prestations
}

#[async_trait]
impl Store for MemoryStore {
    // =========================================================================
    //  IDENTIDADE
    // =========================================================================

    async fn register_account(&self, account: NewAccount) -> Result<User, AppError> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == account.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: account.email,
            password_hash: account.password_hash,
            role: account.party.role(),
            first_name: account.first_name,
            last_name: account.last_name,
            phone: account.phone,
            is_locked: false,
            created_at: now,
            updated_at: now,
        };

        match account.party {
            NewParty::Admin => {}
            NewParty::Client { address } => {
                let client = Client {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    last_name: user.last_name.clone(),
                    first_name: user.first_name.clone(),
                    phone: user.phone.clone(),
                    email: user.email.clone(),
                    address,
                    client_type: "Particulier".into(),
                    registered_at: now,
                };
                t.clients.insert(client.id, client);
            }
            NewParty::Prestataire { specialty } => {
                let provider = Prestataire {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    last_name: user.last_name.clone(),
                    first_name: user.first_name.clone(),
                    phone: user.phone.clone(),
                    specialty: Some(specialty),
                    hourly_rate: Decimal::ZERO,
                    is_available: true,
                    registered_at: now,
                    is_approved: false,
                    approved_at: None,
                    approved_by: None,
                };
                t.providers.insert(provider.id, provider);
            }
            NewParty::Societe {
                name,
                address,
                registration_number,
            } => {
                let company = Societe {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    name,
                    address,
                    email: user.email.clone(),
                    registration_number,
                    is_approved: false,
                    approved_at: None,
                    approved_by: None,
                };
                t.companies.insert(company.id, company);
            }
        }

        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let t = self.tables.read().await;
        let mut users: Vec<User> = t.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn set_user_locked(&self, id: Uuid, locked: bool) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        match t.users.get_mut(&id) {
            Some(user) => {
                user.is_locked = locked;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        let Some(user) = t.users.get(&id).cloned() else {
            return Ok(false);
        };

        match user.role {
            Role::Admin => {}
            Role::Client => {
                let client_ids: Vec<Uuid> = t
                    .clients
                    .values()
                    .filter(|c| c.user_id == id)
                    .map(|c| c.id)
                    .collect();
                t.prestations.retain(|_, p| !client_ids.contains(&p.client_id));
                t.clients.retain(|_, c| c.user_id != id);
            }
            Role::Prestataire => {
                let provider_ids: Vec<Uuid> = t
                    .providers
                    .values()
                    .filter(|p| p.user_id == id)
                    .map(|p| p.id)
                    .collect();
                t.prestations
                    .retain(|_, p| !p.provider_id.is_some_and(|pid| provider_ids.contains(&pid)));
                t.providers.retain(|_, p| p.user_id != id);
            }
            Role::Societe => {
                let company_ids: Vec<Uuid> = t
                    .companies
                    .values()
                    .filter(|c| c.user_id == id)
                    .map(|c| c.id)
                    .collect();
                let service_ids: Vec<Uuid> = t
                    .services
                    .values()
                    .filter(|s| company_ids.contains(&s.company_id))
                    .map(|s| s.id)
                    .collect();
                t.prestations.retain(|_, p| !service_ids.contains(&p.service_id));
                t.services.retain(|_, s| !company_ids.contains(&s.company_id));
                t.companies.retain(|_, c| c.user_id != id);
            }
        }

        // approved_by ON DELETE SET NULL
        for provider in t.providers.values_mut() {
            if provider.approved_by == Some(id) {
                provider.approved_by = None;
            }
        }
        for company in t.companies.values_mut() {
            if company.approved_by == Some(id) {
                company.approved_by = None;
            }
        }

        t.users.remove(&id);
        Ok(true)
    }

    // =========================================================================
    //  PAPÉIS
    // =========================================================================

    async fn find_client_by_user(&self, user_id: Uuid) -> Result<Option<Client>, AppError> {
        let t = self.tables.read().await;
        Ok(t.clients.values().find(|c| c.user_id == user_id).cloned())
    }

    async fn find_provider_by_user(&self, user_id: Uuid) -> Result<Option<Prestataire>, AppError> {
        let t = self.tables.read().await;
        Ok(t.providers.values().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_company_by_user(&self, user_id: Uuid) -> Result<Option<Societe>, AppError> {
        let t = self.tables.read().await;
        Ok(t.companies.values().find(|c| c.user_id == user_id).cloned())
    }

    async fn find_client(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        Ok(self.tables.read().await.clients.get(&id).cloned())
    }

    async fn find_provider(&self, id: Uuid) -> Result<Option<Prestataire>, AppError> {
        Ok(self.tables.read().await.providers.get(&id).cloned())
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Societe>, AppError> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn update_provider(&self, provider: &Prestataire) -> Result<Prestataire, AppError> {
        let mut t = self.tables.write().await;
        let stored = t
            .providers
            .get_mut(&provider.id)
            .ok_or_else(|| AppError::not_found("Prestataire"))?;

        stored.last_name = provider.last_name.clone();
        stored.first_name = provider.first_name.clone();
        stored.phone = provider.phone.clone();
        stored.specialty = provider.specialty.clone();
        stored.hourly_rate = provider.hourly_rate;
        stored.is_available = provider.is_available;
        Ok(stored.clone())
    }

    async fn approve_provider(&self, id: Uuid, stamp: ApprovalStamp) -> Result<Prestataire, AppError> {
        let mut t = self.tables.write().await;
        let provider = t
            .providers
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Prestataire"))?;
        provider.is_approved = true;
        provider.approved_at = Some(stamp.approved_at);
        provider.approved_by = Some(stamp.approved_by);
        Ok(provider.clone())
    }

    async fn approve_company(&self, id: Uuid, stamp: ApprovalStamp) -> Result<Societe, AppError> {
        let mut t = self.tables.write().await;
        let company = t
            .companies
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Societe"))?;
        company.is_approved = true;
        company.approved_at = Some(stamp.approved_at);
        company.approved_by = Some(stamp.approved_by);
        Ok(company.clone())
    }

    async fn list_pending_providers(&self) -> Result<Vec<Prestataire>, AppError> {
        let t = self.tables.read().await;
        let mut pending: Vec<Prestataire> = t
            .providers
            .values()
            .filter(|p| !p.is_approved && !t.user_locked(p.user_id))
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.registered_at.cmp(&b.registered_at));
        Ok(pending)
    }

    async fn list_pending_companies(&self) -> Result<Vec<Societe>, AppError> {
        let t = self.tables.read().await;
        let mut pending: Vec<Societe> = t
            .companies
            .values()
            .filter(|c| !c.is_approved && !t.user_locked(c.user_id))
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(pending)
    }

    async fn list_approved_providers(&self) -> Result<Vec<Prestataire>, AppError> {
        let t = self.tables.read().await;
        let mut approved: Vec<Prestataire> = t
            .providers
            .values()
            .filter(|p| p.is_approved && !t.user_locked(p.user_id))
            .cloned()
            .collect();
        approved.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(approved)
    }

    // =========================================================================
    //  CATÁLOGO
    // =========================================================================

    async fn insert_service(&self, service: &Service) -> Result<Service, AppError> {
        let mut t = self.tables.write().await;
        if !t.companies.contains_key(&service.company_id) {
            return Err(AppError::not_found("Societe"));
        }
        t.services.insert(service.id, service.clone());
        Ok(t.with_counters(service))
    }

    async fn update_service(&self, service: &Service) -> Result<Service, AppError> {
        let mut t = self.tables.write().await;
        let stored = t
            .services
            .get_mut(&service.id)
            .ok_or_else(|| AppError::not_found("Service"))?;

        // company_id e created_at não mudam numa atualização
        let company_id = stored.company_id;
        let created_at = stored.created_at;
        *stored = service.clone();
        stored.company_id = company_id;
        stored.created_at = created_at;

        let updated = stored.clone();
        Ok(t.with_counters(&updated))
    }

    async fn delete_service(&self, id: Uuid) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if !t.services.contains_key(&id) {
            return Err(AppError::not_found("Service"));
        }
        if t.prestations.values().any(|p| p.service_id == id) {
            return Err(AppError::Conflict("o service possui prestations vinculadas".into()));
        }
        t.services.remove(&id);
        Ok(())
    }

    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let t = self.tables.read().await;
        Ok(t.services.get(&id).map(|s| t.with_counters(s)))
    }

    async fn list_company_services(&self, company_id: Uuid) -> Result<Vec<Service>, AppError> {
        let t = self.tables.read().await;
        let mut services: Vec<Service> = t
            .services
            .values()
            .filter(|s| s.company_id == company_id)
            .map(|s| t.with_counters(s))
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn list_bookable_services(&self) -> Result<Vec<(Service, String)>, AppError> {
        let t = self.tables.read().await;
        let mut listing: Vec<(Service, String)> = t
            .services
            .values()
            .filter(|s| t.is_bookable(s))
            .filter_map(|s| {
                let company = t.companies.get(&s.company_id)?;
                Some((t.with_counters(s), company.name.clone()))
            })
            .collect();
        listing.sort_by(|(a, _), (b, _)| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Ok(listing)
    }

    // =========================================================================
    //  PRESTATIONS
    // =========================================================================

    async fn insert_prestation(&self, prestation: &Prestation) -> Result<Prestation, AppError> {
        let mut t = self.tables.write().await;
        if !t.services.contains_key(&prestation.service_id) {
            return Err(AppError::not_found("Service"));
        }
        if !t.clients.contains_key(&prestation.client_id) {
            return Err(AppError::not_found("Client"));
        }
        t.prestations.insert(prestation.id, prestation.clone());
        Ok(prestation.clone())
    }

    async fn find_prestation(&self, id: Uuid) -> Result<Option<Prestation>, AppError> {
        Ok(self.tables.read().await.prestations.get(&id).cloned())
    }

    async fn update_prestation(&self, prestation: &Prestation) -> Result<Prestation, AppError> {
        let mut t = self.tables.write().await;
        let stored = t
            .prestations
            .get_mut(&prestation.id)
            .ok_or_else(|| AppError::not_found("Prestation"))?;

        if stored.version != prestation.version {
            return Err(AppError::ConcurrentModification);
        }

        let mut next = prestation.clone();
        next.service_id = stored.service_id;
        next.client_id = stored.client_id;
        next.created_at = stored.created_at;
        next.estimated_hours = stored.estimated_hours;
        next.version = stored.version + 1;
        next.updated_at = Utc::now();
        *stored = next.clone();
        Ok(next)
    }

    async fn list_prestations(&self, scope: PrestationScope) -> Result<Vec<Prestation>, AppError> {
        let t = self.tables.read().await;
        let selected: Vec<Prestation> = t
            .prestations
            .values()
            .filter(|p| match scope {
                PrestationScope::All => true,
                PrestationScope::Client(id) => p.client_id == id,
                PrestationScope::Provider(id) => p.provider_id == Some(id),
                PrestationScope::Company(id) => t.company_of(p.service_id) == Some(id),
            })
            .cloned()
            .collect();

        if let PrestationScope::Provider(_) = scope {
            let mut selected = newest_first(selected);
            // Postgres: assigned_at DESC NULLS LAST
            selected.sort_by(|a, b| match (a.assigned_at, b.assigned_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
            return Ok(selected);
        }
        Ok(newest_first(selected))
    }

    async fn list_open_prestations(&self) -> Result<Vec<(Prestation, Service)>, AppError> {
        let t = self.tables.read().await;
        let mut open: Vec<(Prestation, Service)> = t
            .prestations
            .values()
            .filter(|p| p.status == PrestationStatus::Planned && p.provider_id.is_none())
            .filter_map(|p| {
                let service = t.services.get(&p.service_id)?;
                t.is_bookable(service)
                    .then(|| (p.clone(), t.with_counters(service)))
            })
            .collect();
        open.sort_by(|(a, _), (b, _)| a.created_at.cmp(&b.created_at));
        Ok(open)
    }
}
