// src/services/testing.rs
//
// Fixtures dos testes de serviço: tudo roda sobre o MemoryStore.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    db::{MemoryStore, NewAccount, NewParty, Store},
    domain::approval::ApprovalStamp,
    middleware::actors::{AdminActor, ClientActor, CompanyActor, ProviderActor},
    models::{
        auth::User,
        catalog::{BillingType, Service},
    },
};

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

async fn account(store: &Arc<dyn Store>, party: NewParty) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    store
        .register_account(NewAccount {
            email: format!("{}@test.fr", tag),
            password_hash: "hash".into(),
            first_name: "Test".into(),
            last_name: tag,
            phone: "0600000000".into(),
            party,
        })
        .await
        .unwrap()
}

pub async fn admin(store: &Arc<dyn Store>) -> AdminActor {
    AdminActor {
        user: account(store, NewParty::Admin).await,
    }
}

pub async fn client(store: &Arc<dyn Store>) -> ClientActor {
    let user = account(store, NewParty::Client { address: None }).await;
    let client = store.find_client_by_user(user.id).await.unwrap().unwrap();
    ClientActor { user, client }
}

pub async fn provider(store: &Arc<dyn Store>, specialty: &str, approved: bool) -> ProviderActor {
    let user = account(
        store,
        NewParty::Prestataire {
            specialty: specialty.into(),
        },
    )
    .await;
    let mut provider = store.find_provider_by_user(user.id).await.unwrap().unwrap();
    if approved {
        provider = store.approve_provider(provider.id, stamp()).await.unwrap();
    }
    ProviderActor { user, provider }
}

pub async fn company(store: &Arc<dyn Store>, approved: bool) -> CompanyActor {
    let user = account(
        store,
        NewParty::Societe {
            name: "ACME".into(),
            address: "1 rue de Paris".into(),
            registration_number: "FR123".into(),
        },
    )
    .await;
    let mut company = store.find_company_by_user(user.id).await.unwrap().unwrap();
    if approved {
        company = store.approve_company(company.id, stamp()).await.unwrap();
    }
    CompanyActor { user, company }
}

pub async fn service(
    store: &Arc<dyn Store>,
    company_id: Uuid,
    skills_required: Option<&str>,
) -> Service {
    let service = Service {
        id: Uuid::new_v4(),
        company_id,
        name: "Réparation".into(),
        description: "Réparation fuite".into(),
        category: "Maintenance".into(),
        base_price: Decimal::new(100, 0),
        estimated_hours: 2,
        is_active: true,
        requires_approval: false,
        max_concurrent_prestations: None,
        requirements: None,
        deliverables: None,
        skills_required: skills_required.map(str::to_owned),
        billing_type: BillingType::Fixed,
        vat_rate: Decimal::new(2000, 2),
        created_at: Utc::now(),
        last_modified: None,
        total_prestations: 0,
        completed_prestations: 0,
        in_progress_count: 0,
        average_rating: 0.0,
    };
    store.insert_service(&service).await.unwrap()
}

fn stamp() -> ApprovalStamp {
    ApprovalStamp {
        approved_by: Uuid::new_v4(),
        approved_at: Utc::now(),
    }
}
