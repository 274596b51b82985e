// src/db/store.rs
//
// Porta de persistência. Cada método de escrita é uma unidade atômica
// (uma transação no Postgres, um único lock no adaptador em memória).

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    domain::approval::ApprovalStamp,
    models::{
        auth::{Role, User},
        catalog::Service,
        parties::{Client, Prestataire, Societe},
        prestation::Prestation,
    },
};

/// Dados do registro de papel criado junto com a identidade.
#[derive(Debug, Clone)]
pub enum NewParty {
    Admin,
    Client {
        address: Option<String>,
    },
    Prestataire {
        specialty: String,
    },
    Societe {
        name: String,
        address: String,
        registration_number: String,
    },
}

impl NewParty {
    pub fn role(&self) -> Role {
        match self {
            NewParty::Admin => Role::Admin,
            NewParty::Client { .. } => Role::Client,
            NewParty::Prestataire { .. } => Role::Prestataire,
            NewParty::Societe { .. } => Role::Societe,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub party: NewParty,
}

/// Recorte de prestations para listagem.
#[derive(Debug, Clone, Copy)]
pub enum PrestationScope {
    All,
    Client(Uuid),
    Provider(Uuid),
    Company(Uuid),
}

#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    //  IDENTIDADE
    // =========================================================================

    /// Cria a identidade e o registro do papel na mesma transação.
    async fn register_account(&self, account: NewAccount) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    /// Retorna false se o usuário não existe.
    async fn set_user_locked(&self, id: Uuid, locked: bool) -> Result<bool, AppError>;
    /// Apaga a conta e, em cascata, o papel e o que ele possui.
    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError>;

    // =========================================================================
    //  PAPÉIS
    // =========================================================================

    async fn find_client_by_user(&self, user_id: Uuid) -> Result<Option<Client>, AppError>;
    async fn find_provider_by_user(&self, user_id: Uuid) -> Result<Option<Prestataire>, AppError>;
    async fn find_company_by_user(&self, user_id: Uuid) -> Result<Option<Societe>, AppError>;

    async fn find_client(&self, id: Uuid) -> Result<Option<Client>, AppError>;
    async fn find_provider(&self, id: Uuid) -> Result<Option<Prestataire>, AppError>;
    async fn find_company(&self, id: Uuid) -> Result<Option<Societe>, AppError>;

    /// Perfil e disponibilidade (não mexe na aprovação).
    async fn update_provider(&self, provider: &Prestataire) -> Result<Prestataire, AppError>;

    async fn approve_provider(&self, id: Uuid, stamp: ApprovalStamp) -> Result<Prestataire, AppError>;
    async fn approve_company(&self, id: Uuid, stamp: ApprovalStamp) -> Result<Societe, AppError>;

    /// Não aprovados cuja conta não está bloqueada.
    async fn list_pending_providers(&self) -> Result<Vec<Prestataire>, AppError>;
    async fn list_pending_companies(&self) -> Result<Vec<Societe>, AppError>;
    async fn list_approved_providers(&self) -> Result<Vec<Prestataire>, AppError>;

    // =========================================================================
    //  CATÁLOGO
    // =========================================================================

    async fn insert_service(&self, service: &Service) -> Result<Service, AppError>;
    async fn update_service(&self, service: &Service) -> Result<Service, AppError>;
    /// Conflict se alguma prestation referencia o service.
    async fn delete_service(&self, id: Uuid) -> Result<(), AppError>;
    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, AppError>;
    async fn list_company_services(&self, company_id: Uuid) -> Result<Vec<Service>, AppError>;
    /// Services ativos de empresas aprovadas, com o nome da empresa.
    async fn list_bookable_services(&self) -> Result<Vec<(Service, String)>, AppError>;

    // =========================================================================
    //  PRESTATIONS
    // =========================================================================

    async fn insert_prestation(&self, prestation: &Prestation) -> Result<Prestation, AppError>;
    async fn find_prestation(&self, id: Uuid) -> Result<Option<Prestation>, AppError>;

    /// Grava se `prestation.version` ainda for a versão armazenada;
    /// caso contrário, ConcurrentModification. Devolve o registro com a versão nova.
    async fn update_prestation(&self, prestation: &Prestation) -> Result<Prestation, AppError>;

    /// Ordenado por criação (desc); para Provider, por atribuição (desc).
    async fn list_prestations(&self, scope: PrestationScope) -> Result<Vec<Prestation>, AppError>;

    /// Prestations Planned sem prestataire, com o Service de cada uma.
    /// Mesmo filtro de `list_bookable_services`: service ativo, empresa aprovada e não bloqueada.
    async fn list_open_prestations(&self) -> Result<Vec<(Prestation, Service)>, AppError>;
}
