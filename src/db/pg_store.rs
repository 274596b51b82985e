// src/db/pg_store.rs
//
// Adaptador Postgres da porta `Store`.
// Queries em tempo de execução (query_as + bind), sem as macros de checagem
// em compilação: o crate compila sem um banco acessível.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{NewAccount, NewParty, PrestationScope, Store},
    domain::approval::ApprovalStamp,
    models::{
        auth::{Role, User},
        catalog::Service,
        parties::{Client, Prestataire, Societe},
        prestation::Prestation,
    },
};

// Contadores de performance calculados na leitura
const SERVICE_SELECT: &str = r#"
    SELECT
        s.id, s.company_id, s.name, s.description, s.category,
        s.base_price, s.estimated_hours, s.is_active, s.requires_approval,
        s.max_concurrent_prestations, s.requirements, s.deliverables,
        s.skills_required, s.billing_type, s.vat_rate, s.created_at, s.last_modified,
        (SELECT COUNT(*) FROM prestations p
            WHERE p.service_id = s.id) AS total_prestations,
        (SELECT COUNT(*) FROM prestations p
            WHERE p.service_id = s.id
              AND p.status IN ('COMPLETED', 'VALIDATED')) AS completed_prestations,
        (SELECT COUNT(*) FROM prestations p
            WHERE p.service_id = s.id
              AND p.status IN ('ASSIGNED', 'IN_PROGRESS')) AS in_progress_count,
        (SELECT COALESCE(AVG(p.client_rating), 0)::float8 FROM prestations p
            WHERE p.service_id = s.id
              AND p.client_rating IS NOT NULL) AS average_rating
    FROM services s
"#;

const USER_COLUMNS: &str = r#"
    id, email, password_hash, role, first_name, last_name, phone,
    is_locked, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_party(
        tx: &mut Transaction<'_, Postgres>,
        user: &User,
        party: &NewParty,
    ) -> Result<(), AppError> {
        match party {
            NewParty::Admin => {}
            NewParty::Client { address } => {
                sqlx::query(
                    r#"
                    INSERT INTO clients (id, user_id, last_name, first_name, phone, email, address)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user.id)
                .bind(&user.last_name)
                .bind(&user.first_name)
                .bind(&user.phone)
                .bind(&user.email)
                .bind(address)
                .execute(&mut **tx)
                .await?;
            }
            NewParty::Prestataire { specialty } => {
                sqlx::query(
                    r#"
                    INSERT INTO prestataires (id, user_id, last_name, first_name, phone, specialty)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user.id)
                .bind(&user.last_name)
                .bind(&user.first_name)
                .bind(&user.phone)
                .bind(specialty)
                .execute(&mut **tx)
                .await?;
            }
            NewParty::Societe {
                name,
                address,
                registration_number,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO societes (id, user_id, name, address, email, registration_number)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user.id)
                .bind(name)
                .bind(address)
                .bind(&user.email)
                .bind(registration_number)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    async fn service_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let sql = format!("{} WHERE s.id = $1", SERVICE_SELECT);
        let service = sqlx::query_as::<_, Service>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(service)
    }
}

// Traduz violação de unicidade no e-mail para o erro de domínio
fn map_unique_email(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return AppError::EmailAlreadyExists;
        }
    }
    AppError::DatabaseError(e)
}

#[derive(sqlx::FromRow)]
struct ServiceWithCompany {
    #[sqlx(flatten)]
    service: Service,
    company_name: String,
}

#[async_trait]
impl Store for PgStore {
    // =========================================================================
    //  IDENTIDADE
    // =========================================================================

    async fn register_account(&self, account: NewAccount) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let sql = format!(
            r#"
            INSERT INTO users (id, email, password_hash, role, first_name, last_name, phone,
                               is_locked, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.party.role())
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.phone)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_email)?;

        // Se falhar aqui, o drop do tx desfaz o usuário criado acima
        Self::insert_party(&mut tx, &user, &account.party).await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn set_user_locked(&self, id: Uuid, locked: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET is_locked = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(locked)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(role) = role else {
            return Ok(false);
        };

        match role {
            Role::Admin => {}
            Role::Client => {
                sqlx::query(
                    "DELETE FROM prestations WHERE client_id IN (SELECT id FROM clients WHERE user_id = $1)",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM clients WHERE user_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            Role::Prestataire => {
                sqlx::query(
                    "DELETE FROM prestations WHERE provider_id IN (SELECT id FROM prestataires WHERE user_id = $1)",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM prestataires WHERE user_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            Role::Societe => {
                sqlx::query(
                    r#"
                    DELETE FROM prestations WHERE service_id IN (
                        SELECT s.id FROM services s
                        JOIN societes c ON c.id = s.company_id
                        WHERE c.user_id = $1
                    )
                    "#,
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
                sqlx::query(
                    "DELETE FROM services WHERE company_id IN (SELECT id FROM societes WHERE user_id = $1)",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM societes WHERE user_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // =========================================================================
    //  PAPÉIS
    // =========================================================================

    async fn find_client_by_user(&self, user_id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn find_provider_by_user(&self, user_id: Uuid) -> Result<Option<Prestataire>, AppError> {
        let provider = sqlx::query_as::<_, Prestataire>("SELECT * FROM prestataires WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(provider)
    }

    async fn find_company_by_user(&self, user_id: Uuid) -> Result<Option<Societe>, AppError> {
        let company = sqlx::query_as::<_, Societe>("SELECT * FROM societes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn find_client(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn find_provider(&self, id: Uuid) -> Result<Option<Prestataire>, AppError> {
        let provider = sqlx::query_as::<_, Prestataire>("SELECT * FROM prestataires WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(provider)
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Societe>, AppError> {
        let company = sqlx::query_as::<_, Societe>("SELECT * FROM societes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn update_provider(&self, provider: &Prestataire) -> Result<Prestataire, AppError> {
        sqlx::query_as::<_, Prestataire>(
            r#"
            UPDATE prestataires
            SET last_name = $2, first_name = $3, phone = $4, specialty = $5,
                hourly_rate = $6, is_available = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(provider.id)
        .bind(&provider.last_name)
        .bind(&provider.first_name)
        .bind(&provider.phone)
        .bind(&provider.specialty)
        .bind(provider.hourly_rate)
        .bind(provider.is_available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Prestataire"))
    }

    async fn approve_provider(&self, id: Uuid, stamp: ApprovalStamp) -> Result<Prestataire, AppError> {
        sqlx::query_as::<_, Prestataire>(
            r#"
            UPDATE prestataires
            SET is_approved = TRUE, approved_at = $2, approved_by = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stamp.approved_at)
        .bind(stamp.approved_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Prestataire"))
    }

    async fn approve_company(&self, id: Uuid, stamp: ApprovalStamp) -> Result<Societe, AppError> {
        sqlx::query_as::<_, Societe>(
            r#"
            UPDATE societes
            SET is_approved = TRUE, approved_at = $2, approved_by = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stamp.approved_at)
        .bind(stamp.approved_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Societe"))
    }

    async fn list_pending_providers(&self) -> Result<Vec<Prestataire>, AppError> {
        let providers = sqlx::query_as::<_, Prestataire>(
            r#"
            SELECT p.* FROM prestataires p
            JOIN users u ON u.id = p.user_id
            WHERE p.is_approved = FALSE AND u.is_locked = FALSE
            ORDER BY p.registered_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(providers)
    }

    async fn list_pending_companies(&self) -> Result<Vec<Societe>, AppError> {
        let companies = sqlx::query_as::<_, Societe>(
            r#"
            SELECT c.* FROM societes c
            JOIN users u ON u.id = c.user_id
            WHERE c.is_approved = FALSE AND u.is_locked = FALSE
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn list_approved_providers(&self) -> Result<Vec<Prestataire>, AppError> {
        let providers = sqlx::query_as::<_, Prestataire>(
            r#"
            SELECT p.* FROM prestataires p
            JOIN users u ON u.id = p.user_id
            WHERE p.is_approved = TRUE AND u.is_locked = FALSE
            ORDER BY p.last_name, p.first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(providers)
    }

    // =========================================================================
    //  CATÁLOGO
    // =========================================================================

    async fn insert_service(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, company_id, name, description, category, base_price, estimated_hours,
                is_active, requires_approval, max_concurrent_prestations, requirements,
                deliverables, skills_required, billing_type, vat_rate, created_at, last_modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(service.id)
        .bind(service.company_id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.category)
        .bind(service.base_price)
        .bind(service.estimated_hours)
        .bind(service.is_active)
        .bind(service.requires_approval)
        .bind(service.max_concurrent_prestations)
        .bind(&service.requirements)
        .bind(&service.deliverables)
        .bind(&service.skills_required)
        .bind(service.billing_type)
        .bind(service.vat_rate)
        .bind(service.created_at)
        .bind(service.last_modified)
        .execute(&self.pool)
        .await?;

        self.service_by_id(service.id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))
    }

    async fn update_service(&self, service: &Service) -> Result<Service, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE services
            SET name = $2, description = $3, category = $4, base_price = $5,
                estimated_hours = $6, is_active = $7, requires_approval = $8,
                max_concurrent_prestations = $9, requirements = $10, deliverables = $11,
                skills_required = $12, billing_type = $13, vat_rate = $14, last_modified = $15
            WHERE id = $1
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.category)
        .bind(service.base_price)
        .bind(service.estimated_hours)
        .bind(service.is_active)
        .bind(service.requires_approval)
        .bind(service.max_concurrent_prestations)
        .bind(&service.requirements)
        .bind(&service.deliverables)
        .bind(&service.skills_required)
        .bind(service.billing_type)
        .bind(service.vat_rate)
        .bind(service.last_modified)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Service"));
        }
        self.service_by_id(service.id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))
    }

    async fn delete_service(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict("o service possui prestations vinculadas".into())
                }
                _ => AppError::DatabaseError(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Service"));
        }
        Ok(())
    }

    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        self.service_by_id(id).await
    }

    async fn list_company_services(&self, company_id: Uuid) -> Result<Vec<Service>, AppError> {
        let sql = format!("{} WHERE s.company_id = $1 ORDER BY s.name", SERVICE_SELECT);
        let services = sqlx::query_as::<_, Service>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(services)
    }

    async fn list_bookable_services(&self) -> Result<Vec<(Service, String)>, AppError> {
        // A regra "empresa aprovada" vive aqui, na fronteira da query
        let sql = format!(
            r#"
            SELECT listing.*, c.name AS company_name
            FROM ({}) listing
            JOIN societes c ON c.id = listing.company_id
            JOIN users u ON u.id = c.user_id
            WHERE listing.is_active = TRUE
              AND c.is_approved = TRUE
              AND u.is_locked = FALSE
            ORDER BY listing.category, listing.name
            "#,
            SERVICE_SELECT
        );
        let rows = sqlx::query_as::<_, ServiceWithCompany>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| (r.service, r.company_name)).collect())
    }

    // =========================================================================
    //  PRESTATIONS
    // =========================================================================

    async fn insert_prestation(&self, prestation: &Prestation) -> Result<Prestation, AppError> {
        let inserted = sqlx::query_as::<_, Prestation>(
            r#"
            INSERT INTO prestations (
                id, service_id, client_id, provider_id, description, status,
                created_at, assigned_at, started_at, ended_at, validated_at,
                final_price, estimated_hours, actual_hours, client_rating, client_feedback,
                provider_notes, progress_log, final_report, is_paused,
                quality_validated, validated_by, version, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24)
            RETURNING *
            "#,
        )
        .bind(prestation.id)
        .bind(prestation.service_id)
        .bind(prestation.client_id)
        .bind(prestation.provider_id)
        .bind(&prestation.description)
        .bind(prestation.status)
        .bind(prestation.created_at)
        .bind(prestation.assigned_at)
        .bind(prestation.started_at)
        .bind(prestation.ended_at)
        .bind(prestation.validated_at)
        .bind(prestation.final_price)
        .bind(prestation.estimated_hours)
        .bind(prestation.actual_hours)
        .bind(prestation.client_rating)
        .bind(&prestation.client_feedback)
        .bind(&prestation.provider_notes)
        .bind(Json(&prestation.progress_log))
        .bind(&prestation.final_report)
        .bind(prestation.is_paused)
        .bind(prestation.quality_validated)
        .bind(prestation.validated_by)
        .bind(prestation.version)
        .bind(prestation.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn find_prestation(&self, id: Uuid) -> Result<Option<Prestation>, AppError> {
        let prestation = sqlx::query_as::<_, Prestation>("SELECT * FROM prestations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(prestation)
    }

    async fn update_prestation(&self, prestation: &Prestation) -> Result<Prestation, AppError> {
        // Concorrência otimista: só grava se ninguém mudou a versão lida
        let updated = sqlx::query_as::<_, Prestation>(
            r#"
            UPDATE prestations
            SET provider_id = $3, description = $4, status = $5,
                assigned_at = $6, started_at = $7, ended_at = $8, validated_at = $9,
                final_price = $10, actual_hours = $11, client_rating = $12,
                client_feedback = $13, provider_notes = $14, progress_log = $15,
                final_report = $16, is_paused = $17, quality_validated = $18,
                validated_by = $19, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(prestation.id)
        .bind(prestation.version)
        .bind(prestation.provider_id)
        .bind(&prestation.description)
        .bind(prestation.status)
        .bind(prestation.assigned_at)
        .bind(prestation.started_at)
        .bind(prestation.ended_at)
        .bind(prestation.validated_at)
        .bind(prestation.final_price)
        .bind(prestation.actual_hours)
        .bind(prestation.client_rating)
        .bind(&prestation.client_feedback)
        .bind(&prestation.provider_notes)
        .bind(Json(&prestation.progress_log))
        .bind(&prestation.final_report)
        .bind(prestation.is_paused)
        .bind(prestation.quality_validated)
        .bind(prestation.validated_by)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(p) => Ok(p),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM prestations WHERE id = $1)")
                        .bind(prestation.id)
                        .fetch_one(&self.pool)
                        .await?;
                if exists {
                    Err(AppError::ConcurrentModification)
                } else {
                    Err(AppError::not_found("Prestation"))
                }
            }
        }
    }

    async fn list_prestations(&self, scope: PrestationScope) -> Result<Vec<Prestation>, AppError> {
        let query = match scope {
            PrestationScope::All => {
                sqlx::query_as::<_, Prestation>("SELECT * FROM prestations ORDER BY created_at DESC")
            }
            PrestationScope::Client(client_id) => sqlx::query_as::<_, Prestation>(
                "SELECT * FROM prestations WHERE client_id = $1 ORDER BY created_at DESC",
            )
            .bind(client_id),
            PrestationScope::Provider(provider_id) => sqlx::query_as::<_, Prestation>(
                r#"
                SELECT * FROM prestations WHERE provider_id = $1
                ORDER BY assigned_at DESC NULLS LAST, created_at DESC
                "#,
            )
            .bind(provider_id),
            PrestationScope::Company(company_id) => sqlx::query_as::<_, Prestation>(
                r#"
                SELECT p.* FROM prestations p
                JOIN services s ON s.id = p.service_id
                WHERE s.company_id = $1
                ORDER BY p.created_at DESC
                "#,
            )
            .bind(company_id),
        };

        let prestations = query.fetch_all(&self.pool).await?;
        Ok(prestations)
    }

    async fn list_open_prestations(&self) -> Result<Vec<(Prestation, Service)>, AppError> {
        let prestations = sqlx::query_as::<_, Prestation>(
            r#"
            SELECT p.* FROM prestations p
            JOIN services s ON s.id = p.service_id
            JOIN societes c ON c.id = s.company_id
            JOIN users u ON u.id = c.user_id
            WHERE p.status = 'PLANNED' AND p.provider_id IS NULL
              AND s.is_active = TRUE
              AND c.is_approved = TRUE
              AND u.is_locked = FALSE
            ORDER BY p.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut ids: Vec<Uuid> = prestations.iter().map(|p| p.service_id).collect();
        ids.sort();
        ids.dedup();

        let sql = format!("{} WHERE s.id = ANY($1)", SERVICE_SELECT);
        let services = sqlx::query_as::<_, Service>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(prestations
            .into_iter()
            .filter_map(|p| {
                let service = services.iter().find(|s| s.id == p.service_id)?.clone();
                Some((p, service))
            })
            .collect())
    }
}
