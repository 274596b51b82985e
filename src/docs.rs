// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::domain;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catálogo ---
        handlers::catalog::list_bookable,
        handlers::catalog::create_service,
        handlers::catalog::list_my_services,
        handlers::catalog::get_my_service,
        handlers::catalog::update_service,
        handlers::catalog::delete_service,

        // --- Client ---
        handlers::client::create_request,
        handlers::client::list_history,
        handlers::client::list_active,
        handlers::client::get_detail,
        handlers::client::rate,
        handlers::client::cancel,

        // --- Company ---
        handlers::company::list_prestations,
        handlers::company::get_detail,
        handlers::company::assignment_pool,
        handlers::company::assign,
        handlers::company::update_pricing,

        // --- Provider ---
        handlers::provider::get_profile,
        handlers::provider::update_profile,
        handlers::provider::set_availability,
        handlers::provider::list_assigned,
        handlers::provider::list_available,
        handlers::provider::get_detail,
        handlers::provider::claim,
        handlers::provider::accept,
        handlers::provider::refuse,
        handlers::provider::update_status,
        handlers::provider::record_progress,
        handlers::provider::set_paused,
        handlers::provider::respond_to_review,

        // --- Admin ---
        handlers::admin::list_users,
        handlers::admin::deactivate_user,
        handlers::admin::reactivate_user,
        handlers::admin::delete_user,
        handlers::admin::pending_providers,
        handlers::admin::approve_provider,
        handlers::admin::reject_provider,
        handlers::admin::pending_companies,
        handlers::admin::approve_company,
        handlers::admin::reject_company,
        handlers::admin::list_prestations,
        handlers::admin::get_prestation,

        // --- Dashboard ---
        handlers::dashboard::admin_dashboard,
        handlers::dashboard::company_dashboard,
        handlers::dashboard::provider_dashboard,
        handlers::dashboard::client_dashboard,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::UserWithRole,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Partes ---
            models::parties::Client,
            models::parties::Prestataire,
            models::parties::Societe,
            models::parties::UpdateProviderProfilePayload,
            models::parties::AvailabilityPayload,
            domain::approval::ApprovalState,

            // --- Catálogo ---
            models::catalog::BillingType,
            models::catalog::Service,
            models::catalog::ServiceListing,
            models::catalog::ServicePayload,

            // --- Prestations ---
            models::prestation::PrestationStatus,
            models::prestation::PrestationAnnotation,
            models::prestation::ProgressEntry,
            models::prestation::Prestation,
            models::prestation::PrestationDetail,
            models::prestation::CreatePrestationPayload,
            models::prestation::AssignPrestationPayload,
            models::prestation::UpdateStatusPayload,
            models::prestation::RatePrestationPayload,
            models::prestation::ProgressPayload,
            models::prestation::PricingPayload,
            models::prestation::PausePayload,
            models::prestation::ReviewResponsePayload,

            // --- Dashboard ---
            models::dashboard::AdminDashboard,
            models::dashboard::CompanyDashboard,
            models::dashboard::ProviderDashboard,
            models::dashboard::ClientDashboard,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário autenticado"),
        (name = "Catalog", description = "Catálogo de Services"),
        (name = "Client", description = "Requisições e avaliações do cliente"),
        (name = "Company", description = "Gestão das prestations da empresa"),
        (name = "Provider", description = "Perfil e ciclo de vida do prestataire"),
        (name = "Admin", description = "Contas, aprovações e supervisão"),
        (name = "Dashboard", description = "Indicadores por papel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
