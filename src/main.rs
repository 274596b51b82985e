//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod domain;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env().expect("Configuração inválida.");

    let app_state = AppState::new(&config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        app_state
            .auth_service
            .seed_admin(email, password)
            .await
            .expect("Falha ao criar o administrador inicial.");
    }

    let app = router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", config.bind_addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

fn router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me));

    let company_routes = Router::new()
        .route(
            "/services",
            post(handlers::catalog::create_service).get(handlers::catalog::list_my_services),
        )
        .route(
            "/services/{id}",
            get(handlers::catalog::get_my_service)
                .put(handlers::catalog::update_service)
                .delete(handlers::catalog::delete_service),
        )
        .route("/prestations", get(handlers::company::list_prestations))
        .route("/prestations/{id}", get(handlers::company::get_detail))
        .route("/prestations/{id}/assign", post(handlers::company::assign))
        .route("/prestations/{id}/pricing", put(handlers::company::update_pricing))
        .route("/providers", get(handlers::company::assignment_pool));

    let client_routes = Router::new()
        .route(
            "/prestations",
            post(handlers::client::create_request).get(handlers::client::list_history),
        )
        .route("/prestations/active", get(handlers::client::list_active))
        .route("/prestations/{id}", get(handlers::client::get_detail))
        .route("/prestations/{id}/rate", post(handlers::client::rate))
        .route("/prestations/{id}/cancel", post(handlers::client::cancel));

    let provider_routes = Router::new()
        .route(
            "/profile",
            get(handlers::provider::get_profile).put(handlers::provider::update_profile),
        )
        .route("/availability", put(handlers::provider::set_availability))
        .route("/prestations", get(handlers::provider::list_assigned))
        .route("/prestations/available", get(handlers::provider::list_available))
        .route("/prestations/{id}", get(handlers::provider::get_detail))
        .route("/prestations/{id}/claim", post(handlers::provider::claim))
        .route("/prestations/{id}/accept", post(handlers::provider::accept))
        .route("/prestations/{id}/refuse", post(handlers::provider::refuse))
        .route("/prestations/{id}/status", put(handlers::provider::update_status))
        .route("/prestations/{id}/progress", post(handlers::provider::record_progress))
        .route("/prestations/{id}/pause", put(handlers::provider::set_paused))
        .route(
            "/prestations/{id}/review-response",
            post(handlers::provider::respond_to_review),
        );

    let admin_routes = Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}", axum::routing::delete(handlers::admin::delete_user))
        .route("/users/{id}/deactivate", post(handlers::admin::deactivate_user))
        .route("/users/{id}/reactivate", post(handlers::admin::reactivate_user))
        .route("/approvals/providers", get(handlers::admin::pending_providers))
        .route("/approvals/providers/{id}/approve", post(handlers::admin::approve_provider))
        .route("/approvals/providers/{id}/reject", post(handlers::admin::reject_provider))
        .route("/approvals/companies", get(handlers::admin::pending_companies))
        .route("/approvals/companies/{id}/approve", post(handlers::admin::approve_company))
        .route("/approvals/companies/{id}/reject", post(handlers::admin::reject_company))
        .route("/prestations", get(handlers::admin::list_prestations))
        .route("/prestations/{id}", get(handlers::admin::get_prestation));

    let dashboard_routes = Router::new()
        .route("/admin", get(handlers::dashboard::admin_dashboard))
        .route("/company", get(handlers::dashboard::company_dashboard))
        .route("/provider", get(handlers::dashboard::provider_dashboard))
        .route("/client", get(handlers::dashboard::client_dashboard));

    // Tudo abaixo exige token válido; o papel é checado pelos extractors
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/company", company_routes)
        .nest("/api/client", client_routes)
        .nest("/api/provider", provider_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/services", get(handlers::catalog::list_bookable))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state)
}
