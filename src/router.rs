// src/router.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn create_router(app_state: AppState) -> Router {
    // Visões de listagem de empresas (uma rota por interação)
    let view_routes = Router::new()
        .route("/", post(handlers::views::create_view))
        .route(
            "/{id}",
            get(handlers::views::get_view).delete(handlers::views::close_view),
        )
        .route("/{id}/refresh", post(handlers::views::refresh_view))
        .route("/{id}/filter", put(handlers::views::set_filter))
        .route(
            "/{id}/search",
            get(handlers::views::watch_search).put(handlers::views::set_search),
        )
        .route("/{id}/order", put(handlers::views::set_order))
        .route("/{id}/page", put(handlers::views::set_page))
        .route("/{id}/per-page", put(handlers::views::set_per_page))
        .route(
            "/{id}/dialog",
            put(handlers::views::open_dialog).delete(handlers::views::close_dialog),
        );

    // Visões de listagem de usuários
    let user_view_routes = Router::new()
        .route("/", post(handlers::users::create_view))
        .route(
            "/{id}",
            get(handlers::users::get_view).delete(handlers::users::close_view),
        )
        .route("/{id}/refresh", post(handlers::users::refresh_view))
        .route(
            "/{id}/search",
            get(handlers::users::watch_search).put(handlers::users::set_search),
        )
        .route("/{id}/page", put(handlers::users::set_page))
        .route("/{id}/per-page", put(handlers::users::set_per_page));

    let settings_routes = Router::new().route(
        "/trial-limit",
        get(handlers::settings::get_trial_limit).put(handlers::settings::update_trial_limit),
    );

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/views/companies", view_routes)
        .nest("/api/views/users", user_view_routes)
        .route("/api/users/owners", get(handlers::users::list_owners))
        .nest("/api/settings", settings_routes)
        .with_state(app_state)
}
