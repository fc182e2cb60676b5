// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Visões de empresas ---
        handlers::views::create_view,
        handlers::views::get_view,
        handlers::views::close_view,
        handlers::views::refresh_view,
        handlers::views::set_filter,
        handlers::views::set_search,
        handlers::views::watch_search,
        handlers::views::set_order,
        handlers::views::set_page,
        handlers::views::set_per_page,
        handlers::views::open_dialog,
        handlers::views::close_dialog,

        // --- Usuários ---
        handlers::users::create_view,
        handlers::users::get_view,
        handlers::users::close_view,
        handlers::users::refresh_view,
        handlers::users::set_search,
        handlers::users::watch_search,
        handlers::users::set_page,
        handlers::users::set_per_page,
        handlers::users::list_owners,

        // --- Settings ---
        handlers::settings::get_trial_limit,
        handlers::settings::update_trial_limit,
    ),
    components(
        schemas(
            // --- Listagem ---
            models::company::CompanyFilter,
            models::company::SortField,
            models::company::SortDirection,
            models::company::OrderBy,

            // --- Visão ---
            models::view::ListStatus,
            models::view::DialogKind,
            models::view::ActiveDialog,
            models::view::CompanyRow,
            models::view::CompanyDetails,
            models::view::QueryState,
            models::view::ViewSnapshot,
            models::view::SearchState,

            // --- Usuários ---
            models::view::UserRow,
            models::view::UserQueryState,
            models::view::UserViewSnapshot,
            models::user::OwnerOption,

            // --- Settings ---
            models::settings::TrialLimitSettings,
            models::settings::UpdateTrialLimitPayload,

            // --- Payloads ---
            handlers::views::CreateViewPayload,
            handlers::views::SetFilterPayload,
            handlers::views::SetSearchPayload,
            handlers::views::SetOrderPayload,
            handlers::views::SetPagePayload,
            handlers::views::SetPerPagePayload,
            handlers::views::OpenDialogPayload,
        )
    ),
    tags(
        (name = "Views", description = "Visões de listagem de empresas"),
        (name = "Users", description = "Visões de listagem de usuários e donos de empresa"),
        (name = "Settings", description = "Configurações do período de teste")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_token",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
