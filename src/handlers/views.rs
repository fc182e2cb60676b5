// src/handlers/views.rs

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AccessToken, i18n::Locale},
    models::{
        company::{CompanyFilter, SortField},
        view::{DialogKind, SearchState, ViewSnapshot},
    },
    services::{search_store::SearchReader, CompanyListView, ListView},
};

// Quanto a leitura longa da busca espera antes de devolver o valor atual
pub(crate) const SEARCH_WAIT: Duration = Duration::from_secs(25);

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewPayload {
    // A query string da URL atual, ex: "filter=allowed&page=3&q=padaria"
    #[serde(default)]
    #[validate(length(max = 2048, message = "A query string é longa demais."))]
    pub query: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetFilterPayload {
    pub filter: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetSearchPayload {
    #[serde(default)]
    #[validate(length(max = 255, message = "A busca deve ter no máximo 255 caracteres."))]
    pub q: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WatchSearchParams {
    /// O texto que o cabeçalho já mostra. Ausente: responde na hora.
    pub known: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetOrderPayload {
    pub field: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPagePayload {
    pub page: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPerPagePayload {
    pub per_page: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogPayload {
    pub kind: DialogKind,
    pub company_id: Option<i64>,
}

fn find_view(
    app_state: &AppState,
    id: Uuid,
    token: &str,
    locale: &Locale,
) -> Result<Arc<CompanyListView>, ApiError> {
    app_state
        .views
        .get(id, token)
        .map_err(|app_err| app_err.to_api_error(locale))
}

// =============================================================================
//  CICLO DE VIDA DA VISÃO
// =============================================================================

// POST /api/views/companies
#[utoipa::path(
    post,
    path = "/api/views/companies",
    tag = "Views",
    request_body = CreateViewPayload,
    responses(
        (status = 201, description = "Visão criada e carregada", body = ViewSnapshot)
    ),
    security(("api_token" = []))
)]
pub async fn create_view(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Json(payload): Json<CreateViewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let view = Arc::new(CompanyListView::new(
        Uuid::new_v4(),
        token,
        &payload.query,
        app_state.view_deps(),
        app_state.view_options,
    ));
    app_state.views.insert(view.clone());
    tracing::info!(view = %view.id(), query = %payload.query, "Visão de empresas criada");

    view.mount().await;

    Ok((StatusCode::CREATED, Json(view.snapshot(locale.0))))
}

// GET /api/views/companies/{id}
#[utoipa::path(
    get,
    path = "/api/views/companies/{id}",
    tag = "Views",
    responses(
        (status = 200, description = "Estado atual da visão", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn get_view(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;
    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// DELETE /api/views/companies/{id}
#[utoipa::path(
    delete,
    path = "/api/views/companies/{id}",
    tag = "Views",
    responses(
        (status = 204, description = "Visão encerrada"),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn close_view(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .views
        .remove(id, &token)
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/views/companies/{id}/refresh
#[utoipa::path(
    post,
    path = "/api/views/companies/{id}/refresh",
    tag = "Views",
    responses(
        (status = 200, description = "Página recarregada", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn refresh_view(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;
    view.refresh().await;
    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// =============================================================================
//  INTERAÇÕES DA LISTAGEM
// =============================================================================

// PUT /api/views/companies/{id}/filter
#[utoipa::path(
    put,
    path = "/api/views/companies/{id}/filter",
    tag = "Views",
    request_body = SetFilterPayload,
    responses(
        (status = 200, description = "Filtro aplicado (volta para a página 1)", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn set_filter(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetFilterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;
    let filter = payload
        .filter
        .parse::<CompanyFilter>()
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    view.set_filter(filter).await;

    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// PUT /api/views/companies/{id}/search
#[utoipa::path(
    put,
    path = "/api/views/companies/{id}/search",
    tag = "Views",
    request_body = SetSearchPayload,
    responses(
        (status = 200, description = "Busca aplicada", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn set_search(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetSearchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;
    let view = find_view(&app_state, id, &token, &locale)?;

    view.set_search_text(&payload.q).await;

    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// GET /api/views/companies/{id}/search?known=...
#[utoipa::path(
    get,
    path = "/api/views/companies/{id}/search",
    tag = "Views",
    responses(
        (status = 200, description = "Texto da busca (espera mudar em relação a `known`)", body = SearchState),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão"),
        WatchSearchParams
    ),
    security(("api_token" = []))
)]
pub async fn watch_search(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Query(params): Query<WatchSearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let reader = find_view(&app_state, id, &token, &locale)?.subscribe_search();
    Ok((StatusCode::OK, Json(read_search(reader, params.known).await)))
}

pub(crate) async fn read_search(mut reader: SearchReader, known: Option<String>) -> SearchState {
    let q = match known {
        Some(known) => reader.next_after(&known, SEARCH_WAIT).await,
        None => reader.current(),
    };
    SearchState { q }
}

// PUT /api/views/companies/{id}/order
#[utoipa::path(
    put,
    path = "/api/views/companies/{id}/order",
    tag = "Views",
    request_body = SetOrderPayload,
    responses(
        (status = 200, description = "Ordenação alternada", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn set_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;
    let field = payload
        .field
        .parse::<SortField>()
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    view.set_order_by(field).await;

    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// PUT /api/views/companies/{id}/page
// Página fora do intervalo não é erro: a visão só não muda.
#[utoipa::path(
    put,
    path = "/api/views/companies/{id}/page",
    tag = "Views",
    request_body = SetPagePayload,
    responses(
        (status = 200, description = "Página alterada (ou inalterada se fora do intervalo)", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn set_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;
    view.set_page(payload.page).await;
    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// PUT /api/views/companies/{id}/per-page
#[utoipa::path(
    put,
    path = "/api/views/companies/{id}/per-page",
    tag = "Views",
    request_body = SetPerPagePayload,
    responses(
        (status = 200, description = "Itens por página alterados", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn set_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPerPagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;

    view.set_per_page(payload.per_page)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// =============================================================================
//  DIÁLOGOS
// =============================================================================

// PUT /api/views/companies/{id}/dialog
#[utoipa::path(
    put,
    path = "/api/views/companies/{id}/dialog",
    tag = "Views",
    request_body = OpenDialogPayload,
    responses(
        (status = 200, description = "Diálogo aberto", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn open_dialog(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
    Json(payload): Json<OpenDialogPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;

    view.open_dialog(payload.kind, payload.company_id)
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}

// DELETE /api/views/companies/{id}/dialog
#[utoipa::path(
    delete,
    path = "/api/views/companies/{id}/dialog",
    tag = "Views",
    responses(
        (status = 200, description = "Diálogo fechado", body = ViewSnapshot),
        (status = 404, description = "Visão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da visão")
    ),
    security(("api_token" = []))
)]
pub async fn close_dialog(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&app_state, id, &token, &locale)?;
    view.close_dialog();
    Ok((StatusCode::OK, Json(view.snapshot(locale.0))))
}
