// src/handlers/users.rs

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::views::{
        read_search, CreateViewPayload, SetPagePayload, SetPerPagePayload, SetSearchPayload,
        WatchSearchParams,
    },
    middleware::{auth::AccessToken, i18n::Locale},
    models::{
        user::OwnerOption,
        view::{SearchState, UserViewSnapshot},
    },
    services::{ListView, UserListView},
};

fn find_view(
    app_state: &AppState,
    id: Uuid,
    token: &str,
    locale: &Locale,
) -> Result<Arc<UserListView>, ApiError> {
    app_state
        .user_views
        .get(id, token)
        .map_err(|app_err| app_err.to_api_error(locale))
}

// POST /api/views/users
#[utoipa::path(
    post,
    path = "/api/views/users",
    tag = "Users",
    request_body = CreateViewPayload,
    responses(
        (status = 201, description = "Visão de usuários criada e carregada", body = UserViewSnapshot)
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

    let view = Arc::new(UserListView::new(
        Uuid::new_v4(),
        token,
        &payload.query,
        app_state.users.clone(),
    ));
    app_state.user_views.insert(view.clone());
    tracing::info!(view = %view.id(), query = %payload.query, "Visão de usuários criada");

    view.mount().await;

    Ok((StatusCode::CREATED, Json(view.snapshot(locale.0))))
}

// GET /api/views/users/{id}
#[utoipa::path(
    get,
    path = "/api/views/users/{id}",
    tag = "Users",
    responses(
        (status = 200, description = "Estado atual da visão", body = UserViewSnapshot),
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

// DELETE /api/views/users/{id}
#[utoipa::path(
    delete,
    path = "/api/views/users/{id}",
    tag = "Users",
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
        .user_views
        .remove(id, &token)
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/views/users/{id}/refresh
#[utoipa::path(
    post,
    path = "/api/views/users/{id}/refresh",
    tag = "Users",
    responses(
        (status = 200, description = "Página recarregada", body = UserViewSnapshot),
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

// PUT /api/views/users/{id}/search
#[utoipa::path(
    put,
    path = "/api/views/users/{id}/search",
    tag = "Users",
    request_body = SetSearchPayload,
    responses(
        (status = 200, description = "Busca aplicada", body = UserViewSnapshot),
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

// GET /api/views/users/{id}/search?known=...
#[utoipa::path(
    get,
    path = "/api/views/users/{id}/search",
    tag = "Users",
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

// PUT /api/views/users/{id}/page
// Página fora do intervalo não é erro: a visão só não muda.
#[utoipa::path(
    put,
    path = "/api/views/users/{id}/page",
    tag = "Users",
    request_body = SetPagePayload,
    responses(
        (status = 200, description = "Página alterada (ou inalterada se fora do intervalo)", body = UserViewSnapshot),
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

// PUT /api/views/users/{id}/per-page
#[utoipa::path(
    put,
    path = "/api/views/users/{id}/per-page",
    tag = "Users",
    request_body = SetPerPagePayload,
    responses(
        (status = 200, description = "Itens por página alterados", body = UserViewSnapshot),
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

// GET /api/users/owners
// Lista de donos para o seletor do admin. Se a API recusar (não admin) ou
// falhar, a lista vem vazia.
#[utoipa::path(
    get,
    path = "/api/users/owners",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários que podem ser donos de empresa", body = [OwnerOption])
    ),
    security(("api_token" = []))
)]
pub async fn list_owners(
    State(app_state): State<AppState>,
    AccessToken(token): AccessToken,
) -> impl IntoResponse {
    let owners: Vec<OwnerOption> = match app_state.users.all_users(&token).await {
        Ok(users) => users.into_iter().map(OwnerOption::from).collect(),
        Err(e) => {
            tracing::warn!("Lista de donos indisponível: {}", e);
            Vec::new()
        }
    };

    (StatusCode::OK, Json(owners))
}
