// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AccessToken, i18n::Locale},
    models::settings::{TrialLimitSettings, UpdateTrialLimitPayload},
};

// GET /api/settings/trial-limit
// Se a API de configuração falhar, devolve `null` em vez de erro.
#[utoipa::path(
    get,
    path = "/api/settings/trial-limit",
    tag = "Settings",
    responses(
        (status = 200, description = "Limite atual (null se indisponível)", body = TrialLimitSettings)
    ),
    security(("api_token" = []))
)]
pub async fn get_trial_limit(
    State(app_state): State<AppState>,
    AccessToken(token): AccessToken,
) -> impl IntoResponse {
    let testing_period_limit_days = match app_state.app_config.trial_limit_days(&token, None).await {
        Ok(days) => Some(days),
        Err(e) => {
            tracing::warn!("Limite do período de teste indisponível: {}", e);
            None
        }
    };

    (StatusCode::OK, Json(TrialLimitSettings { testing_period_limit_days }))
}

// PUT /api/settings/trial-limit
#[utoipa::path(
    put,
    path = "/api/settings/trial-limit",
    tag = "Settings",
    request_body = UpdateTrialLimitPayload,
    responses(
        (status = 200, description = "Limite atualizado", body = TrialLimitSettings)
    ),
    security(("api_token" = []))
)]
pub async fn update_trial_limit(
    State(app_state): State<AppState>,
    locale: Locale,
    AccessToken(token): AccessToken,
    Json(payload): Json<UpdateTrialLimitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .app_config
        .update_trial_limit_days(&token, payload.testing_period_limit_days)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    tracing::info!(days = payload.testing_period_limit_days, "Limite do período de teste atualizado");

    Ok((
        StatusCode::OK,
        Json(TrialLimitSettings {
            testing_period_limit_days: Some(payload.testing_period_limit_days),
        }),
    ))
}
