// src/models/settings.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Chave da configuração na API administrativa.
pub const TRIAL_LIMIT_KEY: &str = "testing_period_limit_days";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrialLimitSettings {
    // None quando a API de configuração não respondeu
    pub testing_period_limit_days: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrialLimitPayload {
    #[validate(range(min = 1, message = "O período de teste deve ser de no mínimo 1 dia"))]
    pub testing_period_limit_days: u32,
}

// Corpo enviado para POST /app-config
#[derive(Debug, Serialize)]
pub struct AppConfigUpdate<'a> {
    pub key: &'a str,
    pub testing_period_limit_days: u32,
}

// Resposta de POST /app-config: `message` traz os erros por campo
#[derive(Debug, Deserialize)]
pub struct AppConfigUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}
