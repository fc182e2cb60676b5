use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{middleware::i18n::Locale, models::view::Language};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Documento com {0} dígitos (esperado 11 ou 14)")]
    InvalidDocumentLength(usize),

    #[error("Documento contém caracteres que não são dígitos")]
    InvalidDocumentCharacters,

    #[error("Filtro desconhecido: {0}")]
    InvalidFilter(String),

    #[error("Coluna de ordenação desconhecida: {0}")]
    InvalidSortField(String),

    #[error("Quantidade por página não permitida: {0}")]
    InvalidPerPage(u32),

    #[error("Visão de listagem não encontrada: {0}")]
    ViewNotFound(Uuid),

    #[error("Empresa {0} não está na página atual")]
    CompanyNotInPage(i64),

    #[error("Diálogo de {0} exige uma empresa")]
    DialogRequiresCompany(&'static str),

    // Falha de transporte ao falar com a API administrativa
    #[error("Erro de comunicação com a API: {0}")]
    UpstreamError(#[from] reqwest::Error),

    #[error("API respondeu com status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("API recusou a alteração: {0}")]
    UpstreamRejected(String),

    #[error("Valor de configuração inválido: {0}")]
    InvalidConfigValue(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro já pronto para a resposta HTTP (status + mensagem no idioma do cliente)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDocumentLength(_)
            | AppError::InvalidDocumentCharacters
            | AppError::InvalidFilter(_)
            | AppError::InvalidSortField(_)
            | AppError::InvalidPerPage(_)
            | AppError::DialogRequiresCompany(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ViewNotFound(_) | AppError::CompanyNotInPage(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamError(_)
            | AppError::UpstreamStatus { .. }
            | AppError::UpstreamRejected(_)
            | AppError::InvalidConfigValue(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte para a resposta HTTP com a mensagem no idioma do `Accept-Language`.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = self {
            let mut details = serde_json::Map::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), json!(messages));
            }
            let message = match locale.0 {
                Language::Pt => "Um ou mais campos são inválidos.",
                Language::En => "One or more fields are invalid.",
            };
            return ApiError {
                status,
                message: message.to_string(),
                details: Some(Value::Object(details)),
            };
        }

        if status.is_server_error() {
            tracing::error!("Erro ao atender requisição: {}", self);
        }

        let message = match (locale.0, self) {
            (Language::Pt, AppError::InvalidToken) => "Token de autenticação inválido ou ausente.".to_string(),
            (Language::En, AppError::InvalidToken) => "Missing or invalid authentication token.".to_string(),
            (Language::En, AppError::InvalidDocumentLength(len)) => {
                format!("Document has {len} digits (expected 11 or 14).")
            }
            (Language::En, AppError::InvalidDocumentCharacters) => "Document must contain only digits.".to_string(),
            (Language::En, AppError::InvalidFilter(v)) => format!("Unknown filter: {v}"),
            (Language::En, AppError::InvalidSortField(v)) => format!("Unknown sort column: {v}"),
            (Language::En, AppError::InvalidPerPage(v)) => format!("Page size not allowed: {v}"),
            (Language::En, AppError::ViewNotFound(id)) => format!("List view not found: {id}"),
            (Language::En, AppError::CompanyNotInPage(id)) => format!("Company {id} is not on the current page"),
            (Language::En, AppError::DialogRequiresCompany(kind)) => format!("The {kind} dialog requires a company"),
            (Language::Pt, AppError::UpstreamRejected(_)) | (Language::En, AppError::UpstreamRejected(_)) => {
                self.to_string()
            }
            (Language::Pt, e) if e.status_code() == StatusCode::BAD_GATEWAY => {
                "Não foi possível falar com a API administrativa.".to_string()
            }
            (Language::En, e) if e.status_code() == StatusCode::BAD_GATEWAY => {
                "Could not reach the administrative API.".to_string()
            }
            (Language::Pt, AppError::InternalServerError(_)) => "Ocorreu um erro inesperado.".to_string(),
            (Language::En, AppError::InternalServerError(_)) => "An unexpected error occurred.".to_string(),
            (_, e) => e.to_string(),
        };

        ApiError {
            status,
            message,
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
