// src/models/view.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::company::{CompanyFilter, OrderBy};

// Idiomas suportados nos rótulos e mensagens de erro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    /// "pt-BR" -> Pt, "en-US" -> En. Qualquer outro idioma cai no padrão.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.split('-').next().unwrap_or(tag).to_ascii_lowercase();
        match primary.as_str() {
            "en" => Language::En,
            _ => Language::Pt,
        }
    }

    pub fn access_label(&self, allowed: bool) -> &'static str {
        match (self, allowed) {
            (Language::Pt, true) => "Ativo",
            (Language::Pt, false) => "Inativo",
            (Language::En, true) => "Active",
            (Language::En, false) => "Inactive",
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        match (self, value) {
            (Language::Pt, true) => "Sim",
            (Language::Pt, false) => "Não",
            (Language::En, true) => "Yes",
            (Language::En, false) => "No",
        }
    }

    pub fn not_available(&self) -> &'static str {
        "N/A"
    }

    /// Formato das datas curtas nas tabelas.
    pub fn date_format(&self) -> &'static str {
        match self {
            Language::Pt => "%d/%m/%Y",
            Language::En => "%m/%d/%Y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Adding,
    Editing,
    Deleting,
    Viewing,
}

// ---
// Diálogo ativo: no máximo um aberto por vez
// ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "company", rename_all = "lowercase")]
pub enum ActiveDialog {
    None,
    Adding,
    Editing(CompanyDetails),
    Deleting(CompanyDetails),
    Viewing(CompanyDetails),
}

// Uma linha da tabela de empresas, já com os campos derivados
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub document: String,
    pub access_allowed: bool,
    pub status_label: String,
    pub test_period_active: bool,
    pub test_period_label: String,
    pub remaining_days: Option<u32>,
    pub remaining_days_label: String,
    pub inactive_days: Option<u64>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub id_user: Option<i64>,
}

// A "gaveta" de detalhes de uma empresa
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub id: i64,
    pub id_machine: Option<String>,
    pub name: String,
    pub document: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub complement: Option<String>,
    pub phone: Option<String>,
    pub neighborhood: Option<String>,
    pub inactive_days: Option<u64>,
    pub access_allowed: bool,
    pub test_period_active: bool,
    pub remaining_days: Option<u32>,
    pub start_test_period_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub id_user: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    pub filter: Option<CompanyFilter>,
    pub q: String,
    pub order_by: OrderBy,
    pub page: u32,
    pub per_page: u32,
}

// O que o renderizador recebe depois de cada interação
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub view_id: Uuid,
    pub status: ListStatus,
    pub loading: bool,
    pub query: QueryState,
    pub url_query: String,
    pub rows: Vec<CompanyRow>,
    pub total: Option<u64>,
    pub last_page: Option<u32>,
    pub dialog: ActiveDialog,
}

// ---
// Listagem de usuários
// ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Datas já formatadas no idioma do cliente ("DD/MM/YYYY" em pt)
    pub created_label: String,
    pub updated_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserQueryState {
    pub q: String,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserViewSnapshot {
    pub view_id: Uuid,
    pub status: ListStatus,
    pub loading: bool,
    pub query: UserQueryState,
    pub url_query: String,
    pub rows: Vec<UserRow>,
    pub total: Option<u64>,
    pub last_page: Option<u32>,
}

// Texto da busca visto pela caixa do cabeçalho
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SearchState {
    pub q: String,
}
