// src/models/company.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Quantidades de itens por página aceitas pela listagem.
pub const PER_PAGE_OPTIONS: [u32; 5] = [6, 8, 12, 16, 20];

/// Valor inicial do seletor "Itens por página".
pub const DEFAULT_PER_PAGE: u32 = 8;

// ---
// 1. Company (A "Empresa" vinda da API administrativa)
// ---
// O registro é da API; aqui guardamos apenas uma cópia transitória.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(default)]
    pub id_machine: Option<String>,
    // CPF (11 dígitos) ou CNPJ (14 dígitos), sem máscara
    pub document: String,
    pub access_allowed: bool,
    pub test_period_active: bool,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub start_test_period_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    // Nas versões mais novas da API o servidor já manda os dias calculados
    #[serde(default)]
    pub remaining_days: Option<i64>,
    pub created_at: DateTime<Utc>,
    // Dono (usuário administrador); só existe nas revisões multi-tenant
    #[serde(default)]
    pub id_user: Option<i64>,
}

// ---
// 2. CompaniesPage (Resposta paginada de GET /companies)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompaniesPage {
    pub data: Vec<Company>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

// ---
// 3. Filtro (predicado aplicado no servidor)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompanyFilter {
    All,
    Allowed,
    TestPeriod,
    NotAllowed,
}

impl CompanyFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyFilter::All => "all",
            CompanyFilter::Allowed => "allowed",
            CompanyFilter::TestPeriod => "testPeriod",
            CompanyFilter::NotAllowed => "notAllowed",
        }
    }
}

impl FromStr for CompanyFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CompanyFilter::All),
            "allowed" => Ok(CompanyFilter::Allowed),
            "testPeriod" => Ok(CompanyFilter::TestPeriod),
            "notAllowed" => Ok(CompanyFilter::NotAllowed),
            other => Err(AppError::InvalidFilter(other.to_string())),
        }
    }
}

// ---
// 4. Ordenação
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Document,
    AccessAllowed,
    TestPeriodActive,
    StartTestPeriodAt,
    LastActivityAt,
    City,
    State,
    Phone,
    CreatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Document => "document",
            SortField::AccessAllowed => "access_allowed",
            SortField::TestPeriodActive => "test_period_active",
            SortField::StartTestPeriodAt => "start_test_period_at",
            SortField::LastActivityAt => "last_activity_at",
            SortField::City => "city",
            SortField::State => "state",
            SortField::Phone => "phone",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "name" => SortField::Name,
            "document" => SortField::Document,
            "access_allowed" => SortField::AccessAllowed,
            "test_period_active" => SortField::TestPeriodActive,
            "start_test_period_at" => SortField::StartTestPeriodAt,
            "last_activity_at" => SortField::LastActivityAt,
            "city" => SortField::City,
            "state" => SortField::State,
            "phone" => SortField::Phone,
            "created_at" => SortField::CreatedAt,
            other => return Err(AppError::InvalidSortField(other.to_string())),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderBy {
    pub field: SortField,
    pub direction: SortDirection,
}

impl OrderBy {
    /// Clique num cabeçalho: a direção sempre inverte em relação à anterior,
    /// inclusive quando a coluna muda.
    pub fn clicked(self, field: SortField) -> Self {
        OrderBy {
            field,
            direction: self.direction.flipped(),
        }
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        OrderBy {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

// ---
// 5. CompanyListRequest (Parâmetros de uma chamada a GET /companies)
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyListRequest {
    pub filter: Option<CompanyFilter>,
    pub order_by: Option<OrderBy>,
    pub page: u32,
    pub per_page: u32,
    pub q: String,
}

impl CompanyListRequest {
    /// Pares na ordem em que vão para a query string.
    /// `q` sempre vai, mesmo vazio.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);

        if let Some(filter) = self.filter {
            pairs.push(("filter", filter.as_str().to_string()));
        }
        if let Some(order_by) = self.order_by {
            pairs.push(("orderBy", order_by.field.as_str().to_string()));
            pairs.push(("direction", order_by.direction.as_str().to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("perPage", self.per_page.to_string()));
        pairs.push(("q", self.q.clone()));

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_click_always_flips_direction() {
        let initial = OrderBy::default();
        assert_eq!(initial.field, SortField::CreatedAt);
        assert_eq!(initial.direction, SortDirection::Desc);

        let first = initial.clicked(SortField::Name);
        assert_eq!(first, OrderBy { field: SortField::Name, direction: SortDirection::Asc });

        let second = first.clicked(SortField::Name);
        assert_eq!(second, OrderBy { field: SortField::Name, direction: SortDirection::Desc });

        // Trocar de coluna também inverte, não volta para "asc"
        let third = second.clicked(SortField::City);
        assert_eq!(third.direction, SortDirection::Asc);
        let fourth = third.clicked(SortField::Phone);
        assert_eq!(fourth.direction, SortDirection::Desc);
    }

    #[test]
    fn request_pairs_skip_missing_filter_but_keep_empty_q() {
        let request = CompanyListRequest {
            filter: None,
            order_by: None,
            page: 2,
            per_page: 12,
            q: String::new(),
        };

        let pairs = request.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_string()),
                ("perPage", "12".to_string()),
                ("q", String::new()),
            ]
        );
    }

    #[test]
    fn request_pairs_carry_filter_and_ordering() {
        let request = CompanyListRequest {
            filter: Some(CompanyFilter::TestPeriod),
            order_by: Some(OrderBy { field: SortField::LastActivityAt, direction: SortDirection::Asc }),
            page: 1,
            per_page: 8,
            q: "padaria".to_string(),
        };

        let pairs = request.to_query_pairs();
        assert_eq!(pairs[0], ("filter", "testPeriod".to_string()));
        assert_eq!(pairs[1], ("orderBy", "last_activity_at".to_string()));
        assert_eq!(pairs[2], ("direction", "asc".to_string()));
        assert_eq!(pairs[5], ("q", "padaria".to_string()));
    }

    #[test]
    fn filter_parsing_rejects_unknown_values() {
        assert_eq!("notAllowed".parse::<CompanyFilter>().unwrap(), CompanyFilter::NotAllowed);
        assert!(matches!(
            "blocked".parse::<CompanyFilter>(),
            Err(AppError::InvalidFilter(value)) if value == "blocked"
        ));
    }

    #[test]
    fn company_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": 7,
            "document": "12345678901",
            "access_allowed": false,
            "test_period_active": true,
            "name": "Padaria Central",
            "start_test_period_at": "2026-10-01T12:00:00Z",
            "created_at": "2026-09-30T08:15:00Z"
        }"#;

        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.id, 7);
        assert!(company.start_test_period_at.is_some());
        assert!(company.last_activity_at.is_none());
        assert!(company.remaining_days.is_none());
        assert!(company.id_user.is_none());
    }
}
