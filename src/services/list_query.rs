// src/services/list_query.rs
//
// Estado da listagem (filtro, ordenação, paginação) e o espelho dele na
// query string da URL, para que a visão possa ser compartilhada.

use url::form_urlencoded;

use crate::models::company::{
    CompanyFilter, CompanyListRequest, OrderBy, DEFAULT_PER_PAGE, PER_PAGE_OPTIONS,
};
use crate::common::error::AppError;

// ---
// 1. UrlParams (Os parâmetros da barra de endereço)
// ---
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pairs: Vec<(String, String)>,
}

impl UrlParams {
    /// Aceita a query com ou sem o '?' inicial.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Substitui o valor (mantendo a posição da primeira ocorrência) ou acrescenta no fim.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.pairs[idx].1 = value;
                let mut seen = false;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

// ---
// 2. ListQuery (Estado local da listagem)
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<CompanyFilter>,
    pub order_by: OrderBy,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: None,
            order_by: OrderBy::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListQuery {
    /// Reconstrói o estado a partir da URL. Só `filter` e `page` são lidos;
    /// ordenação e tamanho de página não ficam na URL.
    /// Valores inválidos caem no padrão.
    pub fn from_url(params: &UrlParams) -> Self {
        let mut query = ListQuery::default();

        if let Some(raw) = params.get("filter").filter(|v| !v.is_empty()) {
            match raw.parse::<CompanyFilter>() {
                Ok(filter) => query.filter = Some(filter),
                Err(e) => tracing::warn!("Ignorando filtro da URL: {}", e),
            }
        }

        query.page = page_from_url(params);
        query
    }

    pub fn to_request(&self, q: &str) -> CompanyListRequest {
        CompanyListRequest {
            filter: self.filter,
            order_by: Some(self.order_by),
            page: self.page,
            per_page: self.per_page,
            q: q.to_string(),
        }
    }
}

/// `page` da URL; ausente ou inválida vira 1.
pub fn page_from_url(params: &UrlParams) -> u32 {
    match params.get("page").map(|raw| (raw, raw.parse::<u32>())) {
        None => 1,
        Some((_, Ok(page))) if page >= 1 => page,
        Some((raw, _)) => {
            tracing::warn!(page = raw, "Página inválida na URL, usando 1");
            1
        }
    }
}

pub fn ensure_per_page(per_page: u32) -> Result<u32, AppError> {
    if PER_PAGE_OPTIONS.contains(&per_page) {
        Ok(per_page)
    } else {
        Err(AppError::InvalidPerPage(per_page))
    }
}
