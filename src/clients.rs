// src/clients.rs
//
// Portas para os colaboradores externos (API administrativa). As visões só
// conhecem estes traits; a implementação HTTP fica em `admin_api`.

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        company::{CompaniesPage, CompanyListRequest},
        user::{User, UserListRequest, UsersPage},
    },
};

pub mod admin_api;
pub use admin_api::HttpAdminApi;

#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// GET /companies?filter&orderBy&direction&page&perPage&q
    async fn list_companies(
        &self,
        token: &str,
        request: &CompanyListRequest,
    ) -> Result<CompaniesPage, AppError>;
}

#[async_trait]
pub trait AppConfigSource: Send + Sync {
    /// GET /app-config/testing_period_limit_days[/{owner}]
    async fn trial_limit_days(&self, token: &str, owner: Option<i64>) -> Result<u32, AppError>;

    /// POST /app-config
    async fn update_trial_limit_days(&self, token: &str, days: u32) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// GET /users?page&perPage&q
    async fn list_users(&self, token: &str, request: &UserListRequest) -> Result<UsersPage, AppError>;

    /// GET /users?returnAll=true (a API só responde para administradores)
    async fn all_users(&self, token: &str) -> Result<Vec<User>, AppError>;
}
