// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// 1. User (Como vem de GET /users)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersPage {
    pub data: Vec<User>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

// ---
// 2. UserListRequest (Parâmetros de GET /users)
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct UserListRequest {
    pub page: u32,
    pub per_page: u32,
    pub q: String,
}

impl UserListRequest {
    /// `q` sempre vai, mesmo vazio.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("perPage", self.per_page.to_string()),
            ("q", self.q.clone()),
        ]
    }
}

// ---
// 3. Possíveis donos de empresa (GET /users?returnAll=true, só admin)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOption {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for OwnerOption {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
