// src/clients/admin_api.rs

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    clients::{AppConfigSource, CompanyDirectory, UserDirectory},
    common::error::AppError,
    models::{
        company::{CompaniesPage, CompanyListRequest},
        settings::{AppConfigUpdate, AppConfigUpdateResponse, TRIAL_LIMIT_KEY},
        user::{User, UserListRequest, UsersPage},
    },
};

/// Cliente da API administrativa (empresas e app-config).
/// O token de quem está usando o painel é repassado em cada chamada.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
}

impl HttpAdminApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check_status(res: Response) -> Result<Response, AppError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        error!("API administrativa falhou. Status: {}, Body: {}", status, body);
        Err(AppError::UpstreamStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl CompanyDirectory for HttpAdminApi {
    async fn list_companies(
        &self,
        token: &str,
        request: &CompanyListRequest,
    ) -> Result<CompaniesPage, AppError> {
        let pairs = request.to_query_pairs();
        debug!(?pairs, "GET /companies");

        let res = self
            .client
            .get(self.endpoint("companies"))
            .bearer_auth(token)
            .query(&pairs)
            .send()
            .await?;

        let page = Self::check_status(res).await?.json::<CompaniesPage>().await?;
        Ok(page)
    }
}

#[async_trait]
impl UserDirectory for HttpAdminApi {
    async fn list_users(&self, token: &str, request: &UserListRequest) -> Result<UsersPage, AppError> {
        let pairs = request.to_query_pairs();
        debug!(?pairs, "GET /users");

        let res = self
            .client
            .get(self.endpoint("users"))
            .bearer_auth(token)
            .query(&pairs)
            .send()
            .await?;

        let page = Self::check_status(res).await?.json::<UsersPage>().await?;
        Ok(page)
    }

    async fn all_users(&self, token: &str) -> Result<Vec<User>, AppError> {
        let res = self
            .client
            .get(self.endpoint("users"))
            .bearer_auth(token)
            .query(&[("returnAll", "true")])
            .send()
            .await?;

        let users = Self::check_status(res).await?.json::<Vec<User>>().await?;
        Ok(users)
    }
}

#[async_trait]
impl AppConfigSource for HttpAdminApi {
    async fn trial_limit_days(&self, token: &str, owner: Option<i64>) -> Result<u32, AppError> {
        let path = match owner {
            Some(user_id) => format!("app-config/{TRIAL_LIMIT_KEY}/{user_id}"),
            None => format!("app-config/{TRIAL_LIMIT_KEY}"),
        };

        let res = self
            .client
            .get(self.endpoint(&path))
            .bearer_auth(token)
            .send()
            .await?;

        let text = Self::check_status(res).await?.text().await?;
        parse_config_days(&text)
    }

    async fn update_trial_limit_days(&self, token: &str, days: u32) -> Result<(), AppError> {
        let body = AppConfigUpdate {
            key: TRIAL_LIMIT_KEY,
            testing_period_limit_days: days,
        };

        let res = self
            .client
            .post(self.endpoint("app-config"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let response = Self::check_status(res)
            .await?
            .json::<AppConfigUpdateResponse>()
            .await?;

        if !response.success {
            let message = response
                .message
                .map(|m| describe_field_errors(&m))
                .unwrap_or_default();
            return Err(AppError::UpstreamRejected(message));
        }

        Ok(())
    }
}

/// O endpoint devolve um valor "solto": `15`, `"15"` ou `15` como texto puro.
pub fn parse_config_days(raw: &str) -> Result<u32, AppError> {
    let raw = raw.trim();
    let invalid = || AppError::InvalidConfigValue(raw.to_string());

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid),
        Ok(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid()),
        Ok(_) => Err(invalid()),
        Err(_) => raw.parse::<u32>().map_err(|_| invalid()),
    }
}

// { "campo": ["erro 1", "erro 2"] } -> "CAMPO: erro 1, erro 2"
fn describe_field_errors(message: &Value) -> String {
    match message {
        Value::Object(fields) => fields
            .iter()
            .map(|(field, errors)| {
                let joined = match errors {
                    Value::Array(items) => items
                        .iter()
                        .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string()),
                };
                format!("{}: {}", field.to_uppercase(), joined)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
