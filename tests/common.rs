use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use painel_admin::{
    clients::{AppConfigSource, CompanyDirectory, UserDirectory},
    common::{clock::ManualClock, error::AppError},
    create_router,
    models::{
        company::{CompaniesPage, Company, CompanyListRequest},
        user::{User, UserListRequest, UsersPage},
    },
    services::{ListViewOptions, RegistryLimits},
    AppState, Sources,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TOKEN: &str = "token-admin";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

pub fn company(id: i64, document: &str) -> Company {
    Company {
        id,
        id_machine: Some(format!("MAQ-{id}")),
        document: document.to_string(),
        access_allowed: id % 2 == 0,
        test_period_active: id % 2 == 1,
        name: format!("Empresa {id}"),
        address: Some("Rua das Flores, 123".into()),
        complement: None,
        neighborhood: Some("Centro".into()),
        city: Some("Curitiba".into()),
        state: Some("PR".into()),
        phone: Some("41999998888".into()),
        start_test_period_at: Some(now() - Duration::days(3)),
        last_activity_at: Some(now() - Duration::hours(50)),
        remaining_days: None,
        created_at: now() - Duration::days(60),
        id_user: Some(1),
    }
}

// Diretório falso: devolve uma página por requisição e guarda o que recebeu
pub struct MockDirectory {
    pub requests: Mutex<Vec<CompanyListRequest>>,
    pub fail: AtomicBool,
    pub last_page: u32,
}

impl MockDirectory {
    pub fn new(last_page: u32) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            last_page,
        }
    }

    #[allow(dead_code)]
    pub fn last_request(&self) -> CompanyListRequest {
        self.requests.lock().unwrap().last().cloned().expect("nenhuma requisição")
    }

    #[allow(dead_code)]
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompanyDirectory for MockDirectory {
    async fn list_companies(
        &self,
        _token: &str,
        request: &CompanyListRequest,
    ) -> Result<CompaniesPage, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamStatus { status: 500, body: "erro".into() });
        }
        let base = i64::from(request.page) * 100;
        Ok(CompaniesPage {
            data: vec![company(base + 1, "12345678901"), company(base + 2, "12345678901234")],
            total: 40,
            per_page: request.per_page,
            current_page: request.page,
            last_page: self.last_page,
        })
    }
}

pub struct MockConfig {
    pub days: Mutex<Option<u32>>,
    pub updates: Mutex<Vec<u32>>,
    pub per_owner: HashMap<i64, u32>,
}

impl MockConfig {
    pub fn new(days: Option<u32>) -> Self {
        Self {
            days: Mutex::new(days),
            updates: Mutex::new(Vec::new()),
            per_owner: HashMap::new(),
        }
    }
}

#[async_trait]
impl AppConfigSource for MockConfig {
    async fn trial_limit_days(&self, _token: &str, owner: Option<i64>) -> Result<u32, AppError> {
        let value = match owner {
            Some(id) => self.per_owner.get(&id).copied(),
            None => *self.days.lock().unwrap(),
        };
        value.ok_or(AppError::UpstreamStatus { status: 503, body: String::new() })
    }

    async fn update_trial_limit_days(&self, _token: &str, days: u32) -> Result<(), AppError> {
        self.updates.lock().unwrap().push(days);
        *self.days.lock().unwrap() = Some(days);
        Ok(())
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        name: format!("Usuário {id}"),
        email: format!("usuario{id}@exemplo.com"),
        created_at: now() - Duration::days(40),
        updated_at: now() - Duration::days(2),
    }
}

// Usuários falsos: `GET /users` paginado e a lista completa dos donos
pub struct MockUsers {
    pub requests: Mutex<Vec<UserListRequest>>,
    pub fail: AtomicBool,
    pub last_page: u32,
}

#[allow(dead_code)]
impl MockUsers {
    pub fn new(last_page: u32) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            last_page,
        }
    }

    pub fn last_request(&self) -> UserListRequest {
        self.requests.lock().unwrap().last().cloned().expect("nenhuma requisição")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl UserDirectory for MockUsers {
    async fn list_users(&self, _token: &str, request: &UserListRequest) -> Result<UsersPage, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamStatus { status: 500, body: "erro".into() });
        }
        let base = i64::from(request.page) * 100;
        Ok(UsersPage {
            data: vec![user(base + 1), user(base + 2)],
            total: 25,
            per_page: request.per_page,
            current_page: request.page,
            last_page: self.last_page,
        })
    }

    async fn all_users(&self, _token: &str) -> Result<Vec<User>, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamStatus { status: 403, body: "forbidden".into() });
        }
        Ok(vec![user(1), user(2), user(3)])
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub directory: Arc<MockDirectory>,
    pub users: Arc<MockUsers>,
    pub config: Arc<MockConfig>,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self::with(MockDirectory::new(5), MockConfig::new(Some(15)), ListViewOptions::default())
    }

    pub fn with(directory: MockDirectory, config: MockConfig, options: ListViewOptions) -> Self {
        Self::with_limits(directory, config, options, RegistryLimits::default())
    }

    pub fn with_limits(
        directory: MockDirectory,
        config: MockConfig,
        options: ListViewOptions,
        limits: RegistryLimits,
    ) -> Self {
        let directory = Arc::new(directory);
        let users = Arc::new(MockUsers::new(3));
        let config = Arc::new(config);
        let clock = Arc::new(ManualClock::new(now()));
        let sources = Sources {
            directory: directory.clone(),
            users: users.clone(),
            app_config: config.clone(),
            clock: clock.clone(),
        };
        let state = AppState::with_sources(sources, options, limits);

        Self {
            router: create_router(state.clone()),
            state,
            directory,
            users,
            config,
            clock,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (u16, Value) {
        self.send_as(method, uri, body, Some(TOKEN), None).await
    }

    pub async fn send_as(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        language: Option<&str>,
    ) -> (u16, Value) {
        call(self.router.clone(), method, uri, body, token, language).await
    }

    /// Cria uma visão e devolve (id, snapshot).
    pub async fn create_view(&self, query: &str) -> (String, Value) {
        self.create_view_at("/api/views/companies", query).await
    }

    pub async fn create_user_view(&self, query: &str) -> (String, Value) {
        self.create_view_at("/api/views/users", query).await
    }

    async fn create_view_at(&self, base: &str, query: &str) -> (String, Value) {
        let (status, body) = self.send("POST", base, Some(serde_json::json!({ "query": query }))).await;
        assert_eq!(status, 201, "corpo: {body}");
        let id = body["viewId"].as_str().unwrap().to_string();
        (id, body)
    }
}

/// Uma requisição ao router. Livre de `&self` para poder ir num `tokio::spawn`.
#[allow(dead_code)]
pub async fn call(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
    language: Option<&str>,
) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(language) = language {
        builder = builder.header(header::ACCEPT_LANGUAGE, language);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}
