// src/config.rs

use std::{env, sync::Arc, time::Duration as StdDuration};

use anyhow::Context;
use chrono::Duration;
use tokio::task::JoinHandle;

use crate::{
    clients::{AppConfigSource, CompanyDirectory, HttpAdminApi, UserDirectory},
    common::clock::{Clock, SystemClock},
    services::{
        CompanyListView, ListViewDeps, ListViewOptions, RegistryLimits, SearchClearPolicy,
        TrialLimitScope, UserListView, ViewRegistry,
    },
};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub admin_api_url: String,
    pub view_options: ListViewOptions,
    pub registry_limits: RegistryLimits,
}

impl Config {
    /// Lê a configuração do ambiente (o `.env` já deve ter sido carregado).
    pub fn from_env() -> anyhow::Result<Self> {
        let admin_api_url = env::var("ADMIN_API_URL").context("ADMIN_API_URL deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let trial_limit_scope = match env::var("TRIAL_LIMIT_SCOPE").ok().as_deref() {
            None | Some("") | Some("global") => TrialLimitScope::Global,
            Some("owner") => TrialLimitScope::Owner,
            Some(other) => anyhow::bail!("TRIAL_LIMIT_SCOPE inválido: {other} (use global ou owner)"),
        };

        let search_clear_policy = match env::var("SEARCH_CLEAR_POLICY").ok().as_deref() {
            None | Some("") | Some("refetch") => SearchClearPolicy::Refetch,
            Some("skip") => SearchClearPolicy::Skip,
            Some(other) => anyhow::bail!("SEARCH_CLEAR_POLICY inválido: {other} (use refetch ou skip)"),
        };

        let defaults = RegistryLimits::default();
        let idle_minutes = positive_var("VIEW_IDLE_MINUTES")?;
        let max_views = positive_var("MAX_OPEN_VIEWS")?;

        Ok(Self {
            bind_addr,
            admin_api_url,
            view_options: ListViewOptions {
                trial_limit_scope,
                search_clear_policy,
            },
            registry_limits: RegistryLimits {
                idle_timeout: idle_minutes
                    .map(|m| Duration::minutes(m as i64))
                    .unwrap_or(defaults.idle_timeout),
                max_views: max_views.map(|n| n as usize).unwrap_or(defaults.max_views),
            },
        })
    }
}

// Inteiro positivo opcional vindo do ambiente
fn positive_var(name: &str) -> anyhow::Result<Option<u32>> {
    match env::var(name).ok().filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => anyhow::bail!("{name} inválido: {raw} (use um inteiro maior que zero)"),
        },
    }
}

/// Os colaboradores externos do estado.
pub struct Sources {
    pub directory: Arc<dyn CompanyDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub app_config: Arc<dyn AppConfigSource>,
    pub clock: Arc<dyn Clock>,
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn CompanyDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub app_config: Arc<dyn AppConfigSource>,
    pub clock: Arc<dyn Clock>,
    pub views: ViewRegistry<CompanyListView>,
    pub user_views: ViewRegistry<UserListView>,
    pub view_options: ListViewOptions,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Falha ao criar o cliente HTTP")?;

        // --- Monta o gráfico de dependências ---
        let admin_api = Arc::new(HttpAdminApi::new(client, &config.admin_api_url));
        tracing::info!("✅ API administrativa em {}", config.admin_api_url);

        let sources = Sources {
            directory: admin_api.clone(),
            users: admin_api.clone(),
            app_config: admin_api,
            clock: Arc::new(SystemClock),
        };
        Ok(Self::with_sources(sources, config.view_options, config.registry_limits))
    }

    /// Monta o estado com colaboradores já prontos (útil em testes).
    pub fn with_sources(sources: Sources, view_options: ListViewOptions, limits: RegistryLimits) -> Self {
        Self {
            views: ViewRegistry::new(sources.clock.clone(), limits),
            user_views: ViewRegistry::new(sources.clock.clone(), limits),
            directory: sources.directory,
            users: sources.users,
            app_config: sources.app_config,
            clock: sources.clock,
            view_options,
        }
    }

    pub fn view_deps(&self) -> ListViewDeps {
        ListViewDeps {
            directory: self.directory.clone(),
            app_config: self.app_config.clone(),
            clock: self.clock.clone(),
        }
    }

    /// Varre as visões ociosas a cada `every`.
    pub fn spawn_view_sweeper(&self, every: StdDuration) -> JoinHandle<()> {
        let views = self.views.clone();
        let user_views = self.user_views.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                views.evict_idle();
                user_views.evict_idle();
            }
        })
    }
}
