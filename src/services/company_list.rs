// src/services/company_list.rs
//
// A visão da listagem de empresas: guarda filtro/busca/ordenação/paginação,
// espelha tudo na query string e busca a página na API a cada mudança.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    clients::{AppConfigSource, CompanyDirectory},
    common::{clock::Clock, error::AppError},
    models::{
        company::{CompaniesPage, Company, CompanyFilter, CompanyListRequest, SortField},
        view::{ActiveDialog, DialogKind, Language, ListStatus, QueryState, ViewSnapshot},
    },
    services::{
        list_query::{ensure_per_page, ListQuery, UrlParams},
        presentation::{company_details, company_row},
        search_store::{SearchReader, SearchStore},
        view_registry::ListView,
    },
};

/// De onde vem o limite de dias de teste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialLimitScope {
    /// Um valor só, GET /app-config/testing_period_limit_days
    #[default]
    Global,
    /// Um valor por dono, GET /app-config/testing_period_limit_days/{idUser}
    Owner,
}

/// O que fazer quando a busca é apagada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchClearPolicy {
    #[default]
    Refetch,
    /// Só limpa o `q` da URL, sem buscar de novo
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListViewOptions {
    pub trial_limit_scope: TrialLimitScope,
    pub search_clear_policy: SearchClearPolicy,
}

// Os colaboradores externos de uma visão
#[derive(Clone)]
pub struct ListViewDeps {
    pub directory: Arc<dyn CompanyDirectory>,
    pub app_config: Arc<dyn AppConfigSource>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
enum TrialLimits {
    Global(Option<u32>),
    PerOwner(HashMap<Option<i64>, Option<u32>>),
}

impl TrialLimits {
    fn for_owner(&self, owner: Option<i64>) -> Option<u32> {
        match self {
            TrialLimits::Global(limit) => *limit,
            TrialLimits::PerOwner(limits) => limits.get(&owner).copied().flatten(),
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedPage {
    companies: Vec<Company>,
    total: u64,
    last_page: u32,
    limits: TrialLimits,
}

#[derive(Debug, Clone)]
enum OpenDialog {
    None,
    Adding,
    Editing(Company),
    Deleting(Company),
    Viewing(Company),
}

#[derive(Debug)]
struct ListState {
    query: ListQuery,
    url: UrlParams,
    status: ListStatus,
    // Cada busca recebe um número; só a resposta da mais recente é aplicada
    generation: u64,
    page: Option<LoadedPage>,
    dialog: OpenDialog,
    closed: bool,
}

pub struct CompanyListView {
    id: Uuid,
    token: String,
    deps: ListViewDeps,
    options: ListViewOptions,
    search: SearchStore,
    state: Mutex<ListState>,
}

impl CompanyListView {
    /// Cria a visão a partir da query string da URL (estado `Idle`).
    /// A primeira busca acontece em [`CompanyListView::mount`].
    pub fn new(
        id: Uuid,
        token: impl Into<String>,
        url_query: &str,
        deps: ListViewDeps,
        options: ListViewOptions,
    ) -> Self {
        let url = UrlParams::parse(url_query);
        let query = ListQuery::from_url(&url);
        let search = SearchStore::new(url.get("q").unwrap_or_default());

        Self {
            id,
            token: token.into(),
            deps,
            options,
            search,
            state: Mutex::new(ListState {
                query,
                url,
                status: ListStatus::Idle,
                generation: 0,
                page: None,
                dialog: OpenDialog::None,
                closed: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn mount(&self) {
        self.fetch_page().await;
    }

    pub async fn refresh(&self) {
        self.fetch_page().await;
    }

    /// Troca o filtro e volta para a página 1.
    pub async fn set_filter(&self, filter: CompanyFilter) {
        {
            let mut state = self.lock();
            state.query.filter = Some(filter);
            state.query.page = 1;
            state.url.set("filter", filter.as_str());
            state.url.set("page", "1");
        }
        self.fetch_page().await;
    }

    pub async fn set_search_text(&self, q: &str) {
        self.search.set(q);

        let skip_fetch = {
            let mut state = self.lock();
            if q.is_empty() {
                state.url.remove("q");
            } else {
                if let Some(filter) = state.query.filter {
                    state.url.set("filter", filter.as_str());
                }
                state.url.set("q", q);
            }
            q.is_empty() && self.options.search_clear_policy == SearchClearPolicy::Skip
        };

        if skip_fetch {
            debug!(view = %self.id, "Busca limpa sem nova consulta");
            return;
        }
        self.fetch_page().await;
    }

    /// Clique no cabeçalho de uma coluna. A ordenação não vai para a URL.
    pub async fn set_order_by(&self, field: SortField) {
        {
            let mut state = self.lock();
            state.query.order_by = state.query.order_by.clicked(field);
        }
        self.fetch_page().await;
    }

    /// Vai para a página `page`. Fora de `[1, last_page]` não faz nada
    /// (devolve `false`); sem `last_page` conhecido só o mínimo é checado.
    pub async fn set_page(&self, page: u32) -> bool {
        {
            let mut state = self.lock();
            let last_page = state.page.as_ref().map(|p| p.last_page);
            if page < 1 || last_page.is_some_and(|last| page > last) {
                debug!(view = %self.id, page, ?last_page, "Página fora do intervalo ignorada");
                return false;
            }
            state.query.page = page;
            if let Some(filter) = state.query.filter {
                state.url.set("filter", filter.as_str());
            }
            state.url.set("page", page.to_string());
        }
        self.fetch_page().await;
        true
    }

    /// Troca o tamanho da página sem mexer na página atual.
    pub async fn set_per_page(&self, per_page: u32) -> Result<(), AppError> {
        let per_page = ensure_per_page(per_page)?;
        {
            let mut state = self.lock();
            state.query.per_page = per_page;
        }
        self.fetch_page().await;
        Ok(())
    }

    /// Abre um diálogo, fechando qualquer outro que estivesse aberto.
    pub fn open_dialog(&self, kind: DialogKind, company_id: Option<i64>) -> Result<(), AppError> {
        let mut state = self.lock();

        let find = |id: Option<i64>, label: &'static str| -> Result<Company, AppError> {
            let id = id.ok_or(AppError::DialogRequiresCompany(label))?;
            state
                .page
                .as_ref()
                .and_then(|p| p.companies.iter().find(|c| c.id == id))
                .cloned()
                .ok_or(AppError::CompanyNotInPage(id))
        };

        let dialog = match kind {
            DialogKind::Adding => OpenDialog::Adding,
            DialogKind::Editing => OpenDialog::Editing(find(company_id, "edição")?),
            DialogKind::Deleting => OpenDialog::Deleting(find(company_id, "exclusão")?),
            DialogKind::Viewing => OpenDialog::Viewing(find(company_id, "visualização")?),
        };

        state.dialog = dialog;
        Ok(())
    }

    pub fn close_dialog(&self) {
        self.lock().dialog = OpenDialog::None;
    }

    async fn fetch_page(&self) {
        let (generation, request) = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.generation += 1;
            state.status = ListStatus::Loading;
            (state.generation, state.query.to_request(&self.search.current()))
        };

        let outcome = self.load(&request).await;

        let mut state = self.lock();
        if state.closed || state.generation != generation {
            debug!(view = %self.id, generation, "Resposta obsoleta descartada");
            return;
        }

        match outcome {
            Ok(page) => {
                debug!(view = %self.id, total = page.total, last_page = page.last_page, "Página carregada");
                state.page = Some(page);
                state.status = ListStatus::Loaded;
            }
            Err(e) => {
                // A lista anterior continua na tela; só o indicador de carregamento some
                warn!(view = %self.id, "Falha ao buscar empresas: {}", e);
                state.status = ListStatus::Errored;
            }
        }
    }

    async fn load(&self, request: &CompanyListRequest) -> Result<LoadedPage, AppError> {
        let CompaniesPage {
            data,
            total,
            last_page,
            ..
        } = self.deps.directory.list_companies(&self.token, request).await?;

        let limits = self.resolve_trial_limits(&data).await;

        Ok(LoadedPage {
            companies: data,
            total,
            last_page,
            limits,
        })
    }

    // Falha de configuração não derruba a listagem: o limite fica "N/A"
    async fn resolve_trial_limits(&self, companies: &[Company]) -> TrialLimits {
        match self.options.trial_limit_scope {
            TrialLimitScope::Global => TrialLimits::Global(self.fetch_trial_limit(None).await),
            TrialLimitScope::Owner => {
                let mut limits = HashMap::new();
                for company in companies {
                    if limits.contains_key(&company.id_user) {
                        continue;
                    }
                    let limit = self.fetch_trial_limit(company.id_user).await;
                    limits.insert(company.id_user, limit);
                }
                TrialLimits::PerOwner(limits)
            }
        }
    }

    async fn fetch_trial_limit(&self, owner: Option<i64>) -> Option<u32> {
        match self.deps.app_config.trial_limit_days(&self.token, owner).await {
            Ok(days) => Some(days),
            Err(e) => {
                warn!(view = %self.id, ?owner, "Limite do período de teste indisponível: {}", e);
                None
            }
        }
    }

    pub fn status(&self) -> ListStatus {
        self.lock().status
    }

    pub fn url_query(&self) -> String {
        self.lock().url.to_query_string()
    }

    pub fn snapshot(&self, lang: Language) -> ViewSnapshot {
        let now = self.deps.clock.now();
        let q = self.search.current();
        let state = self.lock();

        let limit_for = |company: &Company| {
            state
                .page
                .as_ref()
                .and_then(|p| p.limits.for_owner(company.id_user))
        };

        let rows = state
            .page
            .as_ref()
            .map(|p| {
                p.companies
                    .iter()
                    .map(|c| company_row(c, limit_for(c), now, lang))
                    .collect()
            })
            .unwrap_or_default();

        let dialog = match &state.dialog {
            OpenDialog::None => ActiveDialog::None,
            OpenDialog::Adding => ActiveDialog::Adding,
            OpenDialog::Editing(c) => ActiveDialog::Editing(company_details(c, limit_for(c), now)),
            OpenDialog::Deleting(c) => ActiveDialog::Deleting(company_details(c, limit_for(c), now)),
            OpenDialog::Viewing(c) => ActiveDialog::Viewing(company_details(c, limit_for(c), now)),
        };

        ViewSnapshot {
            view_id: self.id,
            status: state.status,
            loading: state.status == ListStatus::Loading,
            query: QueryState {
                filter: state.query.filter,
                q,
                order_by: state.query.order_by,
                page: state.query.page,
                per_page: state.query.per_page,
            },
            url_query: state.url.to_query_string(),
            rows,
            total: state.page.as_ref().map(|p| p.total),
            last_page: state.page.as_ref().map(|p| p.last_page),
            dialog,
        }
    }
}

impl ListView for CompanyListView {
    fn id(&self) -> Uuid {
        self.id
    }

    fn is_owned_by(&self, token: &str) -> bool {
        self.token == token
    }

    fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.generation += 1;
        state.dialog = OpenDialog::None;
    }

    fn subscribe_search(&self) -> SearchReader {
        self.search.subscribe()
    }
}

impl Drop for CompanyListView {
    fn drop(&mut self) {
        info!(view = %self.id, "Visão de empresas encerrada");
    }
}
