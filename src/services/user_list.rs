// src/services/user_list.rs
//
// A visão da listagem de usuários: mesma mecânica da de empresas (URL,
// busca compartilhada, paginação, busca com número de geração), sem filtro
// nem ordenação.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    clients::UserDirectory,
    common::error::AppError,
    models::{
        company::DEFAULT_PER_PAGE,
        user::{User, UserListRequest, UsersPage},
        view::{Language, ListStatus, UserQueryState, UserRow, UserViewSnapshot},
    },
    services::{
        list_query::{ensure_per_page, page_from_url, UrlParams},
        search_store::{SearchReader, SearchStore},
        view_registry::ListView,
    },
};

#[derive(Debug)]
struct LoadedUsers {
    users: Vec<User>,
    total: u64,
    last_page: u32,
}

#[derive(Debug)]
struct UserListState {
    page: u32,
    per_page: u32,
    url: UrlParams,
    status: ListStatus,
    generation: u64,
    loaded: Option<LoadedUsers>,
    closed: bool,
}

pub struct UserListView {
    id: Uuid,
    token: String,
    users: Arc<dyn UserDirectory>,
    search: SearchStore,
    state: Mutex<UserListState>,
}

impl UserListView {
    /// Lê `page` e `q` da URL. A primeira busca acontece em `mount`.
    pub fn new(id: Uuid, token: impl Into<String>, url_query: &str, users: Arc<dyn UserDirectory>) -> Self {
        let url = UrlParams::parse(url_query);
        let page = page_from_url(&url);
        let search = SearchStore::new(url.get("q").unwrap_or_default());

        Self {
            id,
            token: token.into(),
            users,
            search,
            state: Mutex::new(UserListState {
                page,
                per_page: DEFAULT_PER_PAGE,
                url,
                status: ListStatus::Idle,
                generation: 0,
                loaded: None,
                closed: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UserListState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn mount(&self) {
        self.fetch_page().await;
    }

    pub async fn refresh(&self) {
        self.fetch_page().await;
    }

    /// Toda mudança na busca gera nova consulta, inclusive a limpeza.
    pub async fn set_search_text(&self, q: &str) {
        self.search.set(q);
        {
            let mut state = self.lock();
            if q.is_empty() {
                state.url.remove("q");
            } else {
                state.url.set("q", q);
            }
        }
        self.fetch_page().await;
    }

    /// Fora de `[1, last_page]` não faz nada (devolve `false`).
    pub async fn set_page(&self, page: u32) -> bool {
        {
            let mut state = self.lock();
            let last_page = state.loaded.as_ref().map(|l| l.last_page);
            if page < 1 || last_page.is_some_and(|last| page > last) {
                debug!(view = %self.id, page, ?last_page, "Página fora do intervalo ignorada");
                return false;
            }
            state.page = page;
            state.url.set("page", page.to_string());
        }
        self.fetch_page().await;
        true
    }

    /// Troca o tamanho da página sem mexer na página atual.
    pub async fn set_per_page(&self, per_page: u32) -> Result<(), AppError> {
        let per_page = ensure_per_page(per_page)?;
        self.lock().per_page = per_page;
        self.fetch_page().await;
        Ok(())
    }

    async fn fetch_page(&self) {
        let (generation, request) = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.generation += 1;
            state.status = ListStatus::Loading;
            let request = UserListRequest {
                page: state.page,
                per_page: state.per_page,
                q: self.search.current(),
            };
            (state.generation, request)
        };

        let outcome = self.users.list_users(&self.token, &request).await;

        let mut state = self.lock();
        if state.closed || state.generation != generation {
            debug!(view = %self.id, generation, "Resposta obsoleta descartada");
            return;
        }

        match outcome {
            Ok(UsersPage { data, total, last_page, .. }) => {
                state.loaded = Some(LoadedUsers {
                    users: data,
                    total,
                    last_page,
                });
                state.status = ListStatus::Loaded;
            }
            Err(e) => {
                warn!(view = %self.id, "Falha ao buscar usuários: {}", e);
                state.status = ListStatus::Errored;
            }
        }
    }

    pub fn status(&self) -> ListStatus {
        self.lock().status
    }

    pub fn url_query(&self) -> String {
        self.lock().url.to_query_string()
    }

    pub fn snapshot(&self, lang: Language) -> UserViewSnapshot {
        let q = self.search.current();
        let state = self.lock();
        let format = lang.date_format();

        let rows = state
            .loaded
            .as_ref()
            .map(|loaded| {
                loaded
                    .users
                    .iter()
                    .map(|user| UserRow {
                        id: user.id,
                        name: user.name.clone(),
                        email: user.email.clone(),
                        created_at: user.created_at,
                        updated_at: user.updated_at,
                        created_label: user.created_at.format(format).to_string(),
                        updated_label: user.updated_at.format(format).to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        UserViewSnapshot {
            view_id: self.id,
            status: state.status,
            loading: state.status == ListStatus::Loading,
            query: UserQueryState {
                q,
                page: state.page,
                per_page: state.per_page,
            },
            url_query: state.url.to_query_string(),
            rows,
            total: state.loaded.as_ref().map(|l| l.total),
            last_page: state.loaded.as_ref().map(|l| l.last_page),
        }
    }
}

impl ListView for UserListView {
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
    }

    fn subscribe_search(&self) -> SearchReader {
        self.search.subscribe()
    }
}

impl Drop for UserListView {
    fn drop(&mut self) {
        info!(view = %self.id, "Visão de usuários encerrada");
    }
}
