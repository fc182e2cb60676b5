// src/services/view_registry.rs

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockWriteGuard},
};

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    common::{clock::Clock, error::AppError},
    services::search_store::SearchReader,
};

/// O que o registro precisa saber de uma visão aberta.
pub trait ListView: Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// A visão só responde ao token que a criou.
    fn is_owned_by(&self, token: &str) -> bool;

    /// Desmonta a visão: respostas que ainda estão a caminho são descartadas.
    fn close(&self);

    fn subscribe_search(&self) -> SearchReader;
}

/// Limites das visões abertas. O renderizador pode sumir sem mandar o
/// DELETE (recarga, aba fechada), então visões paradas são encerradas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryLimits {
    pub idle_timeout: Duration,
    pub max_views: usize,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::minutes(30),
            max_views: 100,
        }
    }
}

struct Entry<V> {
    view: Arc<V>,
    last_seen: DateTime<Utc>,
    // Ordem de uso, para despejar a menos usada quando o limite estoura
    tick: u64,
}

struct Views<V> {
    entries: HashMap<Uuid, Entry<V>>,
    ticks: u64,
}

impl<V> Views<V> {
    fn next_tick(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }
}

/// As visões de listagem abertas, por id.
pub struct ViewRegistry<V> {
    views: Arc<RwLock<Views<V>>>,
    clock: Arc<dyn Clock>,
    limits: RegistryLimits,
}

impl<V> Clone for ViewRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            views: self.views.clone(),
            clock: self.clock.clone(),
            limits: self.limits,
        }
    }
}

impl<V: ListView> ViewRegistry<V> {
    pub fn new(clock: Arc<dyn Clock>, limits: RegistryLimits) -> Self {
        Self {
            views: Arc::new(RwLock::new(Views {
                entries: HashMap::new(),
                ticks: 0,
            })),
            clock,
            limits,
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Views<V>> {
        self.views.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Registra a visão, abrindo espaço antes se for preciso.
    pub fn insert(&self, view: Arc<V>) {
        let now = self.clock.now();
        let evicted = {
            let mut views = self.write();
            let evicted = self.sweep(&mut views, now, 1);
            let tick = views.next_tick();
            views.entries.insert(
                view.id(),
                Entry {
                    view,
                    last_seen: now,
                    tick,
                },
            );
            evicted
        };
        close_all(evicted);
    }

    /// Busca a visão, confere o token e marca o uso.
    pub fn get(&self, id: Uuid, token: &str) -> Result<Arc<V>, AppError> {
        let now = self.clock.now();
        let mut views = self.write();

        let entry = views.entries.get(&id).ok_or(AppError::ViewNotFound(id))?;
        if !entry.view.is_owned_by(token) {
            return Err(AppError::InvalidToken);
        }

        // Passou do tempo e a varredura ainda não rodou
        if now - entry.last_seen > self.limits.idle_timeout {
            let expired = views.entries.remove(&id);
            drop(views);
            if let Some(expired) = expired {
                expired.view.close();
            }
            return Err(AppError::ViewNotFound(id));
        }

        let tick = views.next_tick();
        let entry = views.entries.get_mut(&id).ok_or(AppError::ViewNotFound(id))?;
        entry.last_seen = now;
        entry.tick = tick;
        Ok(entry.view.clone())
    }

    /// Remove e desmonta a visão.
    pub fn remove(&self, id: Uuid, token: &str) -> Result<(), AppError> {
        let view = self.get(id, token)?;
        self.write().entries.remove(&id);
        view.close();
        Ok(())
    }

    /// Encerra as visões paradas há mais que `idle_timeout`. Devolve quantas saíram.
    pub fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        let evicted = {
            let mut views = self.write();
            self.sweep(&mut views, now, 0)
        };
        let count = evicted.len();
        if count > 0 {
            info!(evicted = count, "Visões ociosas encerradas");
        }
        close_all(evicted);
        count
    }

    // Tira as ociosas e, se ainda faltar espaço para `incoming`, as menos usadas
    fn sweep(&self, views: &mut Views<V>, now: DateTime<Utc>, incoming: usize) -> Vec<Arc<V>> {
        let idle_timeout = self.limits.idle_timeout;
        let expired: Vec<Uuid> = views
            .entries
            .iter()
            .filter(|(_, e)| now - e.last_seen > idle_timeout)
            .map(|(id, _)| *id)
            .collect();

        let mut evicted: Vec<Arc<V>> = expired
            .iter()
            .filter_map(|id| views.entries.remove(id))
            .map(|e| e.view)
            .collect();

        let capacity = self.limits.max_views.max(1);
        while views.entries.len() + incoming > capacity {
            let Some(oldest) = views
                .entries
                .iter()
                .min_by_key(|(_, e)| e.tick)
                .map(|(id, _)| *id)
            else {
                break;
            };
            if let Some(entry) = views.entries.remove(&oldest) {
                evicted.push(entry.view);
            }
        }

        evicted
    }

    pub fn len(&self) -> usize {
        self.views
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn close_all<V: ListView>(views: Vec<Arc<V>>) {
    for view in views {
        view.close();
    }
}
