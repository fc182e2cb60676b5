// src/services/search_store.rs

use std::time::Duration;

use tokio::sync::watch;

/// Texto da busca livre com um único escritor (a visão da listagem) e
/// quantos leitores forem necessários (ex.: a caixa de busca do cabeçalho).
/// A última escrita vence.
#[derive(Debug)]
pub struct SearchStore {
    tx: watch::Sender<String>,
}

// Leitor do texto de busca
#[derive(Debug, Clone)]
pub struct SearchReader {
    rx: watch::Receiver<String>,
}

impl SearchStore {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(initial.into());
        Self { tx }
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Grava o novo texto. Devolve `true` se o valor mudou.
    pub fn set(&self, q: &str) -> bool {
        self.tx.send_if_modified(|current| {
            if current == q {
                return false;
            }
            *current = q.to_string();
            true
        })
    }

    pub fn subscribe(&self) -> SearchReader {
        SearchReader { rx: self.tx.subscribe() }
    }
}

impl SearchReader {
    pub fn current(&self) -> String {
        self.rx.borrow().clone()
    }

    /// Espera a próxima alteração. `None` quando o escritor deixou de existir.
    pub async fn changed(&mut self) -> Option<String> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Leitura longa da caixa do cabeçalho: se o texto já é diferente de
    /// `known`, devolve na hora; senão espera a próxima alteração por até `wait`.
    pub async fn next_after(&mut self, known: &str, wait: Duration) -> String {
        let current = self.rx.borrow_and_update().clone();
        if current != known {
            return current;
        }
        match tokio::time::timeout(wait, self.changed()).await {
            Ok(Some(q)) => q,
            _ => self.current(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_only_real_changes() {
        let store = SearchStore::new("");
        assert!(store.set("padaria"));
        assert!(!store.set("padaria"));
        assert_eq!(store.current(), "padaria");
    }

    #[tokio::test]
    async fn readers_observe_the_latest_write() {
        let store = SearchStore::new("inicial");
        let mut reader = store.subscribe();
        assert_eq!(reader.current(), "inicial");

        store.set("a");
        store.set("ab");
        assert_eq!(reader.changed().await.as_deref(), Some("ab"));

        drop(store);
        assert_eq!(reader.changed().await, None);
    }

    #[tokio::test]
    async fn next_after_returns_at_once_when_already_different() {
        let store = SearchStore::new("padaria");
        let mut reader = store.subscribe();
        let q = reader.next_after("", Duration::from_secs(30)).await;
        assert_eq!(q, "padaria");
    }

    #[tokio::test]
    async fn next_after_waits_for_the_writer() {
        let store = SearchStore::new("");
        let mut reader = store.subscribe();

        let waiting = tokio::spawn(async move { reader.next_after("", Duration::from_secs(30)).await });
        tokio::task::yield_now().await;
        store.set("farmácia");

        assert_eq!(waiting.await.unwrap(), "farmácia");
    }

    #[tokio::test]
    async fn next_after_gives_up_after_the_wait() {
        let store = SearchStore::new("igual");
        let mut reader = store.subscribe();
        let q = reader.next_after("igual", Duration::from_millis(20)).await;
        assert_eq!(q, "igual");
    }
}
