mod common;

use std::time::Duration as StdDuration;

use chrono::Duration;
use common::{call, MockConfig, MockDirectory, TestApp, TOKEN};
use painel_admin::services::{ListViewOptions, RegistryLimits};
use serde_json::json;

fn app_with_limits(max_views: usize) -> TestApp {
    TestApp::with_limits(
        MockDirectory::new(5),
        MockConfig::new(Some(15)),
        ListViewOptions::default(),
        RegistryLimits {
            idle_timeout: Duration::minutes(30),
            max_views,
        },
    )
}

#[tokio::test]
async fn mounting_past_the_cap_drops_the_oldest_views() {
    let app = app_with_limits(50);

    let mut ids = Vec::new();
    for _ in 0..200 {
        let (id, _) = app.create_view("").await;
        ids.push(id);
    }

    assert_eq!(app.state.views.len(), 50);
    let (status, _) = app.send("GET", &format!("/api/views/companies/{}", ids[0]), None).await;
    assert_eq!(status, 404);
    let (status, _) = app.send("GET", &format!("/api/views/companies/{}", ids[199]), None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn idle_views_expire_and_touched_views_survive() {
    let app = app_with_limits(100);
    let (idle, _) = app.create_view("").await;
    let (active, _) = app.create_view("").await;
    let (user_view, _) = app.create_user_view("").await;

    app.clock.advance(Duration::minutes(20));
    let (status, _) = app.send("GET", &format!("/api/views/companies/{active}"), None).await;
    assert_eq!(status, 200);
    app.clock.advance(Duration::minutes(15));

    assert_eq!(app.state.views.evict_idle(), 1);
    assert_eq!(app.state.user_views.evict_idle(), 1);

    let (status, _) = app.send("GET", &format!("/api/views/companies/{idle}"), None).await;
    assert_eq!(status, 404);
    let (status, _) = app.send("GET", &format!("/api/views/users/{user_view}"), None).await;
    assert_eq!(status, 404);
    let (status, _) = app.send("GET", &format!("/api/views/companies/{active}"), None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn expired_view_is_gone_even_before_the_sweeper_runs() {
    let app = app_with_limits(100);
    let (id, _) = app.create_view("").await;

    app.clock.advance(Duration::minutes(31));

    let (status, _) = app.send("GET", &format!("/api/views/companies/{id}"), None).await;
    assert_eq!(status, 404);
    assert!(app.state.views.is_empty());
}

#[tokio::test]
async fn search_reader_returns_current_text_without_known() {
    let app = TestApp::new();
    let (id, _) = app.create_view("q=padaria").await;

    let (status, body) = app.send("GET", &format!("/api/views/companies/{id}/search"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "q": "padaria" }));

    // Já diferente do que o cabeçalho mostra: responde na hora
    let (_, body) = app
        .send("GET", &format!("/api/views/companies/{id}/search?known=pizza"), None)
        .await;
    assert_eq!(body["q"], "padaria");
}

#[tokio::test]
async fn search_reader_waits_for_the_next_change() {
    let app = TestApp::new();
    let (id, _) = app.create_view("q=padaria").await;

    let router = app.router.clone();
    let uri = format!("/api/views/companies/{id}/search?known=padaria");
    let waiter = tokio::spawn(async move { call(router, "GET", &uri, None, Some(TOKEN), None).await });

    // Dá tempo do leitor começar a esperar
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    let (status, _) = app
        .send("PUT", &format!("/api/views/companies/{id}/search"), Some(json!({ "q": "mercado" })))
        .await;
    assert_eq!(status, 200);

    let (status, body) = tokio::time::timeout(StdDuration::from_secs(5), waiter)
        .await
        .expect("o leitor não acordou")
        .unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["q"], "mercado");
}

#[tokio::test]
async fn search_reader_answers_only_the_owner() {
    let app = TestApp::new();
    let (id, _) = app.create_user_view("q=ana").await;

    let (status, body) = app
        .send("GET", &format!("/api/views/users/{id}/search"), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["q"], "ana");

    let (status, _) = app
        .send_as("GET", &format!("/api/views/users/{id}/search"), None, Some("outro"), None)
        .await;
    assert_eq!(status, 401);
}
