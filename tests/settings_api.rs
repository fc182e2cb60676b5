mod common;

use common::{MockConfig, MockDirectory, TestApp};
use painel_admin::services::ListViewOptions;
use serde_json::json;

#[tokio::test]
async fn reads_trial_limit() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/settings/trial-limit", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "testingPeriodLimitDays": 15 }));
}

#[tokio::test]
async fn unavailable_trial_limit_is_null() {
    let app = TestApp::with(MockDirectory::new(1), MockConfig::new(None), ListViewOptions::default());
    let (status, body) = app.send("GET", "/api/settings/trial-limit", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["testingPeriodLimitDays"], json!(null));
}

#[tokio::test]
async fn updates_trial_limit() {
    let app = TestApp::new();
    let (status, body) = app
        .send("PUT", "/api/settings/trial-limit", Some(json!({ "testingPeriodLimitDays": 30 })))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["testingPeriodLimitDays"], 30);
    assert_eq!(*app.config.updates.lock().unwrap(), vec![30]);

    // a próxima visão já usa o novo limite
    let (_, snapshot) = app.create_view("").await;
    assert_eq!(snapshot["rows"][0]["remainingDays"], 27);
}

#[tokio::test]
async fn rejects_zero_day_trial() {
    let app = TestApp::new();
    let (status, body) = app
        .send("PUT", "/api/settings/trial-limit", Some(json!({ "testingPeriodLimitDays": 0 })))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Um ou mais campos são inválidos.");
    assert_eq!(
        body["details"]["testing_period_limit_days"],
        json!(["O período de teste deve ser de no mínimo 1 dia"])
    );
    assert!(app.config.updates.lock().unwrap().is_empty());
}
