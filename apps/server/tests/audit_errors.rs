mod common;

use axum::http::StatusCode;
use common::TestApp;

/// Breaks the schema underneath the running app.
fn drop_table(app: &TestApp, table: &str) {
    let conn = rusqlite::Connection::open(&app.config.db_path).unwrap();
    conn.execute_batch(&format!("DROP TABLE {table};")).unwrap();
}

#[tokio::test]
async fn dashboard_storage_failure_is_audited() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    drop_table(&app, "budget_entries");

    let response = client.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["code"], 500);
    assert!(
        app.audit_log()
            .contains("[ERROR] load dashboard by ana@example.com failed"),
        "audit log: {}",
        app.audit_log()
    );
}

#[tokio::test]
async fn edit_page_storage_failure_is_audited() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;
    client
        .add_entry("2024-01-20", "Food", "10", "expense")
        .await
        .assert_redirect("/dashboard");

    drop_table(&app, "categories");

    let response = client.get("/edit/1").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app
        .audit_log()
        .contains("[ERROR] open entry by ana@example.com failed"));
}

#[tokio::test]
async fn session_lookup_failure_is_audited() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    drop_table(&app, "sessions");

    let response = client.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app
        .audit_log()
        .contains("[ERROR] resolve session by user #1 failed"));
}

#[tokio::test]
async fn login_storage_failure_is_audited() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client
        .register("ana@example.com")
        .await
        .assert_redirect("/login");

    drop_table(&app, "sessions");

    let response = client.login("ana@example.com", common::PASSWORD).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!client.has_cookie("sb_session"));
    assert!(app
        .audit_log()
        .contains("[ERROR] login by ana@example.com failed"));
}
