mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn regular_users_are_forbidden() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    for path in ["/admin/dashboard", "/admin/logs"] {
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.json()["code"], 403);
    }
}

#[tokio::test]
async fn configured_admin_sees_stats_and_logs() {
    let app = TestApp::with_config(|config| {
        config.admin_email = Some("Boss@Example.com".to_string());
    })
    .await;

    let mut user = app.client();
    user.sign_up("ana@example.com").await;
    user.add_entry("2024-01-20", "Food", "10", "expense").await;
    user.add_entry("2024-01-21", "Food", "12", "expense").await;
    user.add_entry("2024-01-22", "Rent", "500", "expense").await;

    let mut admin = app.client();
    admin.sign_up("boss@example.com").await;

    let response = admin.get("/admin/dashboard").await;
    assert_eq!(response.status, StatusCode::OK, "body: {}", response.text());
    let stats = response.json();
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["totalEntries"], 3);
    assert_eq!(stats["totalCategories"], 6);
    assert_eq!(stats["topCategories"][0]["category"], "Food");
    assert_eq!(stats["topCategories"][0]["count"], 2);
    assert_eq!(stats["recentUsers"][0]["email"], "boss@example.com");
    assert_eq!(stats["recentUsers"][0]["role"], "admin");
    assert!(stats["logs"]
        .as_str()
        .unwrap()
        .contains("SmartBudget app started."));

    let logs = admin.get("/admin/logs").await;
    assert_eq!(logs.status, StatusCode::OK);
    assert!(logs.json()["logs"]
        .as_str()
        .unwrap()
        .contains("[LOGIN] SUCCESS for boss@example.com"));
}
