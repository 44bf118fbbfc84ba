mod common;

use axum::http::StatusCode;
use common::{today, TestApp};
use serde_json::json;

const FOOD_TIP: &str = "Your food expenses are high. Consider meal planning.";

#[tokio::test]
async fn salary_and_food_scenario_totals() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    client
        .add_entry("2024-01-20", "Salary", "2000", "income")
        .await
        .assert_redirect("/dashboard");
    client
        .add_entry("2024-01-15", "Food", "50", "expense")
        .await
        .assert_redirect("/dashboard");

    let view = client.dashboard().await;
    assert_eq!(view["flashes"][0]["message"], "Entry added successfully!");
    assert_eq!(view["totalIncome"], json!(2000.0));
    assert_eq!(view["totalExpense"], json!(50.0));
    assert_eq!(view["balance"], json!(1950.0));
    assert_eq!(view["chartLabels"], json!(["January 2024"]));
    assert_eq!(view["chartData"], json!([50.0]));

    let entries = view["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["category"], "Salary");
    assert_eq!(entries[0]["date"], "2024-01-20");
    assert_eq!(entries[1]["type"], "expense");

    assert!(app
        .audit_log()
        .contains("ana@example.com added income: Salary - 2000"));
}

#[tokio::test]
async fn food_tip_follows_recent_spending() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    client.add_entry(&today(), "Food", "100", "expense").await;
    let tips = client.dashboard().await["tips"].clone();
    assert!(!tips.as_array().unwrap().iter().any(|t| t == FOOD_TIP));

    client.add_entry(&today(), "Food", "100", "expense").await;
    let tips = client.dashboard().await["tips"].clone();
    assert!(tips.as_array().unwrap().iter().any(|t| t == FOOD_TIP));
}

#[tokio::test]
async fn filters_narrow_the_listing() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    client.add_entry("2024-01-20", "Salary", "2000", "income").await;
    client.add_entry("2024-02-03", "Food", "30", "expense").await;
    client.add_entry("2024-03-10", "Rent", "800", "expense").await;

    let view = client.get("/dashboard?type=expense").await.json();
    assert_eq!(view["entries"].as_array().unwrap().len(), 2);
    assert_eq!(view["selectedType"], "expense");

    let view = client
        .get("/dashboard?category=Food&start_date=2024-02-01&end_date=2024-02-28")
        .await
        .json();
    let entries = view["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["amount"], json!(30.0));
    assert_eq!(view["selectedCategory"], "Food");
    assert_eq!(view["totalExpense"], json!(30.0));
}

#[tokio::test]
async fn invalid_entry_returns_field_errors() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    let response = client.add_entry("not-a-date", "Food", "abc", "expense").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &response.json()["errors"];
    assert!(errors["date"].is_array());
    assert!(errors["amount"].is_array());

    let response = client.add_entry("2024-01-01", "Travel", "10", "expense").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json()["errors"]["category"].is_array());

    assert!(client.dashboard().await["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_or_wrong_csrf_token_is_rejected() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;

    let fields = [
        ("date", "2024-01-01"),
        ("category", "Food"),
        ("amount", "10"),
        ("type", "expense"),
    ];
    let response = client.post_form("/dashboard", &fields).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["reason"], "The CSRF token is missing.");

    let mut with_token = fields.to_vec();
    with_token.push(("csrf_token", "forged"));
    let response = client.post_form("/dashboard", &with_token).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["reason"], "The CSRF tokens do not match.");

    assert!(client.dashboard().await["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn adding_categories() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.sign_up("ana@example.com").await;
    let token = client.csrf_token().await;

    client
        .post_form(
            "/add_category",
            &[("csrf_token", token.as_str()), ("new_category", "Travel")],
        )
        .await
        .assert_redirect("/dashboard");
    let view = client.dashboard().await;
    assert_eq!(view["flashes"][0]["message"], "Category added!");
    assert!(view["categories"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "Travel"));

    client
        .post_form(
            "/add_category",
            &[("csrf_token", token.as_str()), ("new_category", "Travel")],
        )
        .await
        .assert_redirect("/dashboard");
    let view = client.dashboard().await;
    assert_eq!(view["flashes"][0]["category"], "warning");
    assert_eq!(view["flashes"][0]["message"], "Category already exists.");

    client
        .post_form(
            "/add_category",
            &[("csrf_token", token.as_str()), ("new_category", "   ")],
        )
        .await
        .assert_redirect("/dashboard");
    assert_eq!(client.dashboard().await["flashes"][0]["category"], "danger");

    // The new category is usable right away
    client
        .add_entry("2024-05-01", "Travel", "300", "expense")
        .await
        .assert_redirect("/dashboard");
    assert!(app
        .audit_log()
        .contains("ana@example.com added new category: Travel"));
}
