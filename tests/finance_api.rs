mod support;

use axum::http::{Method, StatusCode};
use axum::Router;
use doflow::api::finance::{create_router, AppState};
use doflow::config::Config;
use serde_json::{json, Value};

use support::{request, send_json};

fn app_with(config: Config) -> Router {
    create_router(AppState::in_memory(&config), false)
}

fn app() -> Router {
    app_with(Config::for_tests())
}

async fn login(app: &Router) -> String {
    let response = send_json(
        app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "emailOrPhone": "admin@doflow.com", "password": "password123" })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"]["token"]
        .as_str()
        .expect("login should return a token")
        .to_string()
}

async fn create_transaction(app: &Router, name: &str, amount: f64, kind: &str) -> Value {
    let response = send_json(
        app,
        request(
            Method::POST,
            "/api/v1/transactions",
            None,
            Some(json!({
                "category": "Ufficio",
                "name": name,
                "amount": amount,
                "type": kind,
                "paymentMethod": "bank"
            })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body["data"].clone()
}

#[tokio::test]
async fn login_accepts_demo_credentials_only() {
    let app = app();

    let token = login(&app).await;
    assert!(!token.is_empty());

    let wrong = send_json(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "emailOrPhone": "admin", "password": "nope" })),
        ),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["success"], false);

    let missing = send_json(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "emailOrPhone": "admin" })),
        ),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Email/telefono e password sono richiesti");
}

#[tokio::test]
async fn verify_returns_token_claims() {
    let app = app();
    let token = login(&app).await;

    let response = send_json(
        &app,
        request(Method::GET, "/api/v1/auth/verify", Some(&token), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["userId"], "user-1");

    let bad = send_json(
        &app,
        request(Method::GET, "/api/v1/auth/verify", Some("garbage"), None),
    )
    .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["message"], "Token is invalid!");
}

#[tokio::test]
async fn register_issues_a_token() {
    let app = app();

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "new@doflow.com",
                "firstName": "Nuovo",
                "lastName": "Utente",
                "companyName": "Acme",
                "industry": "retail"
            })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["user"]["role"], "admin");
    assert_eq!(response.body["data"]["company"]["name"], "Acme");
    assert!(response.body["data"]["token"].is_string());
}

#[tokio::test]
async fn transaction_listing_requires_a_token() {
    let app = app();

    let anonymous = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions", None, None),
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["message"], "Token is missing!");

    let token = login(&app).await;
    let listed = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions", Some(&token), None),
    )
    .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["total"], 0);
}

#[tokio::test]
async fn transaction_crud() {
    let app = app();

    let created = create_transaction(&app, "Affitto", 900.0, "expense").await;
    assert_eq!(created["transactionId"], "T-1001");
    let id = created["id"].as_str().unwrap().to_string();
    let path = format!("/api/v1/transactions/{}", id);

    let fetched = send_json(&app, request(Method::GET, &path, None, None)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["name"], "Affitto");

    let updated = send_json(
        &app,
        request(Method::PUT, &path, None, Some(json!({ "amount": 950.0 }))),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["amount"], 950.0);

    let negative = send_json(
        &app,
        request(Method::PUT, &path, None, Some(json!({ "amount": -1.0 }))),
    )
    .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let deleted = send_json(&app, request(Method::DELETE, &path, None, None)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);

    let gone = send_json(&app, request(Method::GET, &path, None, None)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "Transaction not found");
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let app = app();
    let token = login(&app).await;

    let keep = create_transaction(&app, "Affitto", 900.0, "expense").await;
    let removed = create_transaction(&app, "Carburante", 60.0, "expense").await;

    let path = format!("/api/v1/transactions/{}", removed["id"].as_str().unwrap());
    let deleted = send_json(&app, request(Method::DELETE, &path, None, None)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let listed = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions", Some(&token), None),
    )
    .await;
    let items = listed.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], keep["id"]);
}

#[tokio::test]
async fn deleting_unknown_id_still_succeeds() {
    let app = app();

    let response = send_json(
        &app,
        request(Method::DELETE, "/api/v1/transactions/does-not-exist", None, None),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);

    let audit = send_json(&app, request(Method::GET, "/api/v1/audit", None, None)).await;
    assert_eq!(audit.body["total"], 0);
}

#[tokio::test]
async fn transaction_filters_and_limit() {
    let app = app();
    let token = login(&app).await;

    create_transaction(&app, "Fattura", 1000.0, "income").await;
    create_transaction(&app, "Affitto", 900.0, "expense").await;
    create_transaction(&app, "Carburante", 60.0, "expense").await;

    let expenses = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions?type=expense", Some(&token), None),
    )
    .await;
    assert_eq!(expenses.body["total"], 2);

    let limited = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions?limit=1", Some(&token), None),
    )
    .await;
    assert_eq!(limited.body["total"], 1);

    let fallback = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions?limit=abc", Some(&token), None),
    )
    .await;
    assert_eq!(fallback.body["total"], 3);
}

#[tokio::test]
async fn clients_get_codes_and_search() {
    let app = app();

    for name in ["Rossi S.r.l.", "Bianchi SpA"] {
        let response = send_json(
            &app,
            request(Method::POST, "/api/v1/clients", None, Some(json!({ "name": name }))),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let found = send_json(
        &app,
        request(Method::GET, "/api/v1/clients?search=rossi", None, None),
    )
    .await;
    let items = found.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["clientId"], "CL-1001");

    let nameless = send_json(
        &app,
        request(Method::POST, "/api/v1/clients", None, Some(json!({ "name": " " }))),
    )
    .await;
    assert_eq!(nameless.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn preferences_default_then_update() {
    let app = app();

    let defaults = send_json(
        &app,
        request(Method::GET, "/api/v1/preferences", None, None),
    )
    .await;
    assert_eq!(defaults.status, StatusCode::OK);
    assert_eq!(defaults.body["data"]["theme"], "light");

    let updated = send_json(
        &app,
        request(
            Method::PUT,
            "/api/v1/preferences",
            None,
            Some(json!({ "theme": "dark" })),
        ),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["theme"], "dark");

    let again = send_json(
        &app,
        request(Method::GET, "/api/v1/preferences", None, None),
    )
    .await;
    assert_eq!(again.body["data"]["theme"], "dark");
}

#[tokio::test]
async fn analytics_overview_and_reports() {
    let app = app();

    create_transaction(&app, "Fattura", 1000.0, "income").await;
    create_transaction(&app, "Affitto", 250.0, "expense").await;

    let overview = send_json(
        &app,
        request(Method::GET, "/api/v1/analytics/overview", None, None),
    )
    .await;
    assert_eq!(overview.status, StatusCode::OK);
    assert_eq!(overview.body["data"]["totalIncome"], 1000.0);
    assert_eq!(overview.body["data"]["totalExpenses"], 250.0);
    assert_eq!(overview.body["data"]["netBalance"], 750.0);

    let report = send_json(
        &app,
        request(
            Method::POST,
            "/api/v1/analytics/reports",
            None,
            Some(json!({ "reportType": "monthly", "period": "2024-05" })),
        ),
    )
    .await;
    assert_eq!(report.status, StatusCode::OK);
    assert_eq!(report.body["data"]["period"], "2024-05");

    let unknown = send_json(
        &app,
        request(
            Method::POST,
            "/api/v1/analytics/reports",
            None,
            Some(json!({ "reportType": "weekly" })),
        ),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_are_audited() {
    let app = app();

    let created = create_transaction(&app, "Affitto", 900.0, "expense").await;
    let id = created["id"].as_str().unwrap();
    send_json(
        &app,
        request(Method::DELETE, &format!("/api/v1/transactions/{}", id), None, None),
    )
    .await;

    let audit = send_json(
        &app,
        request(
            Method::GET,
            &format!("/api/v1/audit?resource=transaction&resourceId={}", id),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(audit.status, StatusCode::OK);
    assert_eq!(audit.body["total"], 2);
    assert_eq!(audit.body["data"][0]["action"], "create");
    assert_eq!(audit.body["data"][1]["action"], "delete");
}

#[tokio::test]
async fn require_auth_guards_every_resource() {
    let mut config = Config::for_tests();
    config.require_auth = true;
    let app = app_with(config);

    let anonymous = send_json(&app, request(Method::GET, "/api/v1/clients", None, None)).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let authed = send_json(
        &app,
        request(Method::GET, "/api/v1/clients", Some(&token), None),
    )
    .await;
    assert_eq!(authed.status, StatusCode::OK);

    let health = send_json(&app, request(Method::GET, "/api/v1/health", None, None)).await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn accounts_filter_by_type_and_update() {
    let app = app();

    for (name, kind, balance) in [("Conto", "bank", 1000.0), ("Cassa", "cash", 50.0)] {
        let response = send_json(
            &app,
            request(
                Method::POST,
                "/api/v1/accounts",
                None,
                Some(json!({ "name": name, "type": kind, "balance": balance })),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let banks = send_json(
        &app,
        request(Method::GET, "/api/v1/accounts?type=bank", None, None),
    )
    .await;
    let items = banks.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    let id = items[0]["id"].as_str().unwrap().to_string();

    let closed = send_json(
        &app,
        request(
            Method::PUT,
            &format!("/api/v1/accounts/{}", id),
            None,
            Some(json!({ "isActive": false })),
        ),
    )
    .await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.body["data"]["isActive"], false);

    let active = send_json(
        &app,
        request(Method::GET, "/api/v1/accounts?active=true", None, None),
    )
    .await;
    assert_eq!(active.body["total"], 1);

    let bad_type = send_json(
        &app,
        request(Method::GET, "/api/v1/accounts?type=crypto", None, None),
    )
    .await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_body_shape_gets_error_envelope() {
    let app = app();

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/api/v1/transactions",
            None,
            Some(json!({ "name": "Affitto", "amount": "tanti" })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn unknown_transaction_type_filter_is_rejected() {
    let app = app();
    let token = login(&app).await;

    let response = send_json(
        &app,
        request(Method::GET, "/api/v1/transactions?type=refund", Some(&token), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Unknown transaction type 'refund'");
}

#[tokio::test]
async fn audit_chain_verifies_after_mutations() {
    let app = app();

    create_transaction(&app, "Affitto", 900.0, "expense").await;
    create_transaction(&app, "Fattura", 1200.0, "income").await;

    let response = send_json(
        &app,
        request(Method::GET, "/api/v1/audit/verify", None, None),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["valid"], true);
    assert_eq!(response.body["data"]["entries"], 2);
}
