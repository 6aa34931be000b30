/// Resuming a remembered session against a local mock server.
use cg_dashboard_core::api::{ApiClient, UserProfile};
use cg_dashboard_core::catalog::BundleQuery;
use cg_dashboard_core::config::ApiConfig;
use cg_dashboard_core::dashboard::Dashboard;
use cg_dashboard_core::error::DashboardError;
use cg_dashboard_core::service::DashboardService;
use cg_dashboard_core::session::{Session, SessionStore};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

fn api_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&server.uri(), true).expect("valid mock server URL");
    ApiClient::new(config).expect("failed to build client")
}

/// Store holding a session whose saved balance is 5000.
fn remembered(dir: &tempfile::TempDir) -> SessionStore {
    let store = SessionStore::open_at(dir.path().join("session.json"));
    let session = Session::new(
        Zeroizing::new("saved-tok".into()),
        UserProfile {
            user_name: "ada".into(),
            balance: Decimal::from(5000),
        },
    );
    store.save(&session).expect("save failed");
    store
}

fn user_body(balance: u32) -> serde_json::Value {
    json!({"success": 1, "data": {"user": {"user_name": "ada", "account_details": balance}}})
}

#[tokio::test]
async fn resume_pays_with_server_balance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer saved-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(100)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cg-bundles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "data": {"bundles": [
                {"id": 1, "display_name": "MTN 1GB", "value": "1GB", "network": "MTN", "type": "data", "price": "300"}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cg-bundles/buy"))
        .and(body_json(json!({"bundle_id": "1", "paywith": "100"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = remembered(&dir);
    let service = DashboardService::resume(api_for(&server), &store)
        .await
        .unwrap()
        .expect("session should resume");
    assert_eq!(service.session().wallet_balance(), Decimal::from(100));

    let mut dash = Dashboard::new(service);
    dash.load_bundles(BundleQuery::default()).await.unwrap();
    dash.select("1").unwrap();
    let notice = dash.submit().await.unwrap();
    assert!(notice.is_success(), "got {notice:?}");
}

#[tokio::test]
async fn expired_token_clears_remembered_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = remembered(&dir);
    let resumed = DashboardService::resume(api_for(&server), &store).await.unwrap();
    assert!(resumed.is_none());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn resume_without_saved_session_is_none() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open_at(dir.path().join("session.json"));

    let resumed = DashboardService::resume(api_for(&server), &store).await.unwrap();
    assert!(resumed.is_none());
}

#[tokio::test]
async fn server_error_on_resume_keeps_session_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = remembered(&dir);
    let err = DashboardService::resume(api_for(&server), &store)
        .await
        .err()
        .expect("resume should fail");
    assert!(matches!(err, DashboardError::Rejected { status: Some(503), .. }));
    assert!(store.load().is_some());
}
