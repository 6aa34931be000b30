/// End-to-end bundle page flows: catalog filtering, the purchase dialog and
/// the catalog loader's cancellation, against a local mock server.
use std::time::Duration;

use cg_dashboard_core::api::{ApiClient, UserProfile};
use cg_dashboard_core::catalog::{BundleQuery, CatalogLoader};
use cg_dashboard_core::commands::Command;
use cg_dashboard_core::config::ApiConfig;
use cg_dashboard_core::dashboard::Dashboard;
use cg_dashboard_core::error::DashboardError;
use cg_dashboard_core::purchase::{Notice, PaymentTab, TransferField};
use cg_dashboard_core::service::DashboardService;
use cg_dashboard_core::session::Session;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

fn api_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&server.uri(), true).expect("valid mock server URL");
    ApiClient::new(config).expect("failed to build client")
}

fn dashboard_for(server: &MockServer) -> Dashboard {
    let session = Session::new(
        Zeroizing::new("tok".into()),
        UserProfile {
            user_name: "ada".into(),
            balance: Decimal::from(2000),
        },
    );
    Dashboard::new(DashboardService::new(api_for(server), session))
}

fn catalog(ids: &[(u32, &str, &str)]) -> serde_json::Value {
    let bundles: Vec<_> = ids
        .iter()
        .map(|(id, network, kind)| {
            json!({
                "id": id,
                "display_name": format!("{network} {kind}"),
                "value": "1GB",
                "network": network,
                "type": kind,
                "price": "300",
            })
        })
        .collect();
    json!({"success": 1, "data": {"bundles": bundles}})
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cg-bundles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog(&[(1, "MTN", "data"), (2, "GLO", "airtime")])),
        )
        .mount(server)
        .await;
}

fn ids(dashboard: &Dashboard) -> Vec<String> {
    dashboard.bundles().iter().map(|b| b.id.clone()).collect()
}

#[tokio::test]
async fn filter_matches_network_and_type() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let mut dash = dashboard_for(&server);

    dash.load_bundles(BundleQuery::new(Some("MTN"), Some("data")))
        .await
        .expect("load failed");
    assert_eq!(ids(&dash), vec!["1"]);
}

#[tokio::test]
async fn filter_without_match_shows_everything() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let mut dash = dashboard_for(&server);

    dash.load_bundles(BundleQuery::new(Some("MTN"), Some("airtime")))
        .await
        .expect("load failed");
    assert_eq!(ids(&dash), vec!["1", "2"]);
}

#[tokio::test]
async fn catalog_failure_leaves_page_empty() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let mut dash = dashboard_for(&server);
    dash.load_bundles(BundleQuery::default()).await.unwrap();
    assert_eq!(dash.bundles().len(), 2);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/cg-bundles"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Server down"})))
        .mount(&server)
        .await;

    let err = dash.load_bundles(BundleQuery::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Server down");
    assert!(dash.bundles().is_empty());
}

#[tokio::test]
async fn successful_wallet_purchase_closes_dialog() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/cg-bundles/buy"))
        .and(body_json(json!({"bundle_id": "2", "paywith": "2000"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": 1, "message": "Bundle purchased"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "data": {"user": {"user_name": "ada", "account_details": 1700}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut dash = dashboard_for(&server);
    dash.load_bundles(BundleQuery::default()).await.unwrap();
    let selected = dash.select("2").expect("bundle 2 is listed");
    assert_eq!(selected.network, "GLO");
    assert!(dash.purchase().selection().is_open());

    let notice = dash.submit().await.expect("submit should reach the server");
    assert_eq!(notice, Notice::Success("Bundle purchased".into()));
    assert!(!dash.purchase().selection().is_open());
    assert!(dash.purchase().selection().bundle().is_none());
    assert_eq!(dash.wallet_balance(), Decimal::from(1700));
}

#[tokio::test]
async fn failed_transfer_purchase_closes_dialog_with_error() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/cg-bundles/transfer"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"error": {"message": "Wallet ID not found"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut dash = dashboard_for(&server);
    dash.load_bundles(BundleQuery::default()).await.unwrap();
    dash.select("1").unwrap();
    let purchase = dash.purchase_mut();
    purchase.set_tab(PaymentTab::Transfer);
    purchase.set_field(TransferField::Amount, "300");
    purchase.set_field(TransferField::CgWalletId, "CG-1");

    let notice = dash.submit().await.expect("submit should reach the server");
    assert_eq!(notice, Notice::Error("Wallet ID not found".into()));
    assert!(!dash.purchase().selection().is_open());
    assert!(!dash.purchase().is_busy());
}

#[tokio::test]
async fn invalid_transfer_is_not_sent() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/cg-bundles/transfer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let mut dash = dashboard_for(&server);
    dash.load_bundles(BundleQuery::default()).await.unwrap();
    dash.select("1").unwrap();
    dash.purchase_mut().set_tab(PaymentTab::Transfer);
    dash.purchase_mut().set_field(TransferField::Amount, "ten");

    let err = dash.submit().await.unwrap_err();
    match err {
        DashboardError::Validation(errs) => {
            assert_eq!(errs.field("amount"), Some("Amount must be a number"))
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(dash.purchase().selection().is_open());
}

#[tokio::test]
async fn selecting_unknown_bundle_fails() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let mut dash = dashboard_for(&server);
    dash.load_bundles(BundleQuery::default()).await.unwrap();

    assert!(dash.select("99").is_err());
    assert!(!dash.purchase().selection().is_open());
}

#[tokio::test]
async fn newer_catalog_request_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cg-bundles"))
        .and(header("authorization", "Bearer slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog(&[(1, "MTN", "data")]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cg-bundles"))
        .and(header("authorization", "Bearer fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog(&[(2, "GLO", "airtime")])))
        .mount(&server)
        .await;

    let mut loader = CatalogLoader::new(api_for(&server));
    loader.request("slow", BundleQuery::default());
    loader.request("fast", BundleQuery::default());
    let bundles = loader.finish().await.expect("a request is pending").unwrap();
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].id, "2");
    assert!(!loader.is_loading());
    assert!(loader.finish().await.is_none());
}

#[tokio::test]
async fn cancelled_catalog_request_yields_nothing() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let mut loader = CatalogLoader::new(api_for(&server));
    loader.request("tok", BundleQuery::default());
    assert!(loader.is_loading());
    loader.cancel();
    assert!(!loader.is_loading());
    assert!(loader.finish().await.is_none());
}

#[tokio::test]
async fn commands_drive_the_page() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let mut dash = dashboard_for(&server);

    let out = Command::parse("bundles MTN data")
        .unwrap()
        .execute(&mut dash, false)
        .await
        .unwrap();
    assert!(out.contains("MTN data"));
    assert!(!out.contains("GLO airtime"));

    let out = Command::parse("buy 1").unwrap().execute(&mut dash, false).await.unwrap();
    assert!(out.contains("[Pay with Wallet]"));
    assert!(out.contains("₦2,000.00"));

    let pay = Command::parse("pay").unwrap();
    assert!(pay.confirmation_prompt(&dash).unwrap().contains("wallet balance"));

    let out = Command::parse("set amount 300").unwrap().execute(&mut dash, false).await.unwrap();
    assert!(out.contains("[Pay with Transfer]"));

    let out = Command::parse("close").unwrap().execute(&mut dash, false).await.unwrap();
    assert_eq!(out, "Purchase dialog closed.");
    assert!(pay.confirmation_prompt(&dash).is_none());

    let out = Command::parse("bundles").unwrap().execute(&mut dash, true).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
}
