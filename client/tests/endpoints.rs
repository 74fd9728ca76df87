//! Endpoint verbs, paths and bodies as seen on the wire.

mod common;

use api::http::{
    Bolt11ReceiveRequest, CloseChannelRequest, PaymentDirection, PaymentStatus, PaymentWaitRequest,
    PeerConnectRequest, SpontaneousSendRequest,
};
use client::{Error, RequestOptions};
use common::{client_over, StubTransport};
use numeric::Int;
use transport::{HttpRequest, HttpResponse, Method};

const PAYMENT: &str = r#"{"id":"ab","direction":"Inbound","status":"Succeeded",
    "amount_msat":9223372036854770000,"kind":"Spontaneous","fee_paid_msat":null}"#;

fn route(req: &HttpRequest) -> &'static str {
    let path = req.url.trim_start_matches(common::BASE);
    match path {
        "/healthz" | "/readyz" | "/wallet/sync" | "/peers/connect" | "/channel/close"
        | "/events/handled" => r#"{"ok":true}"#,
        "/status" => r#"{"is_running":true,"is_listening":false,"best_block_height":812345}"#,
        "/balances" => {
            r#"{"total_onchain_balance_sats":21,"spendable_onchain_balance_sats":20,
            "total_anchor_channels_reserve_sats":0,"total_lightning_balance_sats":18446744073709551615}"#
        }
        "/bolt11/receive" => r#"{"invoice":"lnbc1"}"#,
        "/spontaneous/send" => r#"{"payment_id":"cd"}"#,
        "/payments" => "[]",
        "/version" => r#"{"version":"0.4.2","api":{"major":1,"minor":9007199254740993}}"#,
        p if p.starts_with("/payment/") && p.ends_with("/wait") => {
            r#"{"ok":true,"payment":{"id":"ab","direction":"Outbound","status":"Succeeded",
            "amount_msat":1000,"kind":"Bolt11","fee_paid_msat":1}}"#
        }
        p if p.starts_with("/payment/") => PAYMENT,
        _ => "{}",
    }
}

fn routed() -> std::sync::Arc<StubTransport> {
    StubTransport::new(|req| Ok(HttpResponse::new(200, route(req))))
}

#[tokio::test]
async fn test_verbs_and_paths() {
    let stub = routed();
    let node = client_over(stub.clone());
    let opts = RequestOptions::new();

    node.healthz(&opts).await.expect("healthz");
    node.status(&opts).await.expect("status");
    node.wallet_sync(&opts).await.expect("sync");
    node.payments(&opts).await.expect("payments");
    node.channel_close(
        &CloseChannelRequest { user_channel_id: "01".into(), counterparty_node_id: "02ab".into() },
        &opts,
    )
    .await
    .expect("close");

    let seen: Vec<(Method, String)> = stub
        .requests()
        .into_iter()
        .map(|r| (r.method, r.url.trim_start_matches(common::BASE).to_string()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::Get, "/healthz".to_string()),
            (Method::Get, "/status".to_string()),
            (Method::Post, "/wallet/sync".to_string()),
            (Method::Get, "/payments".to_string()),
            (Method::Post, "/channel/close".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_parameterless_post_sends_empty_object() {
    let stub = routed();
    let node = client_over(stub.clone());

    node.wallet_sync(&RequestOptions::new()).await.expect("sync");

    let req = stub.last();
    assert_eq!(req.body.as_deref(), Some("{}"));
    assert_eq!(req.headers["content-type"], "application/json");
}

#[tokio::test]
async fn test_request_body_fields() {
    let stub = routed();
    let node = client_over(stub.clone());
    let opts = RequestOptions::new();

    node.peers_connect(
        &PeerConnectRequest { node_id: "02ab".into(), address: "lnd1:9735".into(), persist: true },
        &opts,
    )
    .await
    .expect("connect");
    let body = numeric::decode(stub.last().body.as_deref().expect("body")).expect("json");
    assert_eq!(body.get("address").and_then(|v| v.as_str()), Some("lnd1:9735"));
    assert_eq!(body.get("persist").and_then(|v| v.as_bool()), Some(true));

    let invoice = node
        .bolt11_receive(
            &Bolt11ReceiveRequest {
                amount_msat: 5_000,
                description: "coffee".into(),
                expiry_secs: 3600,
            },
            &opts,
        )
        .await
        .expect("receive");
    assert_eq!(invoice.invoice, "lnbc1");
}

#[tokio::test]
async fn test_spontaneous_send_without_tlvs() {
    let stub = routed();
    let node = client_over(stub.clone());

    let resp = node
        .spontaneous_send(
            &SpontaneousSendRequest {
                counterparty_node_id: "02ab".into(),
                amount_msat: 1_000,
                custom_tlvs: vec![],
            },
            &RequestOptions::new(),
        )
        .await
        .expect("sent");
    assert_eq!(resp.payment_id, "cd");

    let body = numeric::decode(stub.last().body.as_deref().expect("body")).expect("json");
    assert_eq!(body.get("custom_tlvs").and_then(|v| v.as_array()), Some(&[][..]));
}

#[tokio::test]
async fn test_balances_beyond_safe_range() {
    let node = client_over(routed());

    let b = node.balances(&RequestOptions::new()).await.expect("balances");
    assert_eq!(b.total_lightning_balance_sats, Int::from(u64::MAX));
    assert_eq!(b.total_onchain_balance_sats, 21u64);
}

#[tokio::test]
async fn test_payment_lookup_keeps_large_amount() {
    let node = client_over(routed());

    let p = node.payment("ab", &RequestOptions::new()).await.expect("ok").expect("known");
    assert_eq!(p.direction, PaymentDirection::Inbound);
    assert_eq!(p.status, PaymentStatus::Succeeded);
    assert_eq!(p.amount_msat.expect("amount").to_string(), "9223372036854770000");
}

#[tokio::test]
async fn test_payment_id_is_percent_encoded() {
    let stub = routed();
    let node = client_over(stub.clone());
    let opts = RequestOptions::new();

    node.payment(" a/b c ", &opts).await.expect("ok");
    assert_eq!(stub.last().url, format!("{}/payment/a%2Fb%20c", common::BASE));

    let waited = node
        .payment_wait("ab", &PaymentWaitRequest { timeout_secs: Some(5) }, &opts)
        .await
        .expect("wait");
    assert!(waited.ok);
    assert_eq!(stub.last().url, format!("{}/payment/ab/wait", common::BASE));
    assert_eq!(stub.last().method, Method::Post);
}

#[tokio::test]
async fn test_blank_payment_id_rejected_without_io() {
    let stub = routed();
    let node = client_over(stub.clone());
    let opts = RequestOptions::new();

    assert!(matches!(node.payment("", &opts).await, Err(Error::InvalidArgument(_))));
    assert!(matches!(node.payment_abandon("  ", &opts).await, Err(Error::InvalidArgument(_))));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_readyz_not_ready() {
    let stub = StubTransport::fixed(
        503,
        r#"{"ok":false,"checks":[{"name":"chain_sync","ok":false,"hint":"wait for sync"}]}"#,
    );
    let node = client_over(stub);

    let ready = node.readyz(&RequestOptions::new()).await.expect("503 is not an error");
    assert!(!ready.ok);
    assert_eq!(ready.checks.len(), 1);
    assert_eq!(ready.checks[0].name, "chain_sync");
    assert_eq!(ready.checks[0].hint.as_deref(), Some("wait for sync"));
}

#[tokio::test]
async fn test_readyz_other_failures_surface() {
    let node = client_over(StubTransport::fixed(503, "starting"));
    let err = node.readyz(&RequestOptions::new()).await.expect_err("text body");
    assert_eq!(err.status(), Some(503));

    let node = client_over(StubTransport::fixed(500, r#"{"ok":false}"#));
    let err = node.readyz(&RequestOptions::new()).await.expect_err("500");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_version_is_free_form() {
    let node = client_over(routed());

    let v = node.version(&RequestOptions::new()).await.expect("version");
    assert_eq!(v.get("version").and_then(|v| v.as_str()), Some("0.4.2"));
    let minor = v.get("api").and_then(|a| a.get("minor")).and_then(|m| m.as_int()).expect("int");
    assert_eq!(minor.to_string(), "9007199254740993");
}

#[tokio::test]
async fn test_shape_mismatch_names_the_path() {
    let node = client_over(StubTransport::fixed(200, r#"{"is_running":"yes"}"#));

    match node.status(&RequestOptions::new()).await {
        Err(Error::Shape { path, .. }) => assert_eq!(path, "/status"),
        other => panic!("unexpected {:?}", other),
    }
}
