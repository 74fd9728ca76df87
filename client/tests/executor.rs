//! Executor behavior observed through stub transports.

mod common;

use std::time::{Duration, Instant};

use api::http::{CustomTlvDto, SpontaneousSendRequest};
use client::{CancellationToken, Error, ErrorBody, NodeClient, NotFound, RequestOptions};
use common::{client_over, PendingTransport, StubTransport, BASE};
use numeric::{Int, MAX_SAFE_INTEGER};
use transport::{DynTransport, Method, TransportError};

#[tokio::test]
async fn test_out_of_range_body_sends_nothing() {
    let stub = StubTransport::fixed(200, r#"{"payment_id":"ab"}"#);
    let node = client_over(stub.clone());

    let req = SpontaneousSendRequest {
        counterparty_node_id: "02ab".into(),
        amount_msat: MAX_SAFE_INTEGER + 1,
        custom_tlvs: vec![],
    };
    let err = node.spontaneous_send(&req, &RequestOptions::new()).await.expect_err("out of range");

    match err {
        Error::EncodingRange(e) => assert_eq!(e.path, "$.amount_msat"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_out_of_range_nested_tlv_type() {
    let stub = StubTransport::fixed(200, r#"{"payment_id":"ab"}"#);
    let node = client_over(stub.clone());

    let req = SpontaneousSendRequest {
        counterparty_node_id: "02ab".into(),
        amount_msat: 1_000,
        custom_tlvs: vec![CustomTlvDto { r#type: u64::MAX, value_hex: "00".into() }],
    };
    let err = node.spontaneous_send(&req, &RequestOptions::new()).await.expect_err("out of range");

    assert!(matches!(err, Error::EncodingRange(ref e) if e.path == "$.custom_tlvs[0].type"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_timeout_aborts_pending_io() {
    let pending = PendingTransport::new();
    let node = client_over(pending.clone());

    let started = Instant::now();
    let err = node
        .status(&RequestOptions::new().with_timeout(Duration::from_millis(50)))
        .await
        .expect_err("never resolves");
    let elapsed = started.elapsed();

    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "Request aborted");
    assert!(elapsed >= Duration::from_millis(45), "fired early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(200), "fired late: {:?}", elapsed);
    assert_eq!(pending.calls(), 1);
    assert!(pending.was_dropped(), "in-flight request must be dropped");
}

#[tokio::test]
async fn test_precancelled_token_skips_transport() {
    let stub = StubTransport::fixed(200, "{}");
    let node = client_over(stub.clone());
    let token = CancellationToken::new();
    token.cancel();

    let err = node
        .healthz(&RequestOptions::new().with_cancel(token))
        .await
        .expect_err("already cancelled");

    assert!(err.is_cancelled());
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_cancel_mid_flight() {
    let pending = PendingTransport::new();
    let node = client_over(pending.clone());
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = node
        .events_wait_next(&RequestOptions::new().with_cancel(token))
        .await
        .expect_err("cancelled");

    assert!(err.is_cancelled());
    assert!(pending.was_dropped());
}

#[tokio::test]
async fn test_zero_timeout_means_no_timer() {
    let stub = StubTransport::fixed(200, r#"{"ok":true}"#);
    let node = client_over(stub.clone());

    let ok = node
        .healthz(&RequestOptions::new().with_timeout(Duration::ZERO))
        .await
        .expect("no timer armed");
    assert!(ok.ok);
}

#[tokio::test]
async fn test_404_absent_versus_error() {
    let stub = StubTransport::fixed(404, "");
    let node = client_over(stub.clone());
    let opts = RequestOptions::new();

    assert_eq!(node.payment("ab", &opts).await.expect("absent"), None);

    let value = node
        .executor()
        .execute(Method::Get, "/payment/ab", None::<&()>, &opts, NotFound::Absent)
        .await
        .expect("absent");
    assert_eq!(value, None);

    let err = node
        .executor()
        .execute(Method::Get, "/payment/ab", None::<&()>, &opts, NotFound::Error)
        .await
        .expect_err("plain 404");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "HTTP 404");
}

#[tokio::test]
async fn test_error_field_becomes_message() {
    let stub = StubTransport::fixed(400, r#"{"error": "insufficient balance"}"#);
    let node = client_over(stub);

    let err = node.wallet_new_address(&RequestOptions::new()).await.expect_err("400");
    match err {
        Error::Http(e) => {
            assert_eq!(e.message, "insufficient balance");
            assert_eq!(e.status, Some(400));
            let body = e.body.json().expect("json body");
            assert_eq!(body.get("error").and_then(|v| v.as_str()), Some("insufficient balance"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_network_failure_has_no_status() {
    let stub = StubTransport::new(|_| Err(TransportError::Connect("connection refused".into())));
    let node = client_over(stub);

    let err = node.status(&RequestOptions::new()).await.expect_err("network");
    match err {
        Error::Http(e) => {
            assert_eq!(e.status, None);
            assert_eq!(e.message, "connection refused");
            assert_eq!(e.body, ErrorBody::Text("connection refused".into()));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_large_amount_decodes_exactly() {
    let stub = StubTransport::fixed(
        200,
        r#"{"payment_id":null,"amount_msat":9223372036854770000}"#,
    );
    let node = client_over(stub);

    let value = node
        .executor()
        .execute(
            Method::Post,
            "/events/wait_next",
            Some(&()),
            &RequestOptions::new(),
            NotFound::Error,
        )
        .await
        .expect("ok")
        .expect("value");
    let amount = value.get("amount_msat").and_then(|v| v.as_int()).expect("int");

    assert_eq!(*amount, Int::from(9_223_372_036_854_770_000u64));
    assert!(!amount.is_safe());
    assert_eq!(amount.to_string(), "9223372036854770000");
}

#[tokio::test]
async fn test_empty_success_body_is_empty_object() {
    let stub = StubTransport::fixed(200, "");
    let node = client_over(stub);

    let value = node
        .executor()
        .execute(Method::Get, "/version", None::<&()>, &RequestOptions::new(), NotFound::Error)
        .await
        .expect("ok");
    assert_eq!(value, Some(numeric::Value::empty_object()));
}

#[tokio::test]
async fn test_header_merge_order() {
    let stub = StubTransport::fixed(200, r#"{"ok":true}"#);
    let mut config = client::ClientConfig::new(BASE);
    config.default_headers.insert("X-Api-Key".into(), "default".into());
    config.default_headers.insert("Content-Type".into(), "application/json; charset=utf-8".into());
    config.user_agent = Some("tests/1".into());
    let node = NodeClient::from_config(config, Some(stub.clone() as DynTransport)).expect("valid");

    node.healthz(&RequestOptions::new().with_header("x-api-key", "override"))
        .await
        .expect("ok");

    let req = stub.last();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.url, "http://node.test/api/v1/healthz");
    assert_eq!(req.headers["x-api-key"], "override");
    assert_eq!(req.headers["content-type"], "application/json; charset=utf-8");
    assert_eq!(req.headers["user-agent"], "tests/1");
    assert!(req.body.is_none());
}
