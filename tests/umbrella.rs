use nodewire::{meta, numeric, NodeClient};

#[test]
fn reexports_line_up() {
    assert_eq!(meta::API_VERSION, "v1");
    assert!(!meta::VERSION.is_empty());

    let node = NodeClient::new(nodewire::api::api_root("http://127.0.0.1:8500/")).unwrap();
    assert_eq!(node.base_url(), "http://127.0.0.1:8500/api/v1");

    let v = numeric::decode(r#"{"amount_msat":18446744073709551615}"#).unwrap();
    assert_eq!(v.to_string(), r#"{"amount_msat":18446744073709551615}"#);
}
