//! Response statuses: notices, message keys, localization, HTTP mapping

use crate::prelude::*;
use serde_json::json;
use similar_asserts::assert_eq;
use teller_core::localize::GENERIC_FATAL_MESSAGE;
use teller_core::ResponseStatus;

#[test]
fn notices_accompany_the_successful_body() {
    let fixture = engine();
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "deposit",
        &[("account", json!("bob")), ("amount", json!(10))],
    ));
    assert!(response.is_success());
    assert_eq!(response.notices.len(), 1);
    assert_eq!(response.notices[0].code(), fixture.codes.deposit_recorded);
    assert_eq!(
        response.notices[0].message_key().as_deref(),
        Some("INF-101")
    );
    assert_eq!(
        response.notices[0].params(),
        ["bob".to_string(), "10".to_string()]
    );
}

#[test]
fn warnings_join_the_notice_list() {
    let fixture = engine();
    // bob: 50 - 40 = 10 < 25 after a negative deposit
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "deposit",
        &[("account", json!("bob")), ("amount", json!(-40))],
    ));
    assert!(response.is_success());
    let codes: Vec<u32> = response
        .notices
        .iter()
        .map(|notice| notice.code().value())
        .collect();
    assert_eq!(codes, vec![101, 10_101]);
}

#[test]
fn faults_drop_accumulated_notices() {
    let fixture = engine();
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "transfer",
        &[
            ("from", json!("bob")),
            ("to", json!("alice")),
            ("amount", json!(500)),
        ],
    ));
    assert!(response.status.is_fault());
    assert!(response.notices.is_empty());
}

#[test]
fn fault_messages_localize_with_positional_params() {
    let fixture = engine();
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "transfer",
        &[
            ("from", json!("bob")),
            ("to", json!("alice")),
            ("amount", json!(500)),
        ],
    ));
    assert_eq!(
        response.status.message_key().as_deref(),
        Some("ERR-20701")
    );
    assert_eq!(
        response.message.as_deref(),
        Some("insufficient funds: account bob has 50")
    );
}

#[test]
fn fatal_faults_use_the_generic_message() {
    let fixture = engine();
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "smuggle",
        &[("account", json!("alice"))],
    ));
    assert_eq!(response.message.as_deref(), Some(GENERIC_FATAL_MESSAGE));
    assert_eq!(response.status.message_key().as_deref(), Some("99999"));
}

#[test]
fn fault_extra_payload_reaches_the_response() {
    let fixture = engine();
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "close",
        &[("account", json!("alice"))],
    ));
    match &response.status {
        ResponseStatus::Fault(fault) => {
            assert_eq!(
                fault.extra(),
                Some(&json!({ "account": "alice", "retry_after": 86400 }))
            );
            assert!(fault.is_handled());
        }
        other => panic!("expected fault, got {:?}", other),
    }
}

#[test]
fn toml_catalogs_localize_from_disk() {
    let fixture = engine();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.toml");
    std::fs::write(
        &path,
        "[messages]\n\"ERR-20701\" = \"no funds left on {0}\"\n",
    )
    .unwrap();
    let catalog = teller_adapters::TomlCatalog::load(&path).unwrap();

    let status = ResponseStatus::Fault(
        teller_core::Fault::new(fixture.codes.insufficient_funds)
            .unwrap()
            .with_param("alice"),
    );
    assert_eq!(
        teller_core::localize::render(&catalog, &status).as_deref(),
        Some("no funds left on alice")
    );
}

#[test]
fn builtin_faults_map_to_their_http_statuses() {
    let fixture = engine();
    let forbidden = fixture.dispatcher.dispatch(call("system", "admin", &[]));
    assert_eq!(forbidden.http_status, 403);

    let unauthenticated = fixture.dispatcher.dispatch(call("system", "login", &[]));
    assert_eq!(unauthenticated.http_status, 401);

    let missing = fixture.dispatcher.dispatch(call(
        "account",
        "balance",
        &[("account", json!("nobody"))],
    ));
    assert_eq!(missing.http_status, 404);

    let unknown = fixture.dispatcher.dispatch(call("warehouse", "pick", &[]));
    assert_eq!(unknown.http_status, 501);
}

#[test]
fn fault_statuses_serialize_for_the_response_body() {
    let fixture = engine();
    let response = fixture.dispatcher.dispatch(call(
        "account",
        "transfer",
        &[
            ("from", json!("bob")),
            ("to", json!("alice")),
            ("amount", json!(500)),
        ],
    ));
    let serialized = serde_json::to_value(&response.status).unwrap();
    assert_eq!(serialized["kind"], json!("fault"));
    assert_eq!(serialized["code"]["value"], json!(20_701));
    assert_eq!(serialized["code"]["severity"], json!("error"));
    assert_eq!(serialized["params"], json!(["bob", "50"]));
}
