//! Projection tests — mapping bound records to the public request view.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use whence::model::{EndpointDesc, PathSegment, RequestKind, RequestRecord};
use whence::runtime::{process_start, store};
use whence::{TriggerType, current_request};

fn bind_record(record: RequestRecord) -> store::BindGuard {
    store::bind(Arc::new(record))
}

// ─────────────────────────────────────────────────────────────────────────
// Default view
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn unbound_unit_gets_the_default_view() {
    let req = current_request();

    assert_eq!(req.trigger, TriggerType::None);
    assert_eq!(req.started, process_start());
    assert!(req.service.is_empty());
    assert!(req.endpoint.is_empty());
    assert!(req.path.is_empty());
    assert!(req.path_params.is_empty());
    assert!(req.api.is_none());
    assert!(req.payload.is_none());
}

// ─────────────────────────────────────────────────────────────────────────
// Trigger classification
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn rpc_call_projects_as_api_call() {
    let _guard = bind_record(RequestRecord::new(RequestKind::RpcCall, "blog", "GetPost"));
    assert_eq!(current_request().trigger, TriggerType::ApiCall);
}

#[test]
fn auth_handler_projects_as_api_call() {
    let _guard = bind_record(RequestRecord::new(RequestKind::AuthHandler, "auth", "Check"));
    assert_eq!(current_request().trigger, TriggerType::ApiCall);
}

#[test]
fn pubsub_message_projects_as_pubsub() {
    let _guard = bind_record(RequestRecord::new(
        RequestKind::PubSubMessage,
        "email",
        "on-signup",
    ));
    assert_eq!(current_request().trigger, TriggerType::PubSubMessage);
}

#[test]
fn untriggered_kind_projects_as_none() {
    let _guard = bind_record(RequestRecord::new(RequestKind::None, "jobs", "sweeper"));
    assert_eq!(current_request().trigger, TriggerType::None);
}

// ─────────────────────────────────────────────────────────────────────────
// Field projection
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn scalar_fields_are_copied_verbatim() {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let _guard = bind_record(
        RequestRecord::new(RequestKind::RpcCall, "blog", "GetPost")
            .with_start(start)
            .with_path("/blog/hello-world"),
    );

    let req = current_request();
    assert_eq!(req.service, "blog");
    assert_eq!(req.endpoint, "GetPost");
    assert_eq!(req.path, "/blog/hello-world");
    assert_eq!(req.started, start);
}

#[test]
fn path_params_preserve_order_and_duplicates() {
    let _guard = bind_record(
        RequestRecord::new(RequestKind::RpcCall, "files", "Get").with_path_segments(vec![
            PathSegment::new("dir", "a"),
            PathSegment::new("dir", "b"),
            PathSegment::new("name", "c"),
        ]),
    );

    let params = current_request().path_params;
    assert_eq!(params.len(), 3);
    let pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();
    assert_eq!(pairs, [("dir", "a"), ("dir", "b"), ("name", "c")]);

    // First match wins; absence is "".
    assert_eq!(params.get("dir"), "a");
    assert_eq!(params.get("name"), "c");
    assert_eq!(params.get("missing"), "");
}

#[test]
fn endpoint_descriptor_presence_carries_over() {
    let _guard = bind_record(
        RequestRecord::new(RequestKind::RpcCall, "blog", "GetPost")
            .with_endpoint_desc(EndpointDesc::new(Some("GetPostParams"), Some("Post"))),
    );

    let api = current_request().api.expect("descriptor should project");
    assert_eq!(api.request_type, Some("GetPostParams"));
    assert_eq!(api.response_type, Some("Post"));
    assert!(!api.raw);
}

#[test]
fn raw_flag_propagates_to_the_view() {
    let _guard = bind_record(
        RequestRecord::new(RequestKind::RpcCall, "blog", "Assets")
            .with_endpoint_desc(EndpointDesc::raw_endpoint()),
    );

    let api = current_request().api.expect("descriptor should project");
    assert!(api.raw);
    assert!(api.request_type.is_none());
    assert!(api.response_type.is_none());
}

#[test]
fn record_without_descriptor_projects_absent_api() {
    let _guard = bind_record(RequestRecord::new(RequestKind::RpcCall, "blog", "GetPost"));
    assert!(current_request().api.is_none());
}

#[test]
fn payload_is_shared_into_the_view() {
    let _guard = bind_record(
        RequestRecord::new(RequestKind::PubSubMessage, "email", "on-signup")
            .with_payload(json!({"user_id": 7})),
    );

    let payload = current_request().payload.expect("payload should project");
    assert_eq!(*payload, json!({"user_id": 7}));
}

#[test]
fn repeated_reads_return_identical_views() {
    let _guard = bind_record(
        RequestRecord::new(RequestKind::RpcCall, "blog", "GetPost").with_path("/blog/1"),
    );

    let first = current_request();
    let second = current_request();
    assert_eq!(first.trigger, second.trigger);
    assert_eq!(first.started, second.started);
    assert_eq!(first.service, second.service);
    assert_eq!(first.endpoint, second.endpoint);
    assert_eq!(first.path, second.path);
    assert_eq!(first.path_params, second.path_params);
}

// ─────────────────────────────────────────────────────────────────────────
// Wire names
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn trigger_type_serializes_to_wire_names() {
    assert_eq!(serde_json::to_value(TriggerType::None).unwrap(), json!("none"));
    assert_eq!(
        serde_json::to_value(TriggerType::ApiCall).unwrap(),
        json!("api-call")
    );
    assert_eq!(
        serde_json::to_value(TriggerType::PubSubMessage).unwrap(),
        json!("pubsub-message")
    );

    let parsed: TriggerType = serde_json::from_value(json!("api-call")).unwrap();
    assert_eq!(parsed, TriggerType::ApiCall);
}

#[test]
fn trigger_type_display_matches_as_str() {
    for trigger in [
        TriggerType::None,
        TriggerType::ApiCall,
        TriggerType::PubSubMessage,
    ] {
        assert_eq!(trigger.to_string(), trigger.as_str());
    }
}
