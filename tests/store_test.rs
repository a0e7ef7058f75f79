use resource_store::config::StoreConfig;
use resource_store::http::mock::MockTransport;
use resource_store::{Dispatched, DispatchError, Store};
use serde_json::json;
use std::sync::Arc;

const CONFIG: &str = r#"{
    "modules": [
        { "resourceName": "posts", "baseUrl": "http://api.test" },
        { "resourceName": "comments", "baseUrl": "http://api.test", "idField": "_id" }
    ]
}"#;

fn store(mock: &MockTransport) -> Store {
    let config = StoreConfig::from_json(CONFIG).expect("Failed to parse config");
    Store::with_transport(&config, Arc::new(mock.clone()))
}

/// Drives two namespaced modules through string dispatch only.
#[tokio::test]
async fn test_namespaced_dispatch_end_to_end() {
    let mock = MockTransport::new();
    let store = store(&mock);

    mock.expect_get("/posts/abc/comments").return_ok(json!({
        "comments": [{ "_id": "c1", "body": "hello" }]
    }));
    let fetched = store
        .dispatch("comments/fetchResources", json!({ "post": "abc" }))
        .await
        .expect("Failed to dispatch fetch");
    assert!(matches!(fetched, Dispatched::Fetched));

    assert_eq!(
        store.getter("comments/denormalized").expect("Failed to read getter"),
        json!([{ "_id": "c1", "body": "hello" }])
    );
    assert_eq!(store.getter("comments/status").expect("Failed to read getter"), json!("SUCCESS"));
    assert_eq!(store.getter("posts/all").expect("Failed to read getter"), json!([]));
    assert_eq!(store.getter("posts/status").expect("Failed to read getter"), json!("INITIAL"));

    let created = store
        .dispatch(
            "comments/newResource",
            json!({ "pathSegments": { "post": "abc" }, "attributes": { "body": "reply" } }),
        )
        .await
        .expect("Failed to dispatch newResource");
    let Dispatched::Created(mut reply) = created else {
        panic!("newResource should return the instance");
    };
    assert!(reply.is_new());

    mock.expect_post("/posts/abc/comments/")
        .return_ok(json!({ "_id": "c2", "body": "reply" }));
    reply.save().await;

    assert_eq!(
        store.getter("comments/denormalized").expect("Failed to read getter"),
        json!([
            { "_id": "c1", "body": "hello" },
            { "body": "reply", "_id": "c2" }
        ])
    );
    assert_eq!(store.getter("comments/hasError").expect("Failed to read getter"), json!(false));

    mock.verify();
    store.shutdown().await;
}

#[tokio::test]
async fn test_failed_fetch_surfaces_through_getters() {
    let mock = MockTransport::new();
    let store = store(&mock);

    mock.expect_get("/posts").return_status(503, json!("maintenance"));
    store
        .dispatch("posts/fetchResources", json!(null))
        .await
        .expect("Failed to dispatch fetch");

    assert_eq!(store.getter("posts/hasError").expect("Failed to read getter"), json!(true));
    assert_eq!(store.getter("posts/loading").expect("Failed to read getter"), json!(false));
    assert_eq!(store.getter("posts/status").expect("Failed to read getter"), json!("ERROR"));
    assert_eq!(
        store.getter("posts/error").expect("Failed to read getter"),
        json!("HTTP 503: \"maintenance\"")
    );
    // other modules are untouched
    assert_eq!(store.getter("comments/hasError").expect("Failed to read getter"), json!(false));

    mock.verify();
    store.shutdown().await;
}

#[tokio::test]
async fn test_typed_access_matches_dispatch() {
    let mock = MockTransport::new();
    let store = store(&mock);

    store
        .dispatch("posts/newResource", json!({ "attributes": { "title": "x" } }))
        .await
        .expect("Failed to dispatch newResource");

    let posts = store.module("posts").expect("Module not registered");
    assert_eq!(posts.all().len(), 1);
    assert_eq!(posts.config().id_field, "id");
    assert_eq!(store.module("comments").map(|m| m.config().id_field.as_str()), Some("_id"));

    store.shutdown().await;
}

#[tokio::test]
async fn test_invalid_fetch_payload() {
    let mock = MockTransport::new();
    let store = store(&mock);

    let result = store
        .dispatch("posts/fetchResources", json!({ "user": { "nested": true } }))
        .await;
    assert!(matches!(result, Err(DispatchError::InvalidPayload { .. })));
    assert!(mock.requests().is_empty());

    store.shutdown().await;
}
