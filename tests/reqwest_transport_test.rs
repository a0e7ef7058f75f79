use resource_store::config::ModuleConfig;
use resource_store::http::ReqwestTransport;
use resource_store::{NewResource, PathSegments, ResourceError, ResourceModule, Status};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn module(server: &MockServer, resource_name: &str) -> ResourceModule {
    ResourceModule::with_transport(
        ModuleConfig::new(resource_name, server.uri()),
        Arc::new(ReqwestTransport::new()),
    )
}

#[tokio::test]
async fn test_fetch_and_update_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [{ "id": 1, "title": "hello" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/7/posts/1"))
        .and(body_json(json!({ "id": 1, "title": "renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "title": "renamed",
            "updatedAt": "2024-01-01"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = module(&server, "posts");
    posts
        .fetch_resources(&PathSegments::new().with("user", 7))
        .await;
    assert_eq!(posts.status(), Status::Success);

    let mut post = posts.all().remove(0);
    post.set("title", json!("renamed"))
        .await
        .expect("Failed to set attribute");
    post.save().await;

    assert!(!posts.has_error());
    assert_eq!(
        posts.denormalized(),
        vec![json!({ "id": 1, "title": "renamed", "updatedAt": "2024-01-01" })]
    );
    posts.shutdown().await;
}

#[tokio::test]
async fn test_create_posts_to_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tags/"))
        .and(body_json(json!({ "name": "rust" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 3, "name": "rust" })))
        .expect(1)
        .mount(&server)
        .await;

    let tags = module(&server, "tags");
    let mut tag = tags
        .new_resource(NewResource::default().with_attributes(json!({ "name": "rust" })))
        .await
        .expect("Failed to add resource");
    tag.save().await;

    assert_eq!(tags.status(), Status::Success);
    assert_eq!(tag.external_id().as_deref(), Some("3"));
    tags.shutdown().await;
}

#[tokio::test]
async fn test_error_status_keeps_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    let posts = module(&server, "posts");
    posts.fetch_resources(&PathSegments::new()).await;

    assert_eq!(posts.status(), Status::Error);
    assert_eq!(
        posts.error(),
        Some(ResourceError::Status {
            status: 404,
            body: json!({ "error": "not found" })
        })
    );
    posts.shutdown().await;
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let posts = module(&server, "posts");
    posts.fetch_resources(&PathSegments::new()).await;

    assert_eq!(
        posts.error(),
        Some(ResourceError::Status {
            status: 502,
            body: json!("Bad Gateway")
        })
    );
    posts.shutdown().await;
}

#[tokio::test]
async fn test_delete_with_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [{ "id": 5 }, { "id": 6 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/posts/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let posts = module(&server, "posts");
    posts.fetch_resources(&PathSegments::new()).await;
    let mut first = posts.all().remove(0);
    first.delete().await;

    assert_eq!(posts.status(), Status::Success);
    assert_eq!(posts.denormalized(), vec![json!({ "id": 6 })]);
    posts.shutdown().await;
}
