use serde_json::json;
use skatesync::models::{EntityKind, RemoteId};
use skatesync::remote::{HttpRemoteClient, RemoteError, RemoteService};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{event, spot};

fn client(server: &MockServer, token: Option<&str>) -> HttpRemoteClient {
    HttpRemoteClient::new(
        &server.uri(),
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_create_posts_to_collection_and_returns_server_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spots/"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_partial_json(json!({
            "name": "Bowl di Lambrate",
            "spot_type": "plaza",
            "features": ["ledges", "rails"],
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": 42, "name": "Bowl di Lambrate" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server, Some("secret-token"))
        .create(EntityKind::Spot, &spot("Bowl di Lambrate"))
        .await
        .unwrap();
    assert_eq!(id, RemoteId::new(42));
}

#[tokio::test]
async fn test_event_payload_goes_to_events() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events/"))
        .and(body_partial_json(json!({
            "title": "Go Skate Day",
            "event_type": "session",
            "shop_id": 7,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server, None)
        .create(EntityKind::Event, &event("Go Skate Day"))
        .await
        .unwrap();
    assert_eq!(id.get(), 5);
}

#[tokio::test]
async fn test_client_errors_are_rejections_with_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spots/"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "detail": "Spot name already exists" })),
        )
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create(EntityKind::Spot, &spot("Dup"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Rejected {
            status: 422,
            message: "Spot name already exists".into(),
        }
    );
}

#[tokio::test]
async fn test_server_errors_and_throttling_are_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spots/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/events/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let c = client(&server, None);
    let err = c.create(EntityKind::Spot, &spot("Later")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transient(ref m) if m.contains("500")));

    let err = c.create(EntityKind::Event, &event("Later")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transient(ref m) if m.contains("429")));
}

#[tokio::test]
async fn test_unreachable_server_is_transient() {
    // Nothing listens on the discard port.
    let c = HttpRemoteClient::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
    let err = c.create(EntityKind::Spot, &spot("Nowhere")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transient(_)));
}

#[tokio::test]
async fn test_fetch_recent_passes_limit_and_parses_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spots/"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 11, "name": "Piazza Leonardo" },
            { "id": 12, "name": "Skatepark Forlanini", "difficulty_level": 2 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server, None)
        .fetch_recent(EntityKind::Spot, 2)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RemoteId::new(11));
    assert_eq!(records[1].data["difficulty_level"], 2);
}

#[tokio::test]
async fn test_fetch_recent_rejects_unexpected_shapes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spots/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "no id" }])))
        .mount(&server)
        .await;

    let c = client(&server, None);
    assert!(matches!(
        c.fetch_recent(EntityKind::Event, 10).await.unwrap_err(),
        RemoteError::Malformed(_)
    ));
    assert!(matches!(
        c.fetch_recent(EntityKind::Spot, 10).await.unwrap_err(),
        RemoteError::Malformed(_)
    ));
}
