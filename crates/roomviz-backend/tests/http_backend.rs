// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-level tests of the visualizer endpoints against a mock server.

use roomviz_backend::HttpBackend;
use roomviz_config::model::BackendConfig;
use roomviz_core::{
    LookupOutcome, PhotoUpload, ProductId, ProductQuery, RoomvizError, SessionToken,
    StoreSelector, VisualizerBackend,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    let config = BackendConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    HttpBackend::new(&config, &SessionToken("sess-abc".into())).unwrap()
}

fn upload() -> PhotoUpload {
    PhotoUpload {
        file_name: "room.jpg".into(),
        mime_type: "image/jpeg".into(),
        bytes: vec![0xff, 0xd8, 0xff],
        product_category: "Flooring".into(),
    }
}

#[tokio::test]
async fn upload_returns_photo_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploadImage"))
        .and(header("sessionId", "sess-abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"publicUrl": "https://cdn/room.jpg", "gsUrl": "gs://b/room.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = backend(&server).upload_image(upload()).await.unwrap();
    assert_eq!(handle.public_url, "https://cdn/room.jpg");
    assert_eq!(handle.gs_url, "gs://b/room.jpg");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("name=\"productCategory\""));
    assert!(body.contains("Flooring"));
    assert!(body.contains("name=\"page\""));
}

#[tokio::test]
async fn upload_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploadImage"))
        .respond_with(ResponseTemplate::new(413).set_body_string("too big"))
        .mount(&server)
        .await;

    let err = backend(&server).upload_image(upload()).await.unwrap_err();
    assert_eq!(err.http_status(), Some(413));
}

#[tokio::test]
async fn list_products_sends_store_and_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getProductList"))
        .and(query_param("store", "Waltham"))
        .and(query_param("company", "Lowes"))
        .and(query_param("category", "Flooring"))
        .and(query_param("page", "1"))
        .and(header("sessionId", "sess-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "product_id": "p1",
                "size": "6x36",
                "image_public_url": "https://cdn/p1.jpg",
                "image_gs_url": "gs://b/p1.jpg",
                "description": "Oak"
            },
            {
                "product_id": "p2",
                "size": "6x36",
                "image_public_url": "https://cdn/p2.jpg",
                "image_gs_url": "gs://b/p2.jpg",
                "description": null
            }
        ])))
        .mount(&server)
        .await;

    let store = StoreSelector::Named {
        store: "Waltham".into(),
        company: "Lowes".into(),
    };
    let query = ProductQuery::category("Flooring", None).with_page(1);
    let products = backend(&server).list_products(&store, &query).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].display_name(), "Oak");
    assert_eq!(products[1].product_id, ProductId::from("p2"));
}

#[tokio::test]
async fn list_products_failure_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getProductList"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = backend(&server)
        .list_products(&StoreSelector::Id("s1".into()), &ProductQuery::search("oak"))
        .await
        .unwrap_err();
    assert!(matches!(err, RoomvizError::Backend { status: Some(500), .. }));
}

#[tokio::test]
async fn trigger_posts_photo_and_product_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/imageGenerationByProductId"))
        .and(query_param("storeId", "store-1"))
        .and(body_json(json!({"customerImageGsUrl": "gs://b/room.jpg", "productIds": ["p1"]})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server)
        .trigger_generation("store-1", "gs://b/room.jpg", &[ProductId::from("p1")])
        .await
        .unwrap();
}

#[tokio::test]
async fn lookup_maps_404_to_not_ready_and_200_to_ready() {
    let server = MockServer::start().await;
    let body = json!({"customerImageGSUrl": "gs://b/room.jpg", "productImageGSUrl": "gs://b/p1.jpg"});
    Mock::given(method("POST"))
        .and(path("/getGeneratedImageUrl"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/getGeneratedImageUrl"))
        .and(body_json(body))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"publicUrl": "https://cdn/composite.jpg"})),
        )
        .mount(&server)
        .await;

    let backend = backend(&server);
    let first = backend
        .generated_image_url("gs://b/room.jpg", "gs://b/p1.jpg")
        .await
        .unwrap();
    assert_eq!(first, LookupOutcome::NotReady { status: 404 });

    let second = backend
        .generated_image_url("gs://b/room.jpg", "gs://b/p1.jpg")
        .await
        .unwrap();
    assert_eq!(
        second,
        LookupOutcome::Ready {
            public_url: "https://cdn/composite.jpg".into()
        }
    );
}

#[tokio::test]
async fn lookup_with_malformed_payload_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getGeneratedImageUrl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = backend(&server).generated_image_url("gs://r", "gs://p").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let config = BackendConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout_secs: 2,
    };
    let backend = HttpBackend::new(&config, &SessionToken("s".into())).unwrap();
    let err = backend.generated_image_url("gs://r", "gs://p").await.unwrap_err();
    assert!(matches!(err, RoomvizError::Backend { status: None, .. }));
}
