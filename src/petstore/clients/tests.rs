//! HTTP-level tests for the client wrappers.

use std::time::Duration;

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::ApiClients;
use crate::petstore::{ApiError, ContextSettings, HttpContext, Order, OrderStatus, Pet, PetStatus, User};

fn open_context(server: &MockServer, timeout: Duration) -> HttpContext {
    let settings = ContextSettings::new(&format!("{}/v2", server.uri()), timeout)
        .expect("mock server URI should parse");
    HttpContext::open(&settings).expect("context should open")
}

#[tokio::test]
async fn create_pet_posts_json_with_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/pet"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({
            "name": "Doggo_1",
            "photoUrls": ["string"],
            "status": "available"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 101,
            "name": "Doggo_1",
            "photoUrls": ["string"],
            "status": "available"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_secs(5));
    let clients = ApiClients::new(&context);

    let pet = Pet::named("Doggo_1", PetStatus::Available).with_photo_urls(["string"]);
    let mut response = clients.pets.create(&pet).await.expect("request should complete");

    assert_eq!(response.status(), 200);
    let created: Pet = response.json().await.expect("pet should decode");
    assert_eq!(created.id, Some(101));
}

#[rstest]
#[case::available(PetStatus::Available)]
#[case::sold(PetStatus::Sold)]
#[tokio::test]
async fn find_by_status_sends_query_parameter(#[case] status: PetStatus) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/findByStatus"))
        .and(query_param("status", status.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_secs(5));

    let response = ApiClients::new(&context)
        .pets
        .find_by_status(status)
        .await
        .expect("request should complete");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn login_sends_credentials_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user/login"))
        .and(query_param("username", "user_1"))
        .and(query_param("password", "password123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "type": "unknown",
            "message": "logged in user session:1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_secs(5));

    let response = ApiClients::new(&context)
        .users
        .login("user_1", "password123")
        .await
        .expect("request should complete");

    let captured = response.capture().await.expect("body should be readable");
    assert!(captured.text().contains("logged in user session"));
}

#[tokio::test]
async fn update_user_puts_to_username_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v2/user/jane_1"))
        .and(body_json(json!({"username": "jane_1", "firstName": "Robert"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_secs(5));
    let user = User {
        username: "jane_1".to_owned(),
        first_name: Some("Robert".to_owned()),
        ..User::default()
    };

    let response = ApiClients::new(&context)
        .users
        .update("jane_1", &user)
        .await
        .expect("request should complete");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn place_order_posts_to_store_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/store/order"))
        .and(body_json(json!({
            "id": 4,
            "petId": 77,
            "quantity": 1,
            "status": "placed",
            "complete": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "petId": 77})))
        .expect(1)
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_secs(5));
    let order = Order {
        id: Some(4),
        pet_id: 77,
        quantity: Some(1),
        status: Some(OrderStatus::Placed),
        complete: Some(false),
        ship_date: None,
    };

    let response = ApiClients::new(&context)
        .store
        .place_order(&order)
        .await
        .expect("request should complete");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/store/order/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "type": "unknown",
            "message": "Order Not Found"
        })))
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_secs(5));

    let response = ApiClients::new(&context)
        .store
        .delete_order(9)
        .await
        .expect("a 404 is still a response");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn slow_responses_surface_as_timeouts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/store/inventory"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"available": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let context = open_context(&server, Duration::from_millis(50));

    let error = ApiClients::new(&context)
        .store
        .inventory()
        .await
        .expect_err("request should time out");

    assert!(error.is_timeout(), "expected timeout, got {error:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("port should bind");
    let port = listener.local_addr().expect("listener address").port();
    drop(listener);
    let base = format!("http://127.0.0.1:{port}/v2");
    let settings =
        ContextSettings::new(&base, Duration::from_secs(2)).expect("base URL should parse");
    let context = HttpContext::open(&settings).expect("context should open");

    let error = ApiClients::new(&context)
        .users
        .logout()
        .await
        .expect_err("connection should be refused");

    assert!(matches!(error, ApiError::Network { .. }), "got {error:?}");
}
