use serde_json::json;
use service_customer::models::{Customer, Region};
use service_customer::routes;
use service_customer::service::CustomerService;
use shopkit_core::{ErrorMessage, InMemoryRepository};
use shopkit_test::TestApp;

fn app() -> TestApp {
    TestApp::new(routes::router(CustomerService::new(
        InMemoryRepository::new(),
    )))
}

fn customer_payload(number_id: &str, region_id: u64) -> serde_json::Value {
    json!({
        "numberId": number_id,
        "firstName": "Alice",
        "lastName": "Smith",
        "email": "alice@example.com",
        "regionId": region_id,
    })
}

#[tokio::test]
async fn listing_empty_store_without_filter_is_no_content() {
    let app = app();
    app.get("/customers").send().await.assert_no_content();
}

#[tokio::test]
async fn listing_without_filter_returns_all_customers() {
    let app = app();
    app.post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created();
    app.post("/customers")
        .json(&customer_payload("C-2", 2))
        .send()
        .await
        .assert_created();

    let customers: Vec<Customer> = app.get("/customers").send().await.assert_ok().json();
    assert_eq!(customers.len(), 2);
}

#[tokio::test]
async fn listing_with_unmatched_region_is_not_found() {
    let app = app();
    app.post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created();

    app.get("/customers?regionId=99")
        .send()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn listing_filters_by_region() {
    let app = app();
    app.post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created();
    app.post("/customers")
        .json(&customer_payload("C-2", 2))
        .send()
        .await
        .assert_created();

    let customers: Vec<Customer> = app
        .get("/customers?regionId=2")
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].number_id, "C-2");
}

#[tokio::test]
async fn create_assigns_id_and_returns_created() {
    let app = app();
    let created: Customer = app
        .post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created()
        .json();
    assert_eq!(created.id, 1);
    assert_eq!(created.state, "CREATED");
}

#[tokio::test]
async fn create_with_missing_fields_reports_each_field() {
    let app = app();
    let error: ErrorMessage = app
        .post("/customers")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .assert_bad_request()
        .json();

    assert_eq!(error.code, "01");
    let fields: Vec<&str> = error.messages.iter().map(|m| m.field.as_str()).collect();
    assert_eq!(fields, ["numberId", "firstName", "lastName", "regionId"]);
}

#[tokio::test]
async fn create_rejects_duplicate_number_id() {
    let app = app();
    app.post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created();

    let error: ErrorMessage = app
        .post("/customers")
        .json(&customer_payload("C-1", 2))
        .send()
        .await
        .assert_bad_request()
        .json();
    assert_eq!(error.code, "01");
    assert_eq!(error.messages[0].field, "numberId");
}

#[tokio::test]
async fn update_forces_path_id_over_body_id() {
    let app = app();
    app.post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created();

    let mut payload = customer_payload("C-1", 1);
    payload["id"] = json!(99);
    payload["firstName"] = json!("Renamed");

    let updated: Customer = app
        .put("/customers/1")
        .json(&payload)
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.first_name, "Renamed");

    // No record was smuggled in under the body id.
    app.get("/customers/99").send().await.assert_not_found();
    let reread: Customer = app.get("/customers/1").send().await.assert_ok().json();
    assert_eq!(reread.first_name, "Renamed");
}

#[tokio::test]
async fn update_of_missing_customer_is_not_found() {
    let app = app();
    app.put("/customers/42")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn delete_returns_deleted_record_once() {
    let app = app();
    app.post("/customers")
        .json(&customer_payload("C-1", 1))
        .send()
        .await
        .assert_created();

    let deleted: Customer = app.delete("/customers/1").send().await.assert_ok().json();
    assert_eq!(deleted.number_id, "C-1");

    app.delete("/customers/1").send().await.assert_not_found();
    app.get("/customers/1").send().await.assert_not_found();
}

#[tokio::test]
async fn regions_are_seeded() {
    let app = app();
    let regions: Vec<Region> = app.get("/regions").send().await.assert_ok().json();
    assert_eq!(regions.len(), 4);
    assert_eq!(regions[0].name, "North");
}
