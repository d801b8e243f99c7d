use serde_json::json;
use service_product::models::{Category, Product};
use service_product::routes;
use service_product::service::ProductService;
use shopkit_core::{ErrorMessage, InMemoryRepository};
use shopkit_test::TestApp;

fn app() -> TestApp {
    TestApp::new(routes::router(ProductService::new(
        InMemoryRepository::new(),
    )))
}

fn product_payload(name: &str, stock: u32, category_id: u64) -> serde_json::Value {
    json!({
        "name": name,
        "description": "",
        "price": 9.99,
        "stock": stock,
        "categoryId": category_id,
    })
}

#[tokio::test]
async fn listing_empty_catalog_is_no_content() {
    let app = app();
    app.get("/products").send().await.assert_no_content();
}

#[tokio::test]
async fn listing_with_unmatched_category_is_not_found() {
    let app = app();
    app.post("/products")
        .json(&product_payload("Keyboard", 5, 1))
        .send()
        .await
        .assert_created();

    app.get("/products?categoryId=99")
        .send()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn listing_filters_by_category() {
    let app = app();
    app.post("/products")
        .json(&product_payload("Keyboard", 5, 1))
        .send()
        .await
        .assert_created();
    app.post("/products")
        .json(&product_payload("Monitor", 3, 2))
        .send()
        .await
        .assert_created();

    let products: Vec<Product> = app
        .get("/products?categoryId=2")
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Monitor");
}

#[tokio::test]
async fn create_with_missing_fields_reports_each_field() {
    let app = app();
    let error: ErrorMessage = app
        .post("/products")
        .json(&json!({ "price": 1.0 }))
        .send()
        .await
        .assert_bad_request()
        .json();
    assert_eq!(error.code, "01");
    let fields: Vec<&str> = error.messages.iter().map(|m| m.field.as_str()).collect();
    assert_eq!(fields, ["name", "categoryId"]);
}

#[tokio::test]
async fn update_forces_path_id_over_body_id() {
    let app = app();
    app.post("/products")
        .json(&product_payload("Keyboard", 5, 1))
        .send()
        .await
        .assert_created();

    let mut payload = product_payload("Keyboard", 5, 1);
    payload["id"] = json!(77);

    let updated: Product = app
        .put("/products/1")
        .json(&payload)
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(updated.id, 1);
    app.get("/products/77").send().await.assert_not_found();
}

#[tokio::test]
async fn delete_returns_deleted_record_once() {
    let app = app();
    app.post("/products")
        .json(&product_payload("Keyboard", 5, 1))
        .send()
        .await
        .assert_created();

    let deleted: Product = app.delete("/products/1").send().await.assert_ok().json();
    assert_eq!(deleted.name, "Keyboard");
    app.delete("/products/1").send().await.assert_not_found();
}

#[tokio::test]
async fn categories_are_seeded() {
    let app = app();
    let categories: Vec<Category> = app.get("/categories").send().await.assert_ok().json();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0].name, "Books");
}
