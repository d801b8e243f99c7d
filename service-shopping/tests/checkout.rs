use std::time::Duration;

use axum::Router;
use serde_json::json;
use service_product::service::ProductService;
use service_shopping::clients::{
    CustomerClient, StockClient, StockError, CUSTOMER_SERVICE, PRODUCT_SERVICE,
};
use service_shopping::models::{Invoice, InvoiceDetail};
use service_shopping::routes;
use service_shopping::service::ShoppingService;
use shopkit_core::{ErrorMessage, InMemoryRepository};
use shopkit_registry::RegistryClient;
use shopkit_test::TestApp;

const TIMEOUT: Duration = Duration::from_millis(500);

/// Serve a router on an ephemeral port, returning its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address that accepts connections but never answers — the shape of a
/// peer that dies mid-request.
async fn black_hole() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

struct Stack {
    registry: RegistryClient,
    products: ProductService<InMemoryRepository<service_product::models::Product>>,
    app: TestApp,
}

/// Registry + shopping service; the product service is served and registered
/// only when `with_product` is set, so resolution failures can be exercised.
async fn stack(with_product: bool) -> Stack {
    let registry_url = serve(shopkit_registry::router()).await;
    let registry = RegistryClient::new(registry_url, TIMEOUT);

    let products = ProductService::new(InMemoryRepository::new());
    if with_product {
        let product_addr = serve(service_product::routes::router(products.clone())).await;
        registry
            .register(PRODUCT_SERVICE, &product_addr)
            .await
            .unwrap();
    }

    let shopping = ShoppingService::new(
        InMemoryRepository::new(),
        StockClient::new(registry.clone(), TIMEOUT),
        CustomerClient::new(registry.clone(), TIMEOUT),
    );
    let app = TestApp::new(routes::router(shopping));

    Stack {
        registry,
        products,
        app,
    }
}

async fn seed_product(stack: &Stack, name: &str, stock: u32) -> u64 {
    let product = stack
        .products
        .create(service_product::models::Product {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            price: 25.0,
            stock,
            category_id: 1,
            state: "CREATED".to_string(),
        })
        .await
        .unwrap();
    product.id
}

fn invoice_payload(items: &[(u64, u32)]) -> serde_json::Value {
    let items: Vec<_> = items
        .iter()
        .map(|(product_id, quantity)| {
            json!({ "productId": product_id, "quantity": quantity, "price": 25.0 })
        })
        .collect();
    json!({
        "number": "INV-1",
        "description": "checkout",
        "customerId": 1,
        "items": items,
    })
}

#[tokio::test]
async fn checkout_reserves_stock_and_persists_invoice() {
    let stack = stack(true).await;
    let product_id = seed_product(&stack, "Keyboard", 10).await;

    let created: Invoice = stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(product_id, 4)]))
        .send()
        .await
        .assert_created()
        .json();
    assert_eq!(created.id, 1);

    let product = stack.products.get(product_id).await.unwrap();
    assert_eq!(product.stock, 6);
}

#[tokio::test]
async fn insufficient_stock_fails_checkout_without_persisting() {
    let stack = stack(true).await;
    let product_id = seed_product(&stack, "Keyboard", 4).await;

    let error: ErrorMessage = stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(product_id, 6)]))
        .send()
        .await
        .assert_conflict()
        .json();
    assert_eq!(error.code, "02");

    // Stock untouched, invoice never stored.
    assert_eq!(stack.products.get(product_id).await.unwrap().stock, 4);
    stack.app.get("/invoices").send().await.assert_no_content();
}

#[tokio::test]
async fn partial_failure_aborts_checkout_and_keeps_earlier_reservations() {
    let stack = stack(true).await;
    let first = seed_product(&stack, "Keyboard", 10).await;
    let second = seed_product(&stack, "Monitor", 1).await;

    stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(first, 2), (second, 5)]))
        .send()
        .await
        .assert_conflict();

    // The first item's reservation stands (reconciliation is the caller's
    // move; there is no rollback orchestration), the second was rejected,
    // and the invoice was not persisted.
    assert_eq!(stack.products.get(first).await.unwrap().stock, 8);
    assert_eq!(stack.products.get(second).await.unwrap().stock, 1);
    stack.app.get("/invoices").send().await.assert_no_content();
}

#[tokio::test]
async fn unresolvable_product_service_is_reported_as_no_instance() {
    let stack = stack(false).await;

    let resp = stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(1, 1)]))
        .send()
        .await
        .assert_unavailable();
    assert!(resp.text().contains("no instance"), "body: {}", resp.text());
}

#[tokio::test]
async fn dead_instance_is_reported_as_unreachable() {
    let stack = stack(false).await;
    // Register an address nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    stack
        .registry
        .register(PRODUCT_SERVICE, &dead_addr)
        .await
        .unwrap();

    let resp = stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(1, 1)]))
        .send()
        .await
        .assert_unavailable();
    assert!(
        resp.text().contains("unreachable"),
        "body: {}",
        resp.text()
    );
}

#[tokio::test]
async fn timed_out_adjustment_is_reported_as_ambiguous() {
    let stack = stack(false).await;
    let silent_addr = black_hole().await;
    stack
        .registry
        .register(PRODUCT_SERVICE, &silent_addr)
        .await
        .unwrap();

    let resp = stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(1, 1)]))
        .send()
        .await
        .assert_unavailable();
    assert!(
        resp.text().contains("outcome unknown"),
        "body: {}",
        resp.text()
    );
}

#[tokio::test]
async fn zero_quantity_is_rejected_before_any_resolution() {
    // The registry is empty: a resolution attempt would surface NoInstance,
    // so getting InvalidQuantity proves the guard runs before the network.
    let registry_url = serve(shopkit_registry::router()).await;
    let client = StockClient::new(RegistryClient::new(registry_url, TIMEOUT), TIMEOUT);

    let err = client.adjust_stock(1, 0).await.unwrap_err();
    assert!(matches!(err, StockError::InvalidQuantity));
}

#[tokio::test]
async fn invalid_invoice_is_rejected_before_touching_stock() {
    let stack = stack(false).await;

    let error: ErrorMessage = stack
        .app
        .post("/invoices")
        .json(&json!({}))
        .send()
        .await
        .assert_bad_request()
        .json();
    assert_eq!(error.code, "01");
    let fields: Vec<&str> = error.messages.iter().map(|m| m.field.as_str()).collect();
    assert_eq!(fields, ["number", "customerId", "items"]);
}

#[tokio::test]
async fn detail_enriches_from_peers_and_degrades_on_churn() {
    let stack = stack(true).await;
    let product_id = seed_product(&stack, "Keyboard", 10).await;

    // Serve and register a customer service with one record.
    let customers = service_customer::service::CustomerService::new(InMemoryRepository::new());
    let customer = customers
        .create(service_customer::models::Customer {
            id: 0,
            number_id: "C-1".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            photo_url: String::new(),
            region_id: 1,
            state: "CREATED".to_string(),
        })
        .await
        .unwrap();
    let customer_addr = serve(service_customer::routes::router(customers)).await;
    stack
        .registry
        .register(CUSTOMER_SERVICE, &customer_addr)
        .await
        .unwrap();

    stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(product_id, 2)]))
        .send()
        .await
        .assert_created();

    let detail: InvoiceDetail = stack.app.get("/invoices/1").send().await.assert_ok().json();
    assert_eq!(detail.customer.as_ref().unwrap().id, customer.id);
    assert_eq!(detail.items[0].product.as_ref().unwrap().name, "Keyboard");

    // Instance churn: after deregistration the next detail read re-resolves,
    // finds no customer instance, and degrades instead of failing.
    stack
        .registry
        .deregister(CUSTOMER_SERVICE, &customer_addr)
        .await
        .unwrap();

    let degraded: InvoiceDetail = stack.app.get("/invoices/1").send().await.assert_ok().json();
    assert!(degraded.customer.is_none());
    assert!(degraded.items[0].product.is_some());
}

#[tokio::test]
async fn invoice_listing_follows_partition_semantics() {
    let stack = stack(true).await;
    let product_id = seed_product(&stack, "Keyboard", 10).await;

    stack.app.get("/invoices").send().await.assert_no_content();

    stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(product_id, 1)]))
        .send()
        .await
        .assert_created();

    let invoices: Vec<Invoice> = stack
        .app
        .get("/invoices?customerId=1")
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(invoices.len(), 1);

    stack
        .app
        .get("/invoices?customerId=9")
        .send()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn update_forces_path_id_and_delete_returns_record() {
    let stack = stack(true).await;
    let product_id = seed_product(&stack, "Keyboard", 10).await;

    stack
        .app
        .post("/invoices")
        .json(&invoice_payload(&[(product_id, 1)]))
        .send()
        .await
        .assert_created();

    let mut payload = invoice_payload(&[(product_id, 1)]);
    payload["id"] = json!(50);
    payload["description"] = json!("amended");

    let updated: Invoice = stack
        .app
        .put("/invoices/1")
        .json(&payload)
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.description, "amended");

    let deleted: Invoice = stack.app.delete("/invoices/1").send().await.assert_ok().json();
    assert_eq!(deleted.id, 1);
    stack.app.get("/invoices/1").send().await.assert_not_found();
}
