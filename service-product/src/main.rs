use service_product::models::seed_products;
use service_product::service::ProductService;
use service_product::{routes, SERVICE_NAME};
use shopkit_core::{
    config, init_tracing, shutdown_signal, InMemoryRepository, Repository, ServiceConfig,
};
use shopkit_registry::RegistryClient;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    init_tracing();

    let config: ServiceConfig = config::load("dev").unwrap_or_else(|err| {
        warn!(%err, "No usable configuration found, using defaults");
        ServiceConfig::standalone(8002, "http://127.0.0.1:8761")
    });

    let products = InMemoryRepository::new();
    for product in seed_products() {
        products
            .insert(product)
            .await
            .expect("failed to seed product catalog");
    }
    let service = ProductService::new(products);
    let app = routes::router(service);

    let registry = RegistryClient::new(
        config.registry.url.clone(),
        config.client.timeout_duration(),
    );
    let advertise = config.advertise_address();

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind product service listener");
    info!(%addr, "Product service listening");

    // Registration is best-effort; the service keeps serving local traffic
    // when the registry is down.
    if let Err(err) = registry.register(SERVICE_NAME, &advertise).await {
        warn!(%err, "Could not register with the service registry");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("product service failed");

    if let Err(err) = registry.deregister(SERVICE_NAME, &advertise).await {
        warn!(%err, "Could not deregister from the service registry");
    }
    info!("Product service stopped");
}
