use service_customer::service::CustomerService;
use service_customer::{routes, SERVICE_NAME};
use shopkit_core::{config, init_tracing, shutdown_signal, InMemoryRepository, ServiceConfig};
use shopkit_registry::RegistryClient;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    init_tracing();

    let config: ServiceConfig = config::load("dev").unwrap_or_else(|err| {
        warn!(%err, "No usable configuration found, using defaults");
        ServiceConfig::standalone(8001, "http://127.0.0.1:8761")
    });

    let service = CustomerService::new(InMemoryRepository::new());
    let app = routes::router(service);

    let registry = RegistryClient::new(
        config.registry.url.clone(),
        config.client.timeout_duration(),
    );
    let advertise = config.advertise_address();

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind customer service listener");
    info!(%addr, "Customer service listening");

    // Registration is best-effort; the service keeps serving local traffic
    // when the registry is down.
    if let Err(err) = registry.register(SERVICE_NAME, &advertise).await {
        warn!(%err, "Could not register with the service registry");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("customer service failed");

    if let Err(err) = registry.deregister(SERVICE_NAME, &advertise).await {
        warn!(%err, "Could not deregister from the service registry");
    }
    info!("Customer service stopped");
}
