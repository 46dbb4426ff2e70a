//! barber-booking server entry point.
//!
//! Wires the collaborator adapters, the order store and the staging store
//! into the services and starts the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use barber_booking::api;
use barber_booking::app_state::AppState;
use barber_booking::clients::{
    BarberDirectory, BlockTimeService, Deadline, HairColorCatalog, HairStyleCatalog,
    HttpBarberDirectory, HttpBlockTimeService, HttpHairColorCatalog, HttpHairStyleCatalog,
    HttpPaymentGateway, PaymentGateway, build_client,
};
use barber_booking::config::{BookingConfig, LogFormat};
use barber_booking::domain::{InMemoryStagingStore, StagingStore};
use barber_booking::persistence::{OrderRepository, PostgresOrderRepository};
use barber_booking::service::{
    AvailabilityResolver, BookingService, ConfirmationService, OrderQueryService, PricingEngine,
    ValidationPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = BookingConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting barber-booking");

    // Collaborators
    let deadline = Deadline::new(config.collaborator_timeout());
    let client = build_client(config.collaborator_timeout())?;
    let barbers: Arc<dyn BarberDirectory> = Arc::new(HttpBarberDirectory::new(
        client.clone(),
        &config.barber_service_url,
    ));
    let block_times: Arc<dyn BlockTimeService> = Arc::new(HttpBlockTimeService::new(
        client.clone(),
        &config.block_time_service_url,
    ));
    let hair_styles: Arc<dyn HairStyleCatalog> = Arc::new(HttpHairStyleCatalog::new(
        client.clone(),
        &config.hair_style_service_url,
    ));
    let hair_colors: Arc<dyn HairColorCatalog> = Arc::new(HttpHairColorCatalog::new(
        client.clone(),
        &config.hair_color_service_url,
    ));
    let payments: Arc<dyn PaymentGateway> =
        Arc::new(HttpPaymentGateway::new(client, &config.payment_service_url));

    // Storage
    let orders: Arc<dyn OrderRepository> =
        Arc::new(PostgresOrderRepository::connect(&config).await?);
    let staging = Arc::new(InMemoryStagingStore::new());
    spawn_staging_sweeper(Arc::clone(&staging), config.staging_sweep_interval());

    // Build service layer
    let booking_service = Arc::new(BookingService::new(
        ValidationPipeline::new(block_times, deadline),
        AvailabilityResolver::new(Arc::clone(&barbers), Arc::clone(&orders), deadline),
        PricingEngine::new(hair_styles, hair_colors, deadline),
        Arc::clone(&staging) as Arc<dyn StagingStore>,
        Arc::clone(&payments),
        deadline,
        config.staged_status,
    ));
    let confirmation = Arc::new(ConfirmationService::new(
        staging,
        Arc::clone(&orders),
        deadline,
    ));
    let order_query = Arc::new(OrderQueryService::new(orders, barbers, payments, deadline));

    // Build application state
    let app_state = AppState {
        booking_service,
        order_query,
        confirmation,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops expired staged bookings.
fn spawn_staging_sweeper(store: Arc<InMemoryStagingStore>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired staged bookings purged");
            }
        }
    });
}
