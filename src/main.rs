mod api;
mod config;
mod hos;
mod models;
mod planner;
mod providers;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use planner::TripPlanner;
use providers::routing::RoutingClient;

#[derive(OpenApi)]
#[openapi(
    info(title = "HOS Trip Planner API", version = "0.1.0"),
    paths(api::trips::plan::plan_trip, api::health::health_check),
    components(schemas(
        api::trips::plan::PlanTripRequest,
        api::trips::plan::PlanTripResponse,
        api::trips::plan::SegmentResponse,
        api::health::HealthResponse,
        api::ErrorResponse,
        models::Location,
        models::SegmentType,
        models::DutyStatus,
    )),
    tags(
        (name = "trips", description = "HOS-compliant trip planning"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate();
    tracing::info!(
        oracle = %config.routing_oracle_url,
        rule_set = %config.default_rule_set,
        "Loaded configuration"
    );

    let routing = RoutingClient::new(&config).expect("Failed to build routing client");
    let trip_planner = Arc::new(TripPlanner::new(routing, config.default_rule_set));
    let config = Arc::new(config);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // Build the app
    let app = Router::new()
        .route("/", get(root))
        .nest("/api", api::router(trip_planner, config))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to port 3000");

    tracing::info!("Server running on http://localhost:3000");
    tracing::info!("Swagger UI: http://localhost:3000/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> &'static str {
    "HOS Trip Planner API"
}
