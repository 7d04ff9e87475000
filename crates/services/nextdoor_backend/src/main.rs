// File: crates/services/nextdoor_backend/src/main.rs
use axum::{extract::State, routing::get, Json, Router};
use chrono::SecondsFormat;
use nextdoor_booking::routes as booking_routes;
use nextdoor_common::{log_error, Context};
use nextdoor_config::load_config;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod app_state;
mod service_factory;

use app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    /// Seconds since the server started.
    uptime: f64,
    environment: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: state
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment(),
    })
}

fn app(state: Arc<AppState>) -> Router {
    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/api", booking_routes(state.booking.clone()));

    #[cfg(feature = "openapi")]
    {
        use nextdoor_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /api/docs");
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", BookingApiDoc::openapi());
        app = app.merge(swagger_ui);
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = nextdoor_common::init_from_config(&config.logging);

    let state = match AppState::new(config.clone()).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            log_error(e, "Failed to initialize services");
            return ExitCode::FAILURE;
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))
    {
        Ok(listener) => listener,
        Err(e) => {
            log_error(e, "Server startup failed");
            return ExitCode::FAILURE;
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(listener, app(state).into_make_service()).await {
        log_error(e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
