use axum::{
    Router,
    routing::{delete, get, patch, post},
    middleware::from_fn_with_state,
};

use http::{Method, header};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod state;
mod db;

mod models {
    pub mod availability;
    pub mod chat;
    pub mod emergency;
    pub mod profile;
    pub mod review;
    pub mod session;
}

mod repositories {
    pub mod application;
    pub mod availability;
    pub mod chat;
    pub mod emergency;
    pub mod profile;
    pub mod review;
    pub mod session;
}

mod services {
    pub mod availability;
    pub mod booking;
    pub mod chat;
    pub mod emergency;
    pub mod notify;
    pub mod profiles;
    pub mod reviews;
    pub mod scheduling;
}

mod handlers {
    pub mod availability;
    pub mod chat;
    pub mod emergencies;
    pub mod profiles;
    pub mod reviews;
    pub mod sessions;
}

mod middleware_layer {
    pub mod auth;
}

mod validation {
    pub mod booking;
}

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(50)
            .burst_size(200)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let api_routes = Router::new()
        // Profiles and counselor vetting
        .route("/api/profiles", post(handlers::profiles::create_profile))
        .route("/api/profiles", get(handlers::profiles::list_profiles))
        .route("/api/profiles/{profile_id}", get(handlers::profiles::get_profile))
        .route("/api/profiles/{profile_id}", patch(handlers::profiles::update_profile))
        .route(
            "/api/client-profiles",
            post(handlers::profiles::create_client_profile),
        )
        .route(
            "/api/client-profiles",
            get(handlers::profiles::list_client_profiles),
        )
        .route(
            "/api/counselor-applications",
            post(handlers::profiles::submit_application),
        )
        .route(
            "/api/counselor-applications",
            get(handlers::profiles::list_applications),
        )
        .route(
            "/api/counselor-applications/{application_id}",
            get(handlers::profiles::get_application),
        )
        .route(
            "/api/counselor-applications/{application_id}/status",
            patch(handlers::profiles::review_application),
        )
        // Availability and slot resolution
        .route("/api/availability", get(handlers::availability::list_availability))
        .route("/api/availability", post(handlers::availability::create_slot))
        .route(
            "/api/availability/{slot_id}",
            delete(handlers::availability::delete_slot),
        )
        .route(
            "/api/profiles/{profile_id}/availability",
            get(handlers::availability::open_slots),
        )
        // Session booking and lifecycle
        .route("/api/sessions", post(handlers::sessions::book_session))
        .route("/api/sessions", get(handlers::sessions::list_sessions))
        .route("/api/sessions/{session_id}", get(handlers::sessions::get_session))
        .route(
            "/api/sessions/{session_id}/status",
            patch(handlers::sessions::update_session_status),
        )
        // Reviews
        .route("/api/reviews", post(handlers::reviews::create_review))
        .route("/api/reviews", get(handlers::reviews::list_reviews))
        // Session-scoped chat
        .route(
            "/api/chat/{session_id}/messages",
            get(handlers::chat::list_messages),
        )
        .route(
            "/api/chat/{session_id}/messages",
            post(handlers::chat::send_message),
        )
        // Emergency escalation
        .route("/api/emergencies", post(handlers::emergencies::create_emergency))
        .route("/api/emergencies", get(handlers::emergencies::list_emergencies))
        .layer(tower_governor::GovernorLayer::new(governor_conf))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("🚀 Server listening on http://{}", addr);
    tracing::info!(
        "✅ Slot resolver: horizon {} days, {} minute increments",
        state.config.resolver_horizon_days,
        state.config.slot_granularity_minutes
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
