use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use http::{header, HeaderName, HeaderValue, Method};
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod state;

pub mod crypto {
    pub mod csrf;
    pub mod jwt;
}

pub mod models {
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod rbac;
    pub mod users;
}

pub mod handlers {
    pub mod auth;
    pub mod health;
    pub mod users;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod csrf;
}

pub mod validation {
    pub mod auth;
    pub mod users;
}

use state::AppState;

/// Largest accepted request body. This is a JSON API; anything bigger than
/// this is not a legitimate payload.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Initializes the tracing pipeline: a console sink plus `combined.log`
/// (everything the filter passes) and `error.log` (errors only) under
/// `log_dir`.
///
/// The filter honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(log_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let combined = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(log_dir).join("combined.log"))?;
    let errors = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(log_dir).join("error.log"))?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(combined)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(errors))
                .with_filter(LevelFilter::ERROR),
        )
        .init();

    Ok(())
}

/// Builds the full application router.
///
/// The integration suite drives exactly this router, so everything —
/// middleware ordering included — is wired here rather than in `main`.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            "x-csrf-token".parse::<HeaderName>().unwrap(),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    // Credential endpoints are rate limited per IP; everything else is
    // bounded by the pool and body limits.
    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(20)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let public_auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(tower_governor::GovernorLayer::new(auth_governor_conf))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/users/{user_id}", get(handlers::users::get_user))
        .route("/api/users/{user_id}", put(handlers::users::update_user))
        .route("/api/users/{user_id}", delete(handlers::users::delete_user))
        .route_layer(from_fn(middleware_layer::csrf::verify_csrf))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/api/users", get(handlers::users::list_users))
        .route_layer(from_fn(middleware_layer::auth::require_admin))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(public_auth_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors)
}
