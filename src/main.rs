use std::net::SocketAddr;

use gatehouse::config::Config;
use gatehouse::state::AppState;
use gatehouse::{build_router, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_dir)?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)?;
    tracing::info!("✅ AppState initialized");

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
