use deadpool_postgres::Pool;

use crate::config::Config;
use crate::error::Result;

/// The application's state.
///
/// Constructed once at startup and cloned into every request handler; all
/// fields are cheap handles over shared, read-mostly resources.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL pool initialized with deadpool-postgres");

        Ok(AppState {
            db,
            config: config.clone(),
        })
    }
}
