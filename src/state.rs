use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use registrar_auth::{IdentityResolver, TokenCodec};
use registrar_config::{CorsConfig, JwtConfig, ServerConfig};
use registrar_db::{InMemoryStudentStore, PgStudentStore, StudentStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub codec: Arc<TokenCodec>,
    pub resolver: Arc<IdentityResolver>,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StudentStore>,
        jwt_config: &JwtConfig,
        cors_config: CorsConfig,
        server_config: ServerConfig,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(jwt_config));
        let resolver = Arc::new(IdentityResolver::new(jwt_config, Arc::clone(&codec)));

        Self {
            store,
            codec,
            resolver,
            cors_config,
            server_config,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("codec", &self.codec)
            .field("cors_config", &self.cors_config)
            .field("server_config", &self.server_config)
            .finish_non_exhaustive()
    }
}

/// Builds the state from the environment. Uses PostgreSQL when `DATABASE_URL`
/// is set and an in-memory store otherwise.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env();
    if jwt_config.secret.is_none() {
        warn!("JWT_SECRET is not set; tokens can be neither issued nor verified");
    }

    let store: Arc<dyn StudentStore> = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => {
            let pool = registrar_db::init_db_pool(&url)
                .await
                .context("failed to connect to database")?;
            registrar_db::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            info!("Using PostgreSQL student store");
            Arc::new(PgStudentStore::new(pool))
        }
        _ => {
            warn!("DATABASE_URL is not set; records are kept in memory only");
            Arc::new(InMemoryStudentStore::new())
        }
    };

    Ok(AppState::new(
        store,
        &jwt_config,
        CorsConfig::from_env(),
        ServerConfig::from_env(),
    ))
}
