//! Process-wide configuration, loaded once at startup. No hot reload.

use std::str::FromStr;

use chrono::Duration;

use wicket_auth::HashCost;

#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 signing secret shared by token issuance and validation.
    pub jwt_secret: String,
    /// Token validity window.
    pub token_ttl: Duration,
    /// Argon2 cost applied to newly created password hashes.
    pub hash_cost: HashCost,
    pub port: u16,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let hash_cost = match env_var("HASH_ITERATIONS") {
            Some(iterations) => HashCost { iterations },
            None => HashCost::default(),
        };

        Self {
            jwt_secret,
            token_ttl: Duration::seconds(env_var("JWT_TTL_SECS").unwrap_or(3600)),
            hash_cost,
            port: env_var("PORT").unwrap_or(8080),
            use_persistent_stores: env_var("USE_PERSISTENT_STORES").unwrap_or(false),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }
}

fn env_var<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
