use crate::auth::JwtConfig;

/// Server configuration
///
/// Every value can be overridden through the environment (a `.env` file is
/// loaded in development):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HOST | 0.0.0.0 | bind address |
/// | PORT | 3001 | HTTP and Socket.IO port |
/// | DATABASE_PATH | data/comanda.db | SQLite file |
/// | RUST_ENV | development | development / staging / production |
/// | ADMIN_EMAIL | admin@comanda.local | admin account seeded on startup |
/// | ADMIN_PASSWORD | admin123 | seeded admin password |
///
/// JWT settings (`JWT_SECRET`, `JWT_EXPIRATION_MINUTES`, `JWT_ISSUER`,
/// `JWT_AUDIENCE`) are read by [`JwtConfig::default`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,
    /// HTTP API and Socket.IO port
    pub port: u16,
    /// SQLite database file; parent directories are created on startup
    pub database_path: String,
    /// JWT signing and validation settings
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Admin account seeded on startup if absent
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/comanda.db".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("RUST_ENV").unwrap_or_else(|_| "development".into()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@comanda.local".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
