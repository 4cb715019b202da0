use std::{env, time::Duration};

/// Default seller allow-list used when `SELLER_ALLOWED_PREFIXES` is not set.
pub const DEFAULT_SELLER_PREFIXES: [&str; 2] = ["/admin/orders", "/admin/products"];

pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// AppConfig
///
/// Holds the storefront shell's configuration. Loaded once at startup and then
/// shared read-only with every session, the access guard and the API connector.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Root URL of the storefront backend (without the `/api` suffix).
    pub backend_url: String,
    // Socket address the shell listens on.
    pub bind_addr: String,
    // Restricted paths a seller (without the admin role) may open.
    pub seller_allowed_prefixes: Vec<String>,
    // Page size for the "My Orders" screen.
    pub orders_page_size: u32,
    // Page size for the product catalog.
    pub products_page_size: u32,
    // Sessions idle longer than this are evicted from the registry.
    pub session_ttl: Duration,
    // Upper bound for a single backend call; a timeout counts as a network failure.
    pub backend_timeout: Duration,
    // Runtime environment marker. Selects log format and config strictness.
    pub env: Env,
}

/// Env
///
/// Runtime context: `Local` tolerates missing settings, `Production` does not.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration for tests and scaffolding.
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            seller_allowed_prefixes: DEFAULT_SELLER_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            orders_page_size: 6,
            products_page_size: 12,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `BACK_END_URL` is missing, so the shell never
    /// starts pointed at a default backend in a deployed environment.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let backend_url = match env {
            Env::Production => env::var("BACK_END_URL")
                .expect("FATAL: BACK_END_URL must be set in production."),
            Env::Local => env::var("BACK_END_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        };

        let seller_allowed_prefixes = env::var("SELLER_ALLOWED_PREFIXES")
            .map(|raw| parse_prefixes(&raw))
            .unwrap_or_else(|_| {
                DEFAULT_SELLER_PREFIXES
                    .iter()
                    .map(|p| p.to_string())
                    .collect()
            });

        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            seller_allowed_prefixes,
            orders_page_size: parse_or("ORDERS_PAGE_SIZE", 6),
            products_page_size: parse_or("PRODUCTS_PAGE_SIZE", 12),
            session_ttl: Duration::from_secs(
                parse_or("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS as u32).into(),
            ),
            backend_timeout: Duration::from_secs(
                parse_or("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS as u32).into(),
            ),
            env,
        }
    }

    /// Base URL every remote API path is appended to.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }
}

/// Splits a comma-separated prefix list, dropping blanks.
fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or(var: &str, fallback: u32) -> u32 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}
