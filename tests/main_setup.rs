use serial_test::serial;
use std::{env, panic, time::Duration};
use storefront_web::{AppConfig, config::Env};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: [&str; 8] = [
    "APP_ENV",
    "BACK_END_URL",
    "BIND_ADDR",
    "SELLER_ALLOWED_PREFIXES",
    "ORDERS_PAGE_SIZE",
    "PRODUCTS_PAGE_SIZE",
    "SESSION_TTL_SECS",
    "BACKEND_TIMEOUT_SECS",
];

/// Runs `test` with a clean config environment and restores the original values
/// afterwards, even when the test panics.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            // BACK_END_URL is missing
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without BACK_END_URL"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.backend_url, "http://localhost:8080");
    assert_eq!(config.api_base(), "http://localhost:8080/api");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(
        config.seller_allowed_prefixes,
        vec!["/admin/orders".to_string(), "/admin/products".to_string()]
    );
    assert_eq!(config.orders_page_size, 6);
    assert_eq!(config.products_page_size, 12);
    assert_eq!(config.session_ttl, Duration::from_secs(1800));
    assert_eq!(config.backend_timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_app_config_reads_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("BACK_END_URL", "https://shop.example.com/");
            env::set_var("SELLER_ALLOWED_PREFIXES", " /admin/orders , ,/admin/reports");
            env::set_var("ORDERS_PAGE_SIZE", "10");
            // Invalid values fall back to the default.
            env::set_var("PRODUCTS_PAGE_SIZE", "zero");
            env::set_var("SESSION_TTL_SECS", "600");
            env::set_var("BACKEND_TIMEOUT_SECS", "3");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    // Trailing slash is trimmed so the API base has exactly one separator.
    assert_eq!(config.api_base(), "https://shop.example.com/api");
    assert_eq!(
        config.seller_allowed_prefixes,
        vec!["/admin/orders".to_string(), "/admin/reports".to_string()]
    );
    assert_eq!(config.orders_page_size, 10);
    assert_eq!(config.products_page_size, 12);
    assert_eq!(config.session_ttl, Duration::from_secs(600));
    assert_eq!(config.backend_timeout, Duration::from_secs(3));
}
