use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Screens for any signed-in viewer, whatever their roles. Guarded with
/// `PageClass::Authenticated`: anonymous viewers are redirected to `/login`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /checkout
        // Cart plus the address book to ship to.
        .route("/checkout", get(handlers::get_checkout))
        // GET /profile
        .route("/profile", get(handlers::get_profile))
        // GET /profile/orders?page=N
        // Order history, six orders per page by default.
        .route("/profile/orders", get(handlers::get_orders))
        // POST /logout
        .route("/logout", post(handlers::sign_out))
}
