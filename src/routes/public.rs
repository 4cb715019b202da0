use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Login and register. Guarded with `PageClass::Public`: a signed-in viewer is
/// redirected home instead of seeing these forms again.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::get_login).post(handlers::sign_in))
        .route(
            "/register",
            get(handlers::get_register).post(handlers::sign_up),
        )
}
