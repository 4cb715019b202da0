use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Catalog Router Module
///
/// Screens every viewer can use, signed in or not.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        // GET /session
        // Restores the signed-in user from the backend cookie, if any.
        .route("/session", get(handlers::get_session))
        // GET /products?page=&keyword=&category=&sortBy=&sortOrder=
        .route("/products", get(handlers::get_products))
        .route("/categories", get(handlers::get_categories))
        // POST /products/{id}/summary
        // AI summary for one product card; cached on the card after the first success.
        .route("/products/{id}/summary", post(handlers::summarize_product))
        // GET/POST /cart
        // Anonymous carts stay local; signed-in carts are synced with the backend.
        .route("/cart", get(handlers::get_cart).post(handlers::add_to_cart))
        // DELETE /cart/{id}
        .route("/cart/{id}", delete(handlers::remove_from_cart))
}
