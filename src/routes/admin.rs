use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The admin/seller dashboard, mounted under `/admin` and guarded with
/// `PageClass::Restricted`. Admins reach every section; sellers only the sections
/// whose path starts with an allow-listed prefix (orders and products by default).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(handlers::get_dashboard))
        // GET /admin/orders
        // All orders for an admin, the seller's own orders for a seller.
        .route("/admin/orders", get(handlers::get_managed_orders))
        .route("/admin/products", get(handlers::get_managed_products))
        // GET /admin/{section}
        // Layout-only sections (categories, sellers).
        .route("/admin/{section}", get(handlers::get_dashboard_section))
}
