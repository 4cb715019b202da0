use axum::{
    Router,
    extract::Request,
    http::HeaderName,
    middleware,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access rules and the client state container.
pub mod guard;
pub mod store;

// Backend boundary and the async actions built on it.
pub mod actions;
pub mod api;
pub mod summary;

// HTTP shell: sessions, guard middleware, screens.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod session;
pub mod views;

// Screens segregated by access class (catalog, public, authenticated, admin).
pub mod routes;
use routes::{admin, authenticated, catalog, public};

// --- Public Re-exports ---

pub use api::{ApiConnector, ConnectorState, HttpConnector, MockApi};
pub use config::AppConfig;
pub use session::SessionRegistry;

/// ApiDoc
///
/// OpenAPI description of the shell's screens, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_session, handlers::get_products, handlers::get_categories,
        handlers::summarize_product, handlers::get_cart, handlers::add_to_cart, handlers::remove_from_cart,
        handlers::get_login, handlers::sign_in, handlers::get_register, handlers::sign_up,
        handlers::get_checkout, handlers::get_profile, handlers::get_orders, handlers::sign_out,
        handlers::get_dashboard, handlers::get_dashboard_section, handlers::get_managed_orders,
        handlers::get_managed_products
    ),
    components(
        schemas(
            models::UserInfo, models::Product, models::Category, models::Order,
            models::OrderItem, models::CartItem, models::Address, models::Pagination,
            models::AddToCartRequest, models::SignInRequest, models::SignUpRequest,
            models::SummaryRequest, guard::Viewer, guard::Role, summary::SummaryCard,
            views::SessionView, views::ScreenView, views::CatalogView, views::CartView,
            views::CheckoutView, views::ProfileView, views::OrdersView, views::DashboardView,
        )
    ),
    tags(
        (name = "storefront", description = "Storefront screens")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared by every request: the configuration, the live sessions and the connector
/// that opens a backend client for each new session.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionRegistry,
    pub connector: ConnectorState,
}

impl AppState {
    pub fn new(config: AppConfig, connector: ConnectorState) -> Self {
        Self {
            sessions: SessionRegistry::with_ttl(config.session_ttl),
            config,
            connector,
        }
    }
}

/// create_router
///
/// Assembles the screens, wraps each access class in its guard, attaches the
/// session to every request and adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Catalog: no guard.
        .merge(catalog::catalog_routes())
        // Public pages: signed-in viewers are sent home.
        .merge(public::public_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::public_only,
        )))
        // Authenticated pages: anonymous viewers are sent to login.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::authenticated_only,
            )),
        )
        // Restricted pages: admins, and sellers within the allow-list.
        .merge(admin::admin_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::restricted_only,
        )))
        // Every request gets its session before any guard runs.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::attach_session,
        ))
        // Mounted after the session layer: health checks and docs never open a session.
        .route("/health", get(|| async { "ok" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its `x-request-id` so all log lines of a
/// request correlate.
fn trace_span_logger(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
