use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, actions,
    auth::{CurrentSession, CurrentViewer},
    error::AppError,
    models::{AddToCartRequest, ProductQuery, SignInRequest, SignUpRequest, SummaryRequest},
    store::RequestKind,
    summary::SummaryCard,
    views::{
        CartView, CatalogView, CategoriesView, CheckoutView, DashboardView, OrdersView,
        ProfileView, ScreenView, SessionView, admin_navigation,
    },
};

// --- Query Structs ---

/// PageQuery
///
/// `?page=N` as the paginated screens receive it (1-based).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<u32>,
}

// --- Session & Catalog (no guard) ---

/// get_session
///
/// Restores the signed-in user from the backend credentials held by this session
/// and reports the resulting viewer.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current viewer", body = SessionView))
)]
pub async fn get_session(CurrentSession(session): CurrentSession) -> Json<SessionView> {
    if session.store.snapshot().auth.user.is_none() {
        actions::restore_session(&session.store, session.api.as_ref()).await;
    }
    Json(SessionView::from_state(&session.store.snapshot()))
}

/// get_products
///
/// Product browsing. Supports paging, keyword search, category filter and sorting.
#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses((status = 200, description = "Catalog page", body = CatalogView))
)]
pub async fn get_products(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<CatalogView> {
    actions::fetch_products(
        &session.store,
        session.api.as_ref(),
        &query,
        state.config.products_page_size,
    )
    .await;
    Json(CatalogView::from_state(
        &session.store.snapshot(),
        &state.config.backend_url,
    ))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "Categories", body = CategoriesView))
)]
pub async fn get_categories(CurrentSession(session): CurrentSession) -> Json<CategoriesView> {
    actions::fetch_categories(&session.store, session.api.as_ref()).await;
    Json(CategoriesView::from_state(&session.store.snapshot()))
}

/// summarize_product
///
/// Runs the AI summary for the card of product `id`. A card that already holds a
/// summary answers from its cache without calling the backend.
#[utoipa::path(
    post,
    path = "/products/{id}/summary",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = SummaryRequest,
    responses((status = 200, description = "Card state", body = SummaryCard))
)]
pub async fn summarize_product(
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Json(payload): Json<SummaryRequest>,
) -> Json<SummaryCard> {
    let card = session
        .summaries
        .summarize(session.api.as_ref(), id, &payload)
        .await;
    Json(card)
}

#[utoipa::path(
    get,
    path = "/cart",
    responses((status = 200, description = "Cart", body = CartView))
)]
pub async fn get_cart(CurrentSession(session): CurrentSession) -> Json<CartView> {
    Json(CartView::from_state(&session.store.snapshot()))
}

/// add_to_cart
///
/// Adds the product to the cart. Stock shortfalls and backend rejections are
/// reported in the view's `error`, not as an HTTP error.
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddToCartRequest,
    responses((status = 200, description = "Cart after the attempt", body = CartView))
)]
pub async fn add_to_cart(
    CurrentSession(session): CurrentSession,
    Json(payload): Json<AddToCartRequest>,
) -> Json<CartView> {
    actions::add_to_cart(
        &session.store,
        session.api.as_ref(),
        &payload.product,
        payload.quantity,
    )
    .await;
    Json(CartView::from_state(&session.store.snapshot()))
}

/// remove_from_cart
///
/// Drops the product's line from the cart. Removing a product that is not in the
/// cart leaves it unchanged.
#[utoipa::path(
    delete,
    path = "/cart/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses((status = 200, description = "Cart after removal", body = CartView))
)]
pub async fn remove_from_cart(
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> Json<CartView> {
    actions::remove_from_cart(&session.store, id);
    Json(CartView::from_state(&session.store.snapshot()))
}

// --- Public pages (signed-out viewers only) ---

#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login screen", body = ScreenView), (status = 303, description = "Already signed in"))
)]
pub async fn get_login(CurrentSession(session): CurrentSession) -> Json<ScreenView> {
    let state = session.store.snapshot();
    Json(ScreenView {
        screen: "login".to_string(),
        error: state.errors.failure(RequestKind::SignIn).map(str::to_string),
    })
}

/// sign_in
///
/// Signs the session in against the backend. The backend's session cookie is kept
/// in this session's API client.
#[utoipa::path(
    post,
    path = "/login",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionView),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Rejected by backend")
    )
)]
pub async fn sign_in(
    CurrentSession(session): CurrentSession,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SessionView>, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    actions::sign_in(&session.store, session.api.as_ref(), &payload)
        .await
        .map_err(AppError::SignInFailed)?;
    Ok(Json(SessionView::from_state(&session.store.snapshot())))
}

#[utoipa::path(
    get,
    path = "/register",
    responses((status = 200, description = "Register screen", body = ScreenView))
)]
pub async fn get_register(CurrentSession(session): CurrentSession) -> Json<ScreenView> {
    let state = session.store.snapshot();
    Json(ScreenView {
        screen: "register".to_string(),
        error: state.errors.failure(RequestKind::SignUp).map(str::to_string),
    })
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Missing fields"),
        (status = 422, description = "Rejected by backend")
    )
)]
pub async fn sign_up(
    CurrentSession(session): CurrentSession,
    Json(payload): Json<SignUpRequest>,
) -> Result<StatusCode, AppError> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::InvalidInput(
            "Username, email and password are required".to_string(),
        ));
    }
    actions::sign_up(&session.store, session.api.as_ref(), &payload)
        .await
        .map_err(AppError::Rejected)?;
    Ok(StatusCode::CREATED)
}

// --- Authenticated pages ---

#[utoipa::path(
    get,
    path = "/checkout",
    responses((status = 200, description = "Checkout", body = CheckoutView), (status = 303, description = "Not signed in"))
)]
pub async fn get_checkout(CurrentSession(session): CurrentSession) -> Json<CheckoutView> {
    actions::fetch_user_addresses(&session.store, session.api.as_ref()).await;
    Json(CheckoutView::from_state(&session.store.snapshot()))
}

/// get_profile
///
/// Loads the profile and the address book together.
#[utoipa::path(
    get,
    path = "/profile",
    responses((status = 200, description = "Profile", body = ProfileView), (status = 303, description = "Not signed in"))
)]
pub async fn get_profile(CurrentSession(session): CurrentSession) -> Json<ProfileView> {
    let api = session.api.as_ref();
    tokio::join!(
        actions::fetch_user_profile(&session.store, api),
        actions::fetch_user_addresses(&session.store, api),
    );
    Json(ProfileView::from_state(&session.store.snapshot()))
}

#[utoipa::path(
    get,
    path = "/profile/orders",
    params(PageQuery),
    responses((status = 200, description = "Order history", body = OrdersView), (status = 303, description = "Not signed in"))
)]
pub async fn get_orders(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<OrdersView> {
    actions::fetch_user_orders(
        &session.store,
        session.api.as_ref(),
        query.page,
        state.config.orders_page_size,
    )
    .await;
    Json(OrdersView::user_orders(&session.store.snapshot()))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Signed out"))
)]
pub async fn sign_out(CurrentSession(session): CurrentSession) -> StatusCode {
    actions::sign_out(&session.store, session.api.as_ref()).await;
    StatusCode::NO_CONTENT
}

// --- Restricted pages ---

fn dashboard(state: &AppState, session: &crate::session::Session, section: &str) -> DashboardView {
    DashboardView {
        section: section.to_string(),
        navigation: admin_navigation(
            &session.store.viewer(),
            &state.config.seller_allowed_prefixes,
        ),
        orders: None,
        catalog: None,
    }
}

#[utoipa::path(
    get,
    path = "/admin",
    responses((status = 200, description = "Dashboard", body = DashboardView), (status = 303, description = "Not allowed"))
)]
pub async fn get_dashboard(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
) -> Json<DashboardView> {
    Json(dashboard(&state, &session, "dashboard"))
}

/// get_dashboard_section
///
/// Dashboard sections that only need the layout (categories, sellers, ...).
#[utoipa::path(
    get,
    path = "/admin/{section}",
    params(("section" = String, Path, description = "Dashboard section")),
    responses((status = 200, description = "Dashboard section", body = DashboardView), (status = 303, description = "Not allowed"))
)]
pub async fn get_dashboard_section(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Json<DashboardView> {
    Json(dashboard(&state, &session, &section))
}

/// get_managed_orders
///
/// Admins see every order, sellers the orders for their own products.
#[utoipa::path(
    get,
    path = "/admin/orders",
    params(PageQuery),
    responses((status = 200, description = "Managed orders", body = DashboardView), (status = 303, description = "Not allowed"))
)]
pub async fn get_managed_orders(
    CurrentSession(session): CurrentSession,
    CurrentViewer(viewer): CurrentViewer,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<DashboardView> {
    actions::fetch_managed_orders(
        &session.store,
        session.api.as_ref(),
        &viewer,
        query.page,
        state.config.orders_page_size,
    )
    .await;
    let mut view = dashboard(&state, &session, "orders");
    view.orders = Some(OrdersView::managed_orders(&session.store.snapshot()));
    Json(view)
}

#[utoipa::path(
    get,
    path = "/admin/products",
    params(ProductQuery),
    responses((status = 200, description = "Managed products", body = DashboardView), (status = 303, description = "Not allowed"))
)]
pub async fn get_managed_products(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<DashboardView> {
    actions::fetch_products(
        &session.store,
        session.api.as_ref(),
        &query,
        state.config.products_page_size,
    )
    .await;
    let mut view = dashboard(&state, &session, "products");
    view.catalog = Some(CatalogView::from_state(
        &session.store.snapshot(),
        &state.config.backend_url,
    ));
    Json(view)
}
