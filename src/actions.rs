//! Asynchronous actions.
//!
//! Each action issues one remote call and settles into the [`Store`] through a
//! [`RequestToken`], so a response that was superseded while in flight is dropped
//! instead of overwriting newer state. Failures are recorded in the errors slice
//! and never propagate to the caller.

use crate::{
    api::{OrderScope, PageRequest, StorefrontApi},
    error::ClientError,
    guard::Viewer,
    models::{CartItem, Product, ProductQuery, SignInRequest, SignUpRequest, UserInfo},
    store::{Action, RequestKind, RequestToken, Store},
};

pub const SIGN_IN_FAILED: &str = "Login failed";
pub const SIGN_UP_FAILED: &str = "Registration failed";
pub const PRODUCTS_FAILED: &str = "Failed to fetch products";
pub const CATEGORIES_FAILED: &str = "Failed to fetch categories";
pub const ORDERS_FAILED: &str = "Failed to fetch orders";
pub const PROFILE_FAILED: &str = "Failed to fetch profile";
pub const ADDRESSES_FAILED: &str = "Failed to fetch addresses";
pub const CART_FAILED: &str = "Failed to add to cart";
pub const OUT_OF_STOCK: &str = "Out of stock";

/// Pending
///
/// One outstanding request. Settling or failing consumes it; dropping it first
/// (the screen's future was cancelled) withdraws the request from the store so its
/// kind does not stay loading.
struct Pending<'a> {
    store: &'a Store,
    token: Option<RequestToken>,
}

impl<'a> Pending<'a> {
    fn begin(store: &'a Store, kind: RequestKind) -> Self {
        Self {
            store,
            token: Some(store.begin(kind)),
        }
    }

    fn begin_shared(store: &'a Store, kind: RequestKind) -> Self {
        Self {
            store,
            token: Some(store.begin_shared(kind)),
        }
    }

    fn settle(mut self, actions: impl IntoIterator<Item = Action>) {
        if let Some(token) = self.token.take() {
            self.store.settle(token, actions);
        }
    }

    fn reject(mut self, message: &str) {
        if let Some(token) = self.token.take() {
            self.store.fail(token, message);
        }
    }

    fn fail(mut self, err: &ClientError, fallback: &str) {
        if let Some(token) = self.token.take() {
            tracing::warn!(kind = ?token.kind, failure = ?err.kind(), "request failed: {}", err);
            self.store.fail(token, err.user_message(fallback));
        }
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.store.abandon(token);
        }
    }
}

/// Signs in and stores the returned user. Returns the inline error message on
/// failure so the login form can show it.
pub async fn sign_in(
    store: &Store,
    api: &dyn StorefrontApi,
    request: &SignInRequest,
) -> Result<UserInfo, String> {
    let pending = Pending::begin(store, RequestKind::SignIn);
    match api.sign_in(request).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "signed in");
            pending.settle([Action::LoginUser(user.clone())]);
            Ok(user)
        }
        Err(e) => {
            let message = e.user_message(SIGN_IN_FAILED);
            pending.fail(&e, SIGN_IN_FAILED);
            Err(message)
        }
    }
}

pub async fn sign_up(
    store: &Store,
    api: &dyn StorefrontApi,
    request: &SignUpRequest,
) -> Result<(), String> {
    let pending = Pending::begin(store, RequestKind::SignUp);
    match api.sign_up(request).await {
        Ok(()) => {
            pending.settle(std::iter::empty::<Action>());
            Ok(())
        }
        Err(e) => {
            let message = e.user_message(SIGN_UP_FAILED);
            pending.fail(&e, SIGN_UP_FAILED);
            Err(message)
        }
    }
}

/// Restores the signed-in user from the session's backend credentials. A 401
/// simply means nobody is signed in.
pub async fn restore_session(store: &Store, api: &dyn StorefrontApi) {
    let pending = Pending::begin(store, RequestKind::Session);
    match api.current_user().await {
        Ok(user) => {
            pending.settle([Action::LoginUser(user)]);
        }
        Err(e) if e.is_unauthorized() => {
            pending.settle(std::iter::empty::<Action>());
        }
        Err(e) => pending.fail(&e, "Session restore failed"),
    }
}

/// Signs out. Local state is cleared even when the backend call fails, and every
/// request still in flight for the previous user is invalidated.
pub async fn sign_out(store: &Store, api: &dyn StorefrontApi) {
    if let Err(e) = api.sign_out().await {
        tracing::warn!("backend sign-out failed: {}", e);
    }
    store.invalidate_all();
    store.dispatch(Action::LogOut);
    store.dispatch(Action::ClearCart);
}

pub async fn fetch_products(
    store: &Store,
    api: &dyn StorefrontApi,
    query: &ProductQuery,
    page_size: u32,
) {
    let mut page = PageRequest::from_screen_page(query.page, page_size);
    page.keyword = query.keyword.clone();
    page.category = query.category.clone();
    page.sort_by = query.sort_by.clone();
    page.sort_order = query.sort_order.clone();

    let pending = Pending::begin(store, RequestKind::Products);
    match api.get_products(&page).await {
        Ok(products) => {
            pending.settle([Action::SetProducts(products)]);
        }
        Err(e) => pending.fail(&e, PRODUCTS_FAILED),
    }
}

pub async fn fetch_categories(store: &Store, api: &dyn StorefrontApi) {
    let pending = Pending::begin(store, RequestKind::Categories);
    match api.get_categories().await {
        Ok(categories) => {
            pending.settle([Action::SetCategories(categories)]);
        }
        Err(e) => pending.fail(&e, CATEGORIES_FAILED),
    }
}

/// Loads one page of the viewer's orders. `page` is 1-based.
pub async fn fetch_user_orders(
    store: &Store,
    api: &dyn StorefrontApi,
    page: Option<u32>,
    page_size: u32,
) {
    let request = PageRequest::from_screen_page(page, page_size);
    let pending = Pending::begin(store, RequestKind::UserOrders);
    match api.get_user_orders(&request).await {
        Ok(orders) => {
            pending.settle([Action::SetUserOrders(orders)]);
        }
        Err(e) => pending.fail(&e, ORDERS_FAILED),
    }
}

/// Loads the orders the viewer manages: all orders for an admin, the seller's own
/// orders otherwise.
pub async fn fetch_managed_orders(
    store: &Store,
    api: &dyn StorefrontApi,
    viewer: &Viewer,
    page: Option<u32>,
    page_size: u32,
) {
    let scope = if viewer.is_admin() {
        OrderScope::All
    } else {
        OrderScope::Seller
    };
    let request = PageRequest::from_screen_page(page, page_size);
    let pending = Pending::begin(store, RequestKind::ManagedOrders);
    match api.get_managed_orders(scope, &request).await {
        Ok(orders) => {
            pending.settle([Action::SetManagedOrders(orders)]);
        }
        Err(e) => pending.fail(&e, ORDERS_FAILED),
    }
}

pub async fn fetch_user_profile(store: &Store, api: &dyn StorefrontApi) {
    let pending = Pending::begin(store, RequestKind::UserProfile);
    match api.get_user_profile().await {
        Ok(profile) => {
            pending.settle([Action::SetUserProfile(profile)]);
        }
        Err(e) => pending.fail(&e, PROFILE_FAILED),
    }
}

pub async fn fetch_user_addresses(store: &Store, api: &dyn StorefrontApi) {
    let pending = Pending::begin(store, RequestKind::UserAddresses);
    match api.get_user_addresses().await {
        Ok(addresses) => {
            pending.settle([Action::SetUserAddresses(addresses)]);
        }
        Err(e) => pending.fail(&e, ADDRESSES_FAILED),
    }
}

/// Adds `quantity` units of `product` to the cart.
///
/// Rejected locally with "Out of stock" when the stock cannot cover the request.
/// Signed-in viewers sync the line with the backend first and the local cart only
/// changes once the backend accepted it; anonymous viewers keep a local cart.
pub async fn add_to_cart(store: &Store, api: &dyn StorefrontApi, product: &Product, quantity: i64) {
    // Cart additions do not supersede each other; only sign-out drops them.
    let pending = Pending::begin_shared(store, RequestKind::Cart);
    if quantity < 1 || product.quantity < quantity {
        tracing::debug!(product_id = product.product_id, quantity, stock = product.quantity, "cart rejected");
        pending.reject(OUT_OF_STOCK);
        return;
    }

    let item = CartItem::from_product(product, quantity);
    if store.viewer().is_authenticated {
        if let Err(e) = api.add_to_cart(product.product_id, quantity).await {
            pending.fail(&e, CART_FAILED);
            return;
        }
    }
    pending.settle([Action::AddCart(item)]);
}

/// Drops the product's line from the local cart.
pub fn remove_from_cart(store: &Store, product_id: i64) {
    store.dispatch(Action::RemoveCart(product_id));
}
