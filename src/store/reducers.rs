use std::sync::Arc;

use crate::models::{Address, CartItem, CategoryPage, OrderPage, ProductPage, UserInfo, UserProfile};

use super::state::{AuthState, CartState, ErrorState, OrderState, ProductState, RequestKind, State};

/// Action
///
/// Every synchronous state transition the container accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoginUser(UserInfo),
    LogOut,
    SetUserProfile(UserProfile),
    SetUserAddresses(Vec<Address>),
    SetProducts(ProductPage),
    SetCategories(CategoryPage),
    SetUserOrders(OrderPage),
    SetManagedOrders(OrderPage),
    AddCart(CartItem),
    RemoveCart(i64),
    ClearCart,
    /// A request that replaces any outstanding one of its kind.
    RequestStarted(RequestKind),
    /// A request that runs alongside outstanding ones of its kind.
    RequestJoined(RequestKind),
    RequestSucceeded(RequestKind),
    RequestFailed(RequestKind, String),
    /// The caller stopped waiting; no outcome is recorded.
    RequestAbandoned(RequestKind),
    /// Every outstanding request was invalidated.
    RequestsReset,
}

/// Applies `action` to `state`, returning the next snapshot. Slices the action does
/// not touch are shared with `state`.
pub fn reduce(state: &State, action: &Action) -> State {
    let mut next = state.clone();
    if let Some(auth) = auth_reducer(&state.auth, action) {
        next.auth = Arc::new(auth);
    }
    if let Some(products) = product_reducer(&state.products, action) {
        next.products = Arc::new(products);
    }
    if let Some(orders) = order_reducer(&state.orders, action) {
        next.orders = Arc::new(orders);
    }
    if let Some(cart) = cart_reducer(&state.cart, action) {
        next.cart = Arc::new(cart);
    }
    if let Some(errors) = error_reducer(&state.errors, action) {
        next.errors = Arc::new(errors);
    }
    next
}

fn auth_reducer(state: &AuthState, action: &Action) -> Option<AuthState> {
    match action {
        Action::LoginUser(user) => Some(AuthState {
            user: Some(user.clone()),
            ..state.clone()
        }),
        Action::LogOut => Some(AuthState::default()),
        Action::SetUserProfile(profile) => Some(AuthState {
            profile: Some(profile.clone()),
            ..state.clone()
        }),
        Action::SetUserAddresses(addresses) => Some(AuthState {
            addresses: Some(addresses.clone()),
            ..state.clone()
        }),
        _ => None,
    }
}

fn product_reducer(state: &ProductState, action: &Action) -> Option<ProductState> {
    match action {
        Action::SetProducts(page) => Some(ProductState {
            products: Some(page.content.clone()),
            pagination: Some(page.pagination),
            ..state.clone()
        }),
        Action::SetCategories(page) => Some(ProductState {
            categories: Some(page.content.clone()),
            ..state.clone()
        }),
        _ => None,
    }
}

fn order_reducer(state: &OrderState, action: &Action) -> Option<OrderState> {
    match action {
        Action::SetUserOrders(page) => Some(OrderState {
            user_orders: Some(page.content.clone()),
            user_pagination: Some(page.pagination),
            ..state.clone()
        }),
        Action::SetManagedOrders(page) => Some(OrderState {
            managed_orders: Some(page.content.clone()),
            managed_pagination: Some(page.pagination),
            ..state.clone()
        }),
        Action::LogOut => Some(OrderState::default()),
        _ => None,
    }
}

fn cart_reducer(state: &CartState, action: &Action) -> Option<CartState> {
    let items = match action {
        Action::AddCart(item) => {
            let mut items = state.items.clone();
            match items.iter_mut().find(|i| i.product_id == item.product_id) {
                Some(existing) => *existing = item.clone(),
                None => items.push(item.clone()),
            }
            items
        }
        Action::RemoveCart(product_id) => state
            .items
            .iter()
            .filter(|i| i.product_id != *product_id)
            .cloned()
            .collect(),
        Action::ClearCart => Vec::new(),
        _ => return None,
    };

    let total_price = items
        .iter()
        .map(|i| i.effective_price() * i.quantity as f64)
        .sum();
    Some(CartState { items, total_price })
}

fn error_reducer(state: &ErrorState, action: &Action) -> Option<ErrorState> {
    let mut next = state.clone();
    match action {
        Action::RequestStarted(kind) => {
            next.in_flight.insert(*kind, 1);
            next.failures.remove(kind);
        }
        Action::RequestJoined(kind) => {
            *next.in_flight.entry(*kind).or_insert(0) += 1;
            next.failures.remove(kind);
        }
        Action::RequestSucceeded(kind) => {
            release(&mut next, *kind);
            next.failures.remove(kind);
        }
        Action::RequestFailed(kind, message) => {
            release(&mut next, *kind);
            next.failures.insert(*kind, message.clone());
        }
        Action::RequestAbandoned(kind) => release(&mut next, *kind),
        Action::RequestsReset => next.in_flight.clear(),
        Action::LogOut => next = ErrorState::default(),
        _ => return None,
    }
    Some(next)
}

fn release(errors: &mut ErrorState, kind: RequestKind) {
    if let Some(count) = errors.in_flight.get_mut(&kind) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            errors.in_flight.remove(&kind);
        }
    }
}
