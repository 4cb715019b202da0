use std::sync::Arc;

use storefront_web::guard::Role;
use storefront_web::models::{CartItem, Order, OrderPage, Pagination, UserInfo};
use storefront_web::store::{Action, RequestKind, Store};

fn order_page(ids: &[i64]) -> OrderPage {
    OrderPage {
        content: ids
            .iter()
            .map(|id| Order {
                order_id: *id,
                total_amount: 10.0 * *id as f64,
                order_status: Some("Accepted".to_string()),
                ..Order::default()
            })
            .collect(),
        pagination: Pagination {
            page_number: 0,
            page_size: 6,
            total_elements: ids.len() as u64,
            total_pages: 1,
            last_page: true,
        },
    }
}

fn cart_item(product_id: i64, price: f64, special_price: Option<f64>, quantity: i64) -> CartItem {
    CartItem {
        product_id,
        product_name: format!("Product {}", product_id),
        price,
        special_price,
        quantity,
        ..CartItem::default()
    }
}

// --- Synchronous actions ---

#[test]
fn test_set_orders_round_trip_is_idempotent() {
    let store = Store::new();
    let page = order_page(&[1, 2, 3]);

    store.dispatch(Action::SetUserOrders(page.clone()));
    let first = store.snapshot();
    assert_eq!(first.orders.user_orders.as_ref(), Some(&page.content));
    assert_eq!(first.orders.user_pagination, Some(page.pagination));

    store.dispatch(Action::SetUserOrders(page.clone()));
    let second = store.snapshot();
    assert_eq!(*first.orders, *second.orders);
}

#[test]
fn test_snapshots_are_not_mutated_by_later_dispatches() {
    let store = Store::new();
    store.dispatch(Action::SetUserOrders(order_page(&[1])));
    let before = store.snapshot();

    store.dispatch(Action::SetUserOrders(order_page(&[2])));

    assert_eq!(before.orders.user_orders.as_ref().map(|o| o[0].order_id), Some(1));
    assert_eq!(
        store.snapshot().orders.user_orders.as_ref().map(|o| o[0].order_id),
        Some(2)
    );
}

#[test]
fn test_untouched_slices_are_shared_between_snapshots() {
    let store = Store::new();
    let before = store.snapshot();
    store.dispatch(Action::SetUserOrders(order_page(&[1])));
    let after = store.snapshot();

    assert!(Arc::ptr_eq(&before.auth, &after.auth));
    assert!(Arc::ptr_eq(&before.cart, &after.cart));
    assert!(!Arc::ptr_eq(&before.orders, &after.orders));
}

#[test]
fn test_login_and_logout_drive_the_viewer() {
    let store = Store::new();
    assert!(!store.viewer().is_authenticated);

    store.dispatch(Action::LoginUser(UserInfo {
        id: 1,
        username: "admin".to_string(),
        roles: vec!["ROLE_ADMIN".to_string()],
        ..UserInfo::default()
    }));
    store.dispatch(Action::SetUserOrders(order_page(&[1])));
    let viewer = store.viewer();
    assert!(viewer.is_authenticated);
    assert!(viewer.has_role(Role::Admin));

    store.dispatch(Action::LogOut);
    let state = store.snapshot();
    assert!(!state.viewer().is_authenticated);
    assert!(state.auth.user.is_none());
    assert!(state.orders.user_orders.is_none());
}

#[test]
fn test_cart_replaces_existing_line_and_recomputes_total() {
    let store = Store::new();
    store.dispatch(Action::AddCart(cart_item(1, 100.0, Some(80.0), 1)));
    store.dispatch(Action::AddCart(cart_item(2, 20.0, None, 2)));
    store.dispatch(Action::AddCart(cart_item(1, 100.0, Some(80.0), 3)));

    let cart = store.snapshot().cart;
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.items[0].quantity, 3);
    // 3 x 80 (special price) + 2 x 20
    assert!((cart.total_price - 280.0).abs() < f64::EPSILON);

    store.dispatch(Action::RemoveCart(1));
    let cart = store.snapshot().cart;
    assert_eq!(cart.items.len(), 1);
    assert!((cart.total_price - 40.0).abs() < f64::EPSILON);

    store.dispatch(Action::ClearCart);
    assert!(store.snapshot().cart.items.is_empty());
}

// --- Request markers and generations ---

#[test]
fn test_request_markers_track_loading_and_failure() {
    let store = Store::new();

    let token = store.begin(RequestKind::UserOrders);
    assert!(store.snapshot().errors.is_loading(RequestKind::UserOrders));

    assert!(store.fail(token, "Failed to fetch orders"));
    let errors = store.snapshot().errors;
    assert!(!errors.is_loading(RequestKind::UserOrders));
    assert_eq!(errors.failure(RequestKind::UserOrders), Some("Failed to fetch orders"));

    // A new attempt clears the old failure.
    let token = store.begin(RequestKind::UserOrders);
    assert_eq!(store.snapshot().errors.failure(RequestKind::UserOrders), None);
    assert!(store.settle(token, [Action::SetUserOrders(order_page(&[4]))]));
    assert!(!store.snapshot().errors.is_loading(RequestKind::UserOrders));
}

#[test]
fn test_superseded_response_is_discarded() {
    let store = Store::new();

    let stale = store.begin(RequestKind::UserOrders);
    let fresh = store.begin(RequestKind::UserOrders);
    assert!(!store.is_current(stale));

    // The newer request completes first, then the stale one arrives late.
    assert!(store.settle(fresh, [Action::SetUserOrders(order_page(&[2]))]));
    assert!(!store.settle(stale, [Action::SetUserOrders(order_page(&[1]))]));
    assert!(!store.fail(stale, "late failure"));

    let state = store.snapshot();
    assert_eq!(state.orders.user_orders.as_ref().map(|o| o[0].order_id), Some(2));
    assert_eq!(state.errors.failure(RequestKind::UserOrders), None);
}

#[test]
fn test_generations_are_per_kind() {
    let store = Store::new();
    let orders = store.begin(RequestKind::UserOrders);
    let _profile = store.begin(RequestKind::UserProfile);

    assert!(store.is_current(orders));
}

#[test]
fn test_invalidate_all_drops_in_flight_requests() {
    let store = Store::new();
    let orders = store.begin(RequestKind::UserOrders);
    let profile = store.begin(RequestKind::UserProfile);

    store.invalidate_all();

    assert!(!store.settle(orders, [Action::SetUserOrders(order_page(&[9]))]));
    assert!(!store.is_current(profile));
    assert!(store.snapshot().orders.user_orders.is_none());
}

#[test]
fn test_invalidate_all_clears_loading_markers() {
    let store = Store::new();
    let _orders = store.begin(RequestKind::UserOrders);

    store.invalidate_all();

    assert!(!store.snapshot().errors.is_loading(RequestKind::UserOrders));
}

#[test]
fn test_shared_requests_are_counted() {
    let store = Store::new();
    let first = store.begin_shared(RequestKind::Cart);
    let second = store.begin_shared(RequestKind::Cart);

    assert!(store.settle(first, [Action::AddCart(cart_item(1, 10.0, None, 1))]));
    assert!(store.snapshot().errors.is_loading(RequestKind::Cart));

    assert!(store.fail(second, "Out of stock"));
    let errors = store.snapshot().errors;
    assert!(!errors.is_loading(RequestKind::Cart));
    assert_eq!(errors.failure(RequestKind::Cart), Some("Out of stock"));
    assert_eq!(store.snapshot().cart.items.len(), 1);
}

#[test]
fn test_abandoned_request_records_no_outcome() {
    let store = Store::new();
    let token = store.begin(RequestKind::UserProfile);

    assert!(store.abandon(token));

    let errors = store.snapshot().errors;
    assert!(!errors.is_loading(RequestKind::UserProfile));
    assert_eq!(errors.failure(RequestKind::UserProfile), None);
    assert!(store.snapshot().auth.profile.is_none());

    // A superseded token cannot withdraw the newer request.
    let stale = store.begin(RequestKind::UserProfile);
    let _fresh = store.begin(RequestKind::UserProfile);
    assert!(!store.abandon(stale));
    assert!(store.snapshot().errors.is_loading(RequestKind::UserProfile));
}
