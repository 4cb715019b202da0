use std::{sync::Arc, thread, time::Duration};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
};
use storefront_web::{
    AppConfig, AppState, ConnectorState, MockApi, SessionRegistry, create_router,
    models::CartItem,
    session::{SESSION_COOKIE, session_id_from_headers},
    store::Action,
};
use tower::ServiceExt;
use uuid::Uuid;

fn mock_connector() -> ConnectorState {
    Arc::new(Arc::new(MockApi::new())) as ConnectorState
}

fn cookie_headers(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
    headers
}

#[test]
fn test_session_id_found_among_other_cookies() {
    let id = Uuid::new_v4();
    let headers = cookie_headers(&format!("theme=dark; {}={}; lang=en", SESSION_COOKIE, id));

    assert_eq!(session_id_from_headers(&headers), Some(id));
}

#[test]
fn test_malformed_or_missing_session_id() {
    let headers = cookie_headers(&format!("{}=not-a-uuid", SESSION_COOKIE));
    assert_eq!(session_id_from_headers(&headers), None);

    assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
}

#[test]
fn test_registry_opens_independent_sessions() {
    let connector = mock_connector();
    let registry = SessionRegistry::new();
    assert!(registry.is_empty());

    let first = registry.open(connector.as_ref());
    let second = registry.open(connector.as_ref());

    assert_eq!(registry.len(), 2);
    assert_ne!(first.id, second.id);
    assert!(Arc::ptr_eq(&registry.get(first.id).unwrap(), &first));
    assert!(registry.get(Uuid::new_v4()).is_none());

    // Sessions never share a store.
    first.store.dispatch(Action::AddCart(CartItem {
        product_id: 1,
        quantity: 1,
        ..CartItem::default()
    }));
    assert_eq!(first.store.snapshot().cart.items.len(), 1);
    assert!(second.store.snapshot().cart.items.is_empty());
}

// --- Lifecycle ---

#[test]
fn test_idle_sessions_are_evicted_when_new_ones_open() {
    let connector = mock_connector();
    let registry = SessionRegistry::with_ttl(Duration::from_millis(50));
    let idle = registry.open(connector.as_ref());

    thread::sleep(Duration::from_millis(100));
    let fresh = registry.open(connector.as_ref());

    assert_eq!(registry.len(), 1);
    assert!(registry.get(idle.id).is_none());
    assert!(registry.get(fresh.id).is_some());
}

#[test]
fn test_evict_idle_keeps_recently_seen_sessions() {
    let connector = mock_connector();
    let registry = SessionRegistry::with_ttl(Duration::from_millis(150));
    let idle = registry.open(connector.as_ref());
    let active = registry.open(connector.as_ref());

    thread::sleep(Duration::from_millis(100));
    assert!(registry.get(active.id).is_some());
    thread::sleep(Duration::from_millis(100));

    assert_eq!(registry.evict_idle(), 1);
    assert!(registry.get(active.id).is_some());
    assert!(registry.get(idle.id).is_none());
}

#[test]
fn test_expired_session_is_not_resumed() {
    let connector = mock_connector();
    let registry = SessionRegistry::with_ttl(Duration::from_millis(50));
    let session = registry.open(connector.as_ref());

    thread::sleep(Duration::from_millis(100));

    assert!(registry.get(session.id).is_none());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_health_checks_do_not_open_sessions() {
    let state = AppState::new(AppConfig::default(), mock_connector());
    let sessions = state.sessions.clone();
    let router = create_router(state);

    for _ in 0..50 {
        let response = router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
    assert!(sessions.is_empty());

    router
        .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(sessions.len(), 1);
}
