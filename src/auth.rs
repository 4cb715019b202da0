use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    guard::{NavigationRequest, PageClass, Viewer, decide_navigation},
    session::Session,
};

/// CurrentSession Extractor
///
/// Hands the session resolved by [`crate::session::attach_session`] to guards and
/// handlers. Rejects with 500 when the session layer is missing from the router,
/// which is a wiring bug rather than a client error.
#[derive(Clone)]
pub struct CurrentSession(pub Arc<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<Session>>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| {
                tracing::error!("session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }
}

/// CurrentViewer Extractor
///
/// The viewer derived from the session's auth slice at the time of the request.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Viewer);

impl<S> FromRequestParts<S> for CurrentViewer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        Ok(CurrentViewer(session.store.viewer()))
    }
}

/// enforce
///
/// Runs the access guard for `page_class` against the requested path and either
/// forwards the request or answers with the redirect the guard chose.
async fn enforce(
    page_class: PageClass,
    state: &AppState,
    session: &Session,
    request: Request,
    next: Next,
) -> Response {
    let viewer = session.store.viewer();
    let navigation = NavigationRequest::new(request.uri().path(), page_class);
    let decision = decide_navigation(&viewer, &navigation, &state.config.seller_allowed_prefixes);

    tracing::debug!(
        path = %navigation.target_path,
        ?page_class,
        ?decision,
        "access guard"
    );

    match decision.redirect_target() {
        None => next.run(request).await,
        Some(target) => Redirect::to(target).into_response(),
    }
}

/// Login and register screens: signed-in viewers are sent home.
pub async fn public_only(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    enforce(PageClass::Public, &state, &session, request, next).await
}

/// Checkout and profile screens: anonymous viewers are sent to login.
pub async fn authenticated_only(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    enforce(PageClass::Authenticated, &state, &session, request, next).await
}

/// Admin dashboard screens: admins, and sellers within the allow-list.
pub async fn restricted_only(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    enforce(PageClass::Restricted, &state, &session, request, next).await
}
