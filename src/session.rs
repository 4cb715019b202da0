use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    AppState,
    api::{ApiConnector, ApiState},
    config::DEFAULT_SESSION_TTL_SECS,
    store::Store,
    summary::SummaryCards,
};

pub const SESSION_COOKIE: &str = "storefront_session";

/// Session
///
/// Everything the shell keeps for one browser: its state container, its API
/// handle (and with it the backend credentials) and its summary cards.
pub struct Session {
    pub id: Uuid,
    pub store: Store,
    pub api: ApiState,
    pub summaries: SummaryCards,
    last_seen: Mutex<Instant>,
}

impl Session {
    pub fn new(api: ApiState) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: Store::new(),
            api,
            summaries: SummaryCards::new(),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }
}

/// SessionRegistry
///
/// Maps session ids to live sessions. Cloning shares the same registry. Sessions
/// idle for longer than `ttl` are treated as gone and evicted.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    /// Live session for `id`, marked as seen. An expired session is removed and
    /// reported as missing.
    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.read().get(&id).cloned()?;
        if session.idle_for() > self.ttl {
            self.sessions.write().remove(&id);
            tracing::debug!(session_id = %id, "session expired");
            return None;
        }
        session.touch();
        Some(session)
    }

    /// Opens a new session backed by a fresh API handle from `connector`. Idle
    /// sessions are swept first.
    pub fn open(&self, connector: &dyn ApiConnector) -> Arc<Session> {
        self.evict_idle();
        let session = Arc::new(Session::new(connector.connect()));
        self.sessions.write().insert(session.id, session.clone());
        tracing::debug!(session_id = %session.id, "session opened");
        session
    }

    /// Drops every session idle for longer than the TTL. Returns how many went.
    pub fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, live = sessions.len(), "evicted idle sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Extracts the session id from the request's `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// attach_session
///
/// Resolves the caller's session (opening one when the cookie is missing or stale),
/// makes it available to guards and handlers as a request extension and sets the
/// session cookie on the response when the session is new.
pub async fn attach_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = session_id_from_headers(request.headers()).and_then(|id| state.sessions.get(id));
    let (session, is_new) = match existing {
        Some(session) => (session, false),
        None => (state.sessions.open(state.connector.as_ref()), true),
    };

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session.id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("invalid session cookie: {}", e),
        }
    }
    response
}
