//! Per-session client state container.
//!
//! A [`Store`] owns one [`State`] snapshot. Writers go through [`Store::dispatch`]
//! (synchronous actions) or the begin/settle pair used by async actions; readers
//! take a [`Store::snapshot`] that later dispatches never mutate.

pub mod reducers;
pub mod state;

use std::collections::HashMap;

use parking_lot::RwLock;

pub use reducers::{Action, reduce};
pub use state::{AuthState, CartState, ErrorState, OrderState, ProductState, RequestKind, State};

use crate::guard::Viewer;

/// RequestToken
///
/// Issued when an async action starts. Its completion is only applied while the
/// token is still the latest one issued for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub kind: RequestKind,
    pub generation: u64,
}

struct Inner {
    state: State,
    generations: HashMap<RequestKind, u64>,
}

/// Store
///
/// Shared by reference (`Arc<Store>`) between the handlers of one session. The lock
/// is never held across an `.await`.
pub struct Store {
    inner: RwLock<Inner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(State::default())
    }

    pub fn with_state(state: State) -> Self {
        Self {
            inner: RwLock::new(Inner {
                state,
                generations: HashMap::new(),
            }),
        }
    }

    /// Current snapshot. Cheap: clones one `Arc` per slice.
    pub fn snapshot(&self) -> State {
        self.inner.read().state.clone()
    }

    pub fn viewer(&self) -> Viewer {
        self.inner.read().state.viewer()
    }

    /// Applies a synchronous action.
    pub fn dispatch(&self, action: Action) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        inner.state = reduce(&inner.state, &action);
    }

    /// Starts a request of `kind`: marks it in flight and supersedes any earlier
    /// request of the same kind.
    pub fn begin(&self, kind: RequestKind) -> RequestToken {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let generation = {
            let counter = inner.generations.entry(kind).or_insert(0);
            *counter += 1;
            *counter
        };
        inner.state = reduce(&inner.state, &Action::RequestStarted(kind));
        RequestToken { kind, generation }
    }

    /// Starts a request of `kind` that runs alongside earlier ones instead of
    /// superseding them, as mutations must. Only [`Store::begin`] of the same kind or
    /// [`Store::invalidate_all`] makes the token stale.
    pub fn begin_shared(&self, kind: RequestKind) -> RequestToken {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let generation = *inner.generations.entry(kind).or_insert(0);
        inner.state = reduce(&inner.state, &Action::RequestJoined(kind));
        RequestToken { kind, generation }
    }

    /// Whether `token` is still the latest request of its kind.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.inner.read().generations.get(&token.kind).copied() == Some(token.generation)
    }

    /// Completes a request successfully. Applies `actions` followed by the success
    /// marker, or discards everything when the token was superseded. Returns whether
    /// the completion was applied.
    pub fn settle(&self, token: RequestToken, actions: impl IntoIterator<Item = Action>) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.generations.get(&token.kind).copied() != Some(token.generation) {
            tracing::debug!(kind = ?token.kind, generation = token.generation, "discarding superseded response");
            return false;
        }
        let mut state = inner.state.clone();
        for action in actions {
            state = reduce(&state, &action);
        }
        inner.state = reduce(&state, &Action::RequestSucceeded(token.kind));
        true
    }

    /// Completes a request with a failure message, unless superseded.
    pub fn fail(&self, token: RequestToken, message: impl Into<String>) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.generations.get(&token.kind).copied() != Some(token.generation) {
            tracing::debug!(kind = ?token.kind, generation = token.generation, "discarding superseded failure");
            return false;
        }
        inner.state = reduce(
            &inner.state,
            &Action::RequestFailed(token.kind, message.into()),
        );
        true
    }

    /// Withdraws a request whose caller stopped waiting for it, so its kind does
    /// not stay loading. Records neither success nor failure.
    pub fn abandon(&self, token: RequestToken) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.generations.get(&token.kind).copied() != Some(token.generation) {
            return false;
        }
        tracing::debug!(kind = ?token.kind, generation = token.generation, "request abandoned");
        inner.state = reduce(&inner.state, &Action::RequestAbandoned(token.kind));
        true
    }

    /// Makes every outstanding token stale and clears the loading markers. Used on
    /// sign-out so responses issued for the previous user never land.
    pub fn invalidate_all(&self) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        for kind in RequestKind::ALL {
            *inner.generations.entry(kind).or_insert(0) += 1;
        }
        inner.state = reduce(&inner.state, &Action::RequestsReset);
    }
}
