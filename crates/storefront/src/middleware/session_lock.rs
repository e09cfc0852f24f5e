//! One request at a time per session.
//!
//! Handlers read the cart and checkout out of the session, change them and
//! write them back, and the session layer stores the record after the
//! handler returns. Two overlapping requests carrying the same session
//! cookie (a double-clicked "Place order", a client retry) would both start
//! from the same snapshot: both submits would commit an order, and one of
//! two cart edits would be lost. This layer sits outside the session layer
//! and makes such requests take turns, so the second one sees what the first
//! stored.
//!
//! Requests without a session cookie are not serialized; they get a fresh
//! session each.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

type Gate = Arc<tokio::sync::Mutex<()>>;

/// Per-session gates, keyed by the session cookie value.
///
/// An entry exists only while some request for that session is running or
/// waiting.
#[derive(Clone, Default)]
pub struct SessionLocks {
    gates: Arc<Mutex<HashMap<String, Gate>>>,
}

impl SessionLocks {
    /// Take a place in line for `key`.
    fn enter(&self, key: String) -> Turn {
        let gate = {
            let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(gates.entry(key.clone()).or_default())
        };

        Turn {
            locks: self.clone(),
            key,
            gate,
        }
    }

    /// Number of sessions with a request in flight.
    #[must_use]
    pub fn active(&self) -> usize {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A request's place in line. Dropping the last one for a key removes the
/// entry.
struct Turn {
    locks: SessionLocks,
    key: String,
    gate: Gate,
}

impl Drop for Turn {
    fn drop(&mut self) {
        let mut gates = self
            .locks
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The map holds one reference and this turn the other
        if Arc::strong_count(&self.gate) == 2 {
            gates.remove(&self.key);
        }
    }
}

/// Value of the session cookie, if the request carries one.
#[must_use]
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.to_owned())
        .filter(|value| !value.is_empty())
}

/// Middleware that runs requests for the same session one after another.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(key) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let turn = state.session_locks().enter(key);
    let held = Arc::clone(&turn.gate).lock_owned().await;
    let response = next.run(request).await;
    drop(held);
    drop(turn);

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn cookies(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_session_cookie_found_among_others() {
        let headers = cookies("theme=dark; shoe_session=abc123; lang=en");
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_cookie_missing_or_empty() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);
        assert_eq!(session_cookie(&cookies("theme=dark")), None);
        assert_eq!(session_cookie(&cookies("shoe_session=")), None);
        assert_eq!(session_cookie(&cookies("shoe_session_old=x")), None);
    }

    #[tokio::test]
    async fn test_same_session_waits_for_its_turn() {
        let locks = SessionLocks::default();

        let first = locks.enter("abc".to_string());
        let held = Arc::clone(&first.gate).lock_owned().await;

        let second = locks.enter("abc".to_string());
        assert!(second.gate.try_lock().is_err());

        // Another session is not blocked
        let other = locks.enter("xyz".to_string());
        assert!(other.gate.try_lock().is_ok());
        assert_eq!(locks.active(), 2);

        drop(held);
        assert!(second.gate.try_lock().is_ok());

        drop(first);
        assert_eq!(locks.active(), 2);
        drop(second);
        drop(other);
        assert_eq!(locks.active(), 0);
    }
}
