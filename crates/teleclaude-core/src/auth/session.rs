//! In-memory sessions and single-use OAuth state nonces.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

/// How long an issued OAuth `state` nonce stays redeemable, in minutes
pub const LOGIN_STATE_TTL_MINUTES: i64 = 10;

/// Most outstanding nonces kept at once; the oldest is evicted beyond this
pub const MAX_PENDING_LOGIN_STATES: usize = 1024;

/// Authorized session for an allow-listed identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Opaque session id (stored in the session cookie)
    pub id: String,
    /// Email shown in the navigation bar
    pub email: String,
    /// Provider login, when known
    pub login: Option<String>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session registry keyed by session id
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create an empty store whose sessions live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session for an authorized email
    pub fn create(&self, email: impl Into<String>, login: Option<String>) -> Session {
        self.create_at(email, login, Utc::now())
    }

    fn create_at(
        &self,
        email: impl Into<String>,
        login: Option<String>,
        now: DateTime<Utc>,
    ) -> Session {
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            login,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions
            .write()
            .insert(session.id.clone(), session.clone());
        session
    }

    /// Look up a live session. Expired sessions are dropped.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.get_at(id, Utc::now())
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<Session> {
        {
            let sessions = self.sessions.read();
            match sessions.get(id) {
                Some(session) if !session.is_expired_at(now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().remove(id);
        None
    }

    /// Revoke a session. Returns whether it existed.
    pub fn revoke(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    /// Number of stored sessions (including not-yet-purged expired ones)
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Outstanding OAuth `state` values, each redeemable once
#[derive(Debug, Default)]
pub struct LoginStates {
    /// Nonce -> (expiry, issue sequence)
    pending: RwLock<HashMap<String, (DateTime<Utc>, u64)>>,
    issued: AtomicU64,
}

impl LoginStates {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh nonce
    pub fn issue(&self) -> String {
        let state = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let mut pending = self.pending.write();
        pending.retain(|_, (exp, _)| *exp > now);
        while pending.len() >= MAX_PENDING_LOGIN_STATES {
            let oldest = pending
                .iter()
                .min_by_key(|(_, (_, seq))| *seq)
                .map(|(state, _)| state.clone());
            match oldest {
                Some(state) => {
                    pending.remove(&state);
                }
                None => break,
            }
        }
        let seq = self.issued.fetch_add(1, Ordering::Relaxed);
        pending.insert(
            state.clone(),
            (now + Duration::minutes(LOGIN_STATE_TTL_MINUTES), seq),
        );
        state
    }

    /// Redeem a nonce. True at most once per issued value, false once expired.
    pub fn consume(&self, state: &str) -> bool {
        match self.pending.write().remove(state) {
            Some((expires_at, _)) => Utc::now() < expires_at,
            None => false,
        }
    }

    /// Number of outstanding nonces
    pub fn len(&self) -> usize {
        self.pending.read().len()
    }

    /// Whether no nonce is outstanding
    pub fn is_empty(&self) -> bool {
        self.pending.read().is_empty()
    }
}
