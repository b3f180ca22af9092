//! Session Entity
//!
//! Server-side session state. The client only holds a signed cookie
//! referencing the session id.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{AccountId, SessionId};

/// Server-side session
#[derive(Debug, Clone)]
pub struct Session {
    /// Session identifier, referenced by the cookie
    pub session_id: SessionId,
    /// Account this session belongs to
    pub account_id: AccountId,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last request seen on this session
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with the given lifetime
    pub fn new(account_id: AccountId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            account_id,
            expires_at: now + ttl,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Record activity on this session
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}
