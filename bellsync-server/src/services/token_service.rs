use std::sync::Mutex;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::configs::settings::Auth;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Holds the single outstanding bearer token for the device owner.
///
/// Token state is deliberately in-memory only: a process restart invalidates
/// every session and forces a fresh login. Issue-and-invalidate happens in
/// one critical section, so there is no window with two valid tokens.
pub struct TokenService {
    ttl: Duration,
    current: Mutex<Option<IssuedToken>>,
}

impl TokenService {
    pub fn new(auth: &Auth) -> Self {
        Self {
            ttl: Duration::seconds(auth.token_ttl_secs as i64),
            current: Mutex::new(None),
        }
    }

    /// Generates a fresh random token, replacing any outstanding one with no
    /// grace period.
    pub fn issue(&self) -> IssuedToken {
        let issued_at = OffsetDateTime::now_utc();
        let issued = IssuedToken {
            token: Uuid::new_v4().simple().to_string(),
            issued_at,
            expires_at: issued_at + self.ttl,
        };

        let mut current = self.current.lock().expect("token state lock poisoned");
        *current = Some(issued.clone());

        issued
    }

    /// True iff `presented` equals the outstanding token and it has not
    /// expired. An expired token is dropped on the spot.
    pub fn validate(&self, presented: &str) -> bool {
        let mut current = self.current.lock().expect("token state lock poisoned");

        let (matches, expired) = match current.as_ref() {
            Some(issued) => (
                issued.token == presented,
                OffsetDateTime::now_utc() >= issued.expires_at,
            ),
            None => return false,
        };

        if matches && expired {
            *current = None;
        }

        matches && !expired
    }

    pub fn revoke(&self) {
        let mut current = self.current.lock().expect("token state lock poisoned");
        *current = None;
    }
}
