use crate::blog::{SessionID, SESSION_COOKIE};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;

/// Per-client session. Handlers get one from [`super::State::get_session`],
/// change it, and hand it back to [`super::State::commit_session`]; nothing
/// is visible to other requests until then.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionID,
    // each value is read at most once
    flashes: HashMap<String, String>,
    expires_at: std::time::Instant,
}

impl Session {
    fn new(ttl: std::time::Duration) -> Session {
        Session {
            id: crate::blog::get_random_hex_string::<{ crate::blog::SESSION_ID_BYTES }>(),
            flashes: HashMap::new(),
            expires_at: std::time::Instant::now() + ttl,
        }
    }

    pub fn is_valid(&self) -> bool {
        std::time::Instant::now() < self.expires_at
    }

    pub fn id(&self) -> &SessionID {
        &self.id
    }

    /// Reading a flashed value removes it from the session.
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.flashes.remove(key)
    }

    pub fn flash(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.flashes.insert(key.into(), value.into());
    }
}

impl super::State {
    /// The session named by the request's cookie, or a fresh one if the
    /// cookie is missing, unknown or expired.
    pub async fn get_session(&self, cookies: &CookieJar) -> Session {
        let existing = match cookies.get(SESSION_COOKIE) {
            Some(cookie) => {
                let sessions = self.sessions.read().await;
                sessions
                    .get(cookie.value())
                    .filter(|session| session.is_valid())
                    .cloned()
            }
            None => None,
        };

        existing.unwrap_or_else(|| {
            let session = Session::new(self.session_ttl);
            tracing::debug!(session = %session.id, "starting new session");
            session
        })
    }

    /// Returns the `Set-Cookie` value that points the client at the session.
    /// Only sessions with unread flashes are kept; once the last one is read
    /// the session leaves the table.
    pub async fn commit_session(&self, mut session: Session) -> String {
        let cookie = Cookie::build((SESSION_COOKIE, session.id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
            .to_string();

        let mut sessions = self.sessions.write().await;
        if session.flashes.is_empty() {
            sessions.remove(&session.id);
        } else {
            session.expires_at = std::time::Instant::now() + self.session_ttl;
            sessions.retain(|_, session| session.is_valid());
            sessions.insert(session.id.clone(), session);
        }

        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn state(ttl: Duration) -> State {
        State::new(Arc::new(MemoryStore::default()), ttl)
    }

    fn jar_for(set_cookie: &str) -> CookieJar {
        CookieJar::new().add(Cookie::parse(set_cookie.to_owned()).unwrap())
    }

    #[test]
    fn flashed_values_are_read_once() {
        let mut session = Session::new(Duration::from_secs(60));
        session.flash("globalMessage", "hello");
        session.flash("other", "kept");

        assert_eq!(session.get("globalMessage").as_deref(), Some("hello"));
        assert_eq!(session.get("globalMessage"), None);
        assert_eq!(session.get("other").as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn missing_cookie_starts_fresh_session() {
        let state = state(Duration::from_secs(60));
        let first = state.get_session(&CookieJar::new()).await;
        let second = state.get_session(&CookieJar::new()).await;

        assert_ne!(first.id(), second.id());
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn committed_session_round_trips_through_cookie() {
        let state = state(Duration::from_secs(60));
        let mut session = state.get_session(&CookieJar::new()).await;
        let id = session.id().clone();
        session.flash("globalMessage", "saved");

        let set_cookie = state.commit_session(session).await;
        assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}={id}")));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/"));

        let mut session = state.get_session(&jar_for(&set_cookie)).await;
        assert_eq!(session.id(), &id);
        assert_eq!(session.get("globalMessage").as_deref(), Some("saved"));
        state.commit_session(session).await;
        assert!(state.sessions.read().await.is_empty());

        let mut session = state.get_session(&jar_for(&set_cookie)).await;
        assert_eq!(session.get("globalMessage"), None);
    }

    #[tokio::test]
    async fn sessions_without_flashes_are_not_stored() {
        let state = state(Duration::from_secs(60));
        for _ in 0..100 {
            let session = state.get_session(&CookieJar::new()).await;
            let set_cookie = state.commit_session(session).await;
            assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
        }

        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn unread_flashes_keep_session_stored() {
        let state = state(Duration::from_secs(60));
        let mut session = state.get_session(&CookieJar::new()).await;
        session.flash("globalMessage", "first");
        session.flash("other", "second");
        let set_cookie = state.commit_session(session).await;

        let mut session = state.get_session(&jar_for(&set_cookie)).await;
        assert_eq!(session.get("globalMessage").as_deref(), Some("first"));
        state.commit_session(session).await;
        assert_eq!(state.sessions.read().await.len(), 1);

        let mut session = state.get_session(&jar_for(&set_cookie)).await;
        assert_eq!(session.get("other").as_deref(), Some("second"));
        state.commit_session(session).await;
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn expired_sessions_are_replaced_and_pruned() {
        let state = state(Duration::ZERO);
        let mut session = state.get_session(&CookieJar::new()).await;
        let id = session.id().clone();
        session.flash("globalMessage", "too late");
        let set_cookie = state.commit_session(session).await;

        let mut fresh = state.get_session(&jar_for(&set_cookie)).await;
        assert_ne!(fresh.id(), &id);
        assert_eq!(fresh.get("globalMessage"), None);

        fresh.flash("globalMessage", "again");
        state.commit_session(fresh).await;
        assert!(!state.sessions.read().await.contains_key(&id));
    }
}
