//! Session cookie handling.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::SESSION_COOKIE_NAME;
use crate::domain::Guest;
use crate::services::Session;

/// Session identifier carried by the request, if any.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| !id.is_empty())
}

/// Anonymous caller context for this request.
pub fn guest(jar: &CookieJar) -> Guest {
    Guest::new(session_id(jar))
}

/// Cookie carrying the session id.
///
/// Remembered sessions get a `Max-Age` matching the server-side lifetime;
/// all others end with the browser session.
pub fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    let builder = Cookie::build((SESSION_COOKIE_NAME, session.id.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure);

    if session.remember {
        let max_age = i64::try_from(session.lifetime_secs).unwrap_or(i64::MAX);
        builder.max_age(Duration::seconds(max_age)).build()
    } else {
        builder.build()
    }
}

pub fn with_session(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    jar.add(session_cookie(session, secure))
}

pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/").build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(remember: bool, lifetime_secs: u64) -> Session {
        Session {
            id: "abc".to_string(),
            lifetime_secs,
            remember,
        }
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie(&session(false, 7200), true);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), None);
    }

    #[test]
    fn test_remembered_session_cookie_persists() {
        let cookie = session_cookie(&session(true, 30 * 24 * 3600), false);

        assert_eq!(cookie.max_age(), Some(Duration::days(30)));
        assert!(cookie.to_string().contains("Max-Age=2592000"));
    }

    #[test]
    fn test_guest_reads_session_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, "xyz"));
        assert_eq!(guest(&jar).session_id.as_deref(), Some("xyz"));
        assert_eq!(guest(&CookieJar::new()).session_id, None);
    }
}
