/*
[INPUT]:  Session tokens
[OUTPUT]: Set-Cookie header values for the session cookie
[POS]:    Auth layer - cookie formatting for web callers
[UPDATE]: When cookie name or attributes change
*/

use super::DEFAULT_TOKEN_TTL_SECONDS;

pub const SESSION_COOKIE: &str = "auth-token";

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, secure: bool) -> String {
    build(token, DEFAULT_TOKEN_TTL_SECONDS, secure)
}

/// `Set-Cookie` value that removes the session cookie
pub fn cleared_cookie(secure: bool) -> String {
    build("", 0, secure)
}

fn build(value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull the session token out of a `Cookie` request header
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi", true);
        assert!(cookie.starts_with("auth-token=abc.def.ghi;"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_cleared_cookie_expires_immediately() {
        let cookie = cleared_cookie(false);
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(
            token_from_cookie_header("theme=dark; auth-token=abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(token_from_cookie_header("auth-token="), None);
        assert_eq!(token_from_cookie_header("theme=dark"), None);
    }
}
