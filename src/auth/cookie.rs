use axum::http::{header, HeaderMap};

/// Name of the cookie that carries the bearer token
pub const TOKEN_COOKIE: &str = "token";

/// Build a `Set-Cookie` value for the token: HTTP-only, strict same-site.
pub fn token_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        TOKEN_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Expire the token cookie immediately
pub fn clear_token_cookie(secure: bool) -> String {
    token_cookie("", 0, secure)
}

/// Find a cookie value by name across all `Cookie` headers
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
