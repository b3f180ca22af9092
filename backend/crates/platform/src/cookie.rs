//! Cookie Handling Infrastructure
//!
//! Building and parsing of session cookies. Session cookies are always
//! HttpOnly; the remaining attributes are driven by configuration.

use std::str::FromStr;

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(format!("unknown SameSite value: {other}")),
        }
    }
}

/// Attributes applied to every session cookie
#[derive(Debug, Clone)]
pub struct CookieAttributes {
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

/// Build a Set-Cookie value that establishes a session
pub fn session_cookie(name: &str, value: &str, attrs: &CookieAttributes) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly");

    if attrs.secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str("; SameSite=");
    cookie.push_str(attrs.same_site.as_str());
    cookie.push_str("; Path=");
    cookie.push_str(&attrs.path);

    if let Some(max_age) = attrs.max_age_secs {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }

    cookie
}

/// Build a Set-Cookie value that removes the cookie
///
/// Attributes other than Max-Age must match the original cookie or some
/// browsers keep the old one around.
pub fn expired_cookie(name: &str, attrs: &CookieAttributes) -> String {
    let mut attrs = attrs.clone();
    attrs.max_age_secs = Some(0);
    session_cookie(name, "", &attrs)
}

/// Convert a cookie string into a header value
///
/// Cookie strings built by this module are always valid header values;
/// the fallback only fires for caller-supplied names/values with
/// control characters.
pub fn to_header_value(cookie: &str) -> HeaderValue {
    HeaderValue::from_str(cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Extract a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=')
            && key == name
        {
            return Some(value.to_string());
        }
    }

    None
}
