//! Signed session cookies
//!
//! The cookie value is `{session_id}.{hex(hmac_sha256(secret, session_id))}`.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Encodes and decodes the session cookie
#[derive(Clone)]
pub struct SessionCookie {
    name: String,
    secret: String,
    max_age_secs: i64,
    secure: bool,
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .field("max_age_secs", &self.max_age_secs)
            .field("secure", &self.secure)
            .finish()
    }
}

impl SessionCookie {
    pub fn new(
        name: impl Into<String>,
        secret: impl Into<String>,
        max_age_secs: i64,
        secure: bool,
    ) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
            max_age_secs,
            secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sign a session id into a cookie value
    pub fn sign(&self, session_id: &str) -> String {
        let signature = compute_hmac(session_id.as_bytes(), self.secret.as_bytes());
        format!("{}.{}", session_id, hex::encode(signature))
    }

    /// Verify a cookie value and extract the session id
    ///
    /// Returns `None` for malformed or tampered values.
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (session_id, signature_hex) = cookie_value.rsplit_once('.')?;

        let actual = hex::decode(signature_hex).ok()?;
        let expected = compute_hmac(session_id.as_bytes(), self.secret.as_bytes());

        if constant_time_eq(&expected, &actual) {
            Some(session_id.to_owned())
        } else {
            warn!(
                cookie_prefix = %cookie_value.chars().take(8).collect::<String>(),
                "Session cookie signature mismatch"
            );
            None
        }
    }

    /// `Set-Cookie` value binding the given session
    pub fn set_cookie(&self, session_id: &str) -> String {
        self.render(&self.sign(session_id), self.max_age_secs)
    }

    /// `Set-Cookie` value that removes the cookie
    pub fn clear_cookie(&self) -> String {
        self.render("", 0)
    }

    /// Extract a verified session id from the request `Cookie` headers
    pub fn session_id_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| self.verify(value))
    }

    fn render(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
            self.name, value, max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

fn compute_hmac(message: &[u8], key: &[u8]) -> Vec<u8> {
    // HMAC-SHA256 accepts keys of any length
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
