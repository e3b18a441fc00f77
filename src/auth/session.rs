//! Session token generation and the cookie it travels in.

use rand::Rng;

/// Session cookie (HttpOnly, holds the opaque session ID)
pub const SESSION_COOKIE_NAME: &str = "auth_session";

/// Generate a new opaque session ID
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    (0..32)
        .map(|_| {
            let idx = rng.random_range(0..36);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}
