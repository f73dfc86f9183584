// src/auth/visitor.rs
//
// Anonymous visitor identity. The raw token lives only in the browser's
// cookie; the database sees its SHA-256.
use astra::Request;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const COOKIE_NAME: &str = "visitor";
pub const DEFAULT_TOKEN_BYTES: usize = 32;
const COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365;

/// Who is asking, and whether the response has to set the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    pub token: String,
    pub is_new: bool,
}

impl Visitor {
    /// Reuses the request's visitor cookie or mints a fresh token.
    pub fn from_request(req: &Request) -> Self {
        match cookie_value(req, COOKIE_NAME).filter(|t| is_well_formed(t)) {
            Some(token) => Self {
                token,
                is_new: false,
            },
            None => Self {
                token: generate_token_default(),
                is_new: true,
            },
        }
    }

    pub fn owner_hash(&self) -> [u8; 32] {
        hash_token(&self.token)
    }

    /// `Set-Cookie` value, only for visitors seen for the first time.
    pub fn set_cookie_header(&self) -> Option<String> {
        self.is_new.then(|| {
            format!(
                "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={COOKIE_MAX_AGE_SECS}",
                self.token
            )
        })
    }
}

/// Generate a secure random token using the OS RNG.
pub fn generate_token_default() -> String {
    let mut rng = OsRng;
    generate_token(&mut rng, DEFAULT_TOKEN_BYTES)
}

/// URL-safe base64 (no padding) of `nbytes` random bytes.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

pub fn hash_token(token: &str) -> [u8; 32] {
    let out = Sha256::digest(token.as_bytes());
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

fn is_well_formed(token: &str) -> bool {
    (16..=128).contains(&token.len())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// First value of cookie `name` across all `Cookie` headers.
pub fn cookie_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
}
