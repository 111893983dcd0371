//! Upload API request signing.
//!
//! The service authenticates mutating API calls with a digest over the
//! request parameters: sort by key, join as `k=v` pairs with `&`, append the
//! API secret, hash. We sign with SHA-256; the service detects the algorithm
//! from the digest length.

use sha2::{Digest, Sha256};

/// Hex digest over the sorted parameter string plus the secret.
pub fn api_sign_request(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
