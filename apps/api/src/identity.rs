use std::net::SocketAddr;

use axum::http::HeaderMap;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Derives the opaque requester identity the engagement ledger is keyed on.
///
/// One primitive, two scopes: `hash(ip, Some(day))` yields a day-scoped
/// identity (the same requester hashes differently each calendar day, which
/// is what makes "one vote per day" enforceable as a plain uniqueness
/// check), while `hash(ip, None)` yields a permanent identity for likes.
/// Raw IPs are never stored.
#[derive(Clone)]
pub struct IdentityHasher {
    secret: String,
}

impl IdentityHasher {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// `hex(sha256(ip || secret || iso_date?))`, 64 lowercase hex chars.
    pub fn hash(&self, client_ip: &str, day: Option<NaiveDate>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(client_ip.as_bytes());
        hasher.update(self.secret.as_bytes());
        if let Some(day) = day {
            hasher.update(day.format("%Y-%m-%d").to_string().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Resolves the client IP for identity hashing. Precedence: first entry of
/// `X-Forwarded-For`, then `X-Real-IP`, then the transport peer address.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_hash_is_64_hex_chars() {
        let hasher = IdentityHasher::new("secret");
        let hash = hasher.hash("203.0.113.7", None);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_day_scope_changes_across_days() {
        let hasher = IdentityHasher::new("secret");
        let monday = hasher.hash("203.0.113.7", Some(date(2024, 6, 3)));
        let tuesday = hasher.hash("203.0.113.7", Some(date(2024, 6, 4)));
        assert_ne!(monday, tuesday);
    }

    #[test]
    fn test_permanent_scope_is_stable() {
        let hasher = IdentityHasher::new("secret");
        assert_eq!(
            hasher.hash("203.0.113.7", None),
            hasher.hash("203.0.113.7", None)
        );
        assert_ne!(
            hasher.hash("203.0.113.7", None),
            hasher.hash("203.0.113.8", None)
        );
    }

    #[test]
    fn test_derivation_matches_manual_sha256() {
        let hasher = IdentityHasher::new("s3cr3t");
        let expected = {
            let mut h = Sha256::new();
            h.update(b"203.0.113.7s3cr3t2024-06-03");
            hex::encode(h.finalize())
        };
        assert_eq!(hasher.hash("203.0.113.7", Some(date(2024, 6, 3))), expected);
    }

    #[test]
    fn test_client_ip_precedence() {
        let peer: SocketAddr = "198.51.100.9:443".parse().unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer), "198.51.100.9");

        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.20"));
        assert_eq!(client_ip(&headers, peer), "192.0.2.20");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, peer), "203.0.113.7");
    }
}
