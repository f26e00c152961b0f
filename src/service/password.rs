//! Password hashing and strength validation.
//!
//! Hashes are argon2id PHC strings. Hashing and verification are CPU-bound
//! and run on the blocking pool.

use std::collections::HashMap;
use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use regex::Regex;

use crate::error::FleetError;

/// Hashes starting with this marker (or empty) never verify.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

pub const MIN_PASSWORD_LENGTH: usize = 8;

const MAX_SIMILARITY: f64 = 0.7;

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern"));

const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "12345678", "1234", "qwerty", "12345", "dragon", "baseball",
    "football", "letmein", "monkey", "696969", "abc123", "mustang", "michael", "shadow",
    "master", "jennifer", "111111", "2000", "jordan", "superman", "harley", "1234567",
    "hunter", "trustno1", "ranger", "buster", "thomas", "tigger", "robert", "soccer",
    "batman", "test", "pass", "killer", "hockey", "george", "charlie", "andrew",
    "michelle", "love", "sunshine", "jessica", "pepper", "daniel", "access", "123456789",
    "654321", "joshua", "maggie", "starwars", "silver", "william", "dallas", "yankees",
    "123123", "ashley", "666666", "hello", "amanda", "orange", "freedom", "computer",
    "thunder", "nicole", "ginger", "heather", "hammer", "summer", "corvette", "taylor",
    "austin", "1111", "merlin", "matthew", "121212", "golfer", "cheese", "princess",
    "martin", "chelsea", "patrick", "richard", "diamond", "yellow", "bigdog", "secret",
    "asdfgh", "sparky", "cowboy", "iloveyou", "admin", "password1", "qwerty123",
    "password123", "1q2w3e4r", "zaq12wsx", "taxi1234",
];

pub async fn hash_password(password: &str) -> Result<String, FleetError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| FleetError::PasswordHash(e.to_string()))
    })
    .await?
}

/// `Ok(false)` on mismatch, unusable hashes included.
pub async fn verify_password(password: &str, encoded: &str) -> Result<bool, FleetError> {
    if !is_password_usable(encoded) {
        return Ok(false);
    }
    let password = password.to_string();
    let encoded = encoded.to_string();
    tokio::task::spawn_blocking(move || {
        let parsed =
            PasswordHash::new(&encoded).map_err(|e| FleetError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}

pub fn is_password_usable(encoded: &str) -> bool {
    !encoded.is_empty() && !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Run every strength check; all failures are reported, not just the first.
///
/// `user_attributes` are compared for similarity (username, names).
pub fn validate_password(password: &str, user_attributes: &[&str]) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(msg) = check_similarity(password, user_attributes) {
        errors.push(msg);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    let lower = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lower.as_str()) {
        errors.push("This password is too common.".to_string());
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_string());
    }
    errors
}

fn check_similarity(password: &str, user_attributes: &[&str]) -> Result<(), String> {
    let password = password.to_lowercase();
    for attr in user_attributes.iter().filter(|a| !a.is_empty()) {
        let value = attr.to_lowercase();
        let parts = NON_WORD_RE
            .split(&value)
            .chain(std::iter::once(value.as_str()))
            .filter(|p| !p.is_empty());
        for part in parts {
            if exceeds_maximum_length_ratio(&password, part) {
                continue;
            }
            if quick_ratio(&password, part) >= MAX_SIMILARITY {
                return Err("The password is too similar to your personal information.".to_string());
            }
        }
    }
    Ok(())
}

/// A part much shorter than the password can't make it similar.
fn exceeds_maximum_length_ratio(password: &str, part: &str) -> bool {
    let pwd_len = password.chars().count();
    let part_len = part.chars().count();
    let length_bound = MAX_SIMILARITY / 2.0 * pwd_len as f64;
    pwd_len >= 10 * part_len && (part_len as f64) < length_bound
}

/// Upper bound on the matching-blocks ratio: `2 * shared chars / (len(a) + len(b))`,
/// counting shared characters as a multiset intersection.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut avail: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *avail.entry(c).or_default() += 1;
    }
    let mut matches = 0usize;
    let mut a_len = 0usize;
    for c in a.chars() {
        a_len += 1;
        if let Some(n) = avail.get_mut(&c).filter(|n| **n > 0) {
            *n -= 1;
            matches += 1;
        }
    }
    let total = a_len + b.chars().count();
    if total == 0 {
        return 1.0;
    }
    (2 * matches) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("#0;8{P0>EVjY").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("#0;8{P0>EVjY", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn unusable_hash_never_verifies() {
        assert!(!verify_password("", "").await.unwrap());
        assert!(!verify_password("anything", "!").await.unwrap());
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_password("#0;8{P0>EVjY", &["testdriver", "Test", "Driver"]).is_empty());
    }

    #[test]
    fn weak_passwords_collect_every_failure() {
        let errors = validate_password("1234", &[]);
        assert!(errors.iter().any(|e| e.contains("too short")));
        assert!(errors.iter().any(|e| e.contains("too common")));
        assert!(errors.iter().any(|e| e.contains("entirely numeric")));
    }

    #[test]
    fn short_name_parts_are_ignored() {
        assert_eq!(quick_ratio("testing#9x!qz", "test"), 8.0 / 17.0);
        assert!(validate_password("Reliable#2024xq", &["Li"]).is_empty());
        assert!(exceeds_maximum_length_ratio("abcdefghijklmnopqrstu", "ab"));
    }

    #[test]
    fn hyphenated_name_part_still_matches() {
        let errors = validate_password("lindqvist1", &["Berg-Lindqvist"]);
        assert!(errors.iter().any(|e| e.contains("too similar")));
    }

    #[test]
    fn password_like_username_is_rejected() {
        let errors = validate_password("testdriver1", &["testdriver"]);
        assert_eq!(
            errors,
            vec!["The password is too similar to your personal information.".to_string()]
        );
    }
}
