use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use once_cell::sync::Lazy;

/// bcrypt work factor for newly stored credentials.
pub const BCRYPT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Cost-10 hash that no submitted password matches, verified against when the
/// email is unknown so both login failures pay for one bcrypt round.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("dummy-credential-for-unknown-emails").ok());

/// How a stored credential is encoded, decided from its prefix.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CredentialScheme {
    Bcrypt,
    Argon2,
    /// Rows written before hashing was enforced. Still accepted, always flagged.
    LegacyPlaintext,
}

impl CredentialScheme {
    pub fn detect(stored: &str) -> Self {
        const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

        if BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p)) {
            CredentialScheme::Bcrypt
        } else if stored.starts_with("$argon2") {
            CredentialScheme::Argon2
        } else {
            CredentialScheme::LegacyPlaintext
        }
    }
}

/// Errors with `BcryptError::Truncation` past [`MAX_PASSWORD_BYTES`] rather
/// than storing a hash of a prefix.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::non_truncating_hash(password, BCRYPT_COST)
}

/// Outcome of checking a password against a stored credential.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Verification {
    pub matched: bool,
    /// `None` when the row holds no credential at all.
    pub scheme: Option<CredentialScheme>,
}

impl Verification {
    fn missing() -> Self {
        Self {
            matched: false,
            scheme: None,
        }
    }
}

/// Fails closed: a missing, empty or unparsable credential never matches.
pub fn verify_password(password: &str, stored: Option<&str>) -> Verification {
    let stored = match stored {
        Some(s) if !s.is_empty() => s,
        _ => return Verification::missing(),
    };

    let scheme = CredentialScheme::detect(stored);
    let matched = match scheme {
        // inputs over 72 bytes error out instead of matching on their prefix
        CredentialScheme::Bcrypt => bcrypt::non_truncating_verify(password, stored).unwrap_or(false),
        CredentialScheme::Argon2 => match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        },
        CredentialScheme::LegacyPlaintext => password == stored,
    };

    Verification {
        matched,
        scheme: Some(scheme),
    }
}

/// Spends one cost-10 bcrypt verification and always reports a mismatch.
pub fn verify_against_dummy(password: &str) -> bool {
    match DUMMY_HASH.as_deref() {
        Some(hash) => {
            let _ = bcrypt::non_truncating_verify(password, hash);
        }
        None => tracing::warn!("Dummy hash unavailable; unknown-email logins skip hashing work"),
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    #[test]
    fn detects_scheme_by_prefix() {
        assert_eq!(
            CredentialScheme::detect("$2b$10$abcdefghijklmnopqrstuu"),
            CredentialScheme::Bcrypt
        );
        assert_eq!(
            CredentialScheme::detect("$2y$12$whatever"),
            CredentialScheme::Bcrypt
        );
        assert_eq!(
            CredentialScheme::detect("$argon2id$v=19$m=19456,t=2,p=1$salt$hash"),
            CredentialScheme::Argon2
        );
        assert_eq!(
            CredentialScheme::detect("hunter22"),
            CredentialScheme::LegacyPlaintext
        );
    }

    #[test]
    fn bcrypt_round_trip() {
        let hashed = hash_password("secret1").unwrap();
        assert!(hashed.starts_with("$2b$10$"));

        let ok = verify_password("secret1", Some(&hashed));
        assert!(ok.matched);
        assert_eq!(ok.scheme, Some(CredentialScheme::Bcrypt));
        assert!(!verify_password("secret2", Some(&hashed)).matched);
    }

    #[test]
    fn long_password_is_not_matched_by_its_prefix() {
        let exact = "a".repeat(MAX_PASSWORD_BYTES);
        let hashed = hash_password(&exact).unwrap();

        assert!(verify_password(&exact, Some(&hashed)).matched);
        assert!(!verify_password(&format!("{exact}DIFFERENT"), Some(&hashed)).matched);
    }

    #[test]
    fn refuses_to_hash_past_bcrypt_input_limit() {
        let too_long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(
            hash_password(&too_long),
            Err(bcrypt::BcryptError::Truncation(73))
        ));
    }

    #[test]
    fn argon2_hashes_are_still_accepted() {
        let salt = SaltString::generate(&mut OsRng);
        let hashed = Argon2::default()
            .hash_password(b"secret1", &salt)
            .unwrap()
            .to_string();

        let ok = verify_password("secret1", Some(&hashed));
        assert!(ok.matched);
        assert_eq!(ok.scheme, Some(CredentialScheme::Argon2));
        assert!(!verify_password("wrong!", Some(&hashed)).matched);
    }

    #[test]
    fn legacy_plaintext_falls_back_to_equality() {
        let ok = verify_password("plainpass", Some("plainpass"));
        assert!(ok.matched);
        assert_eq!(ok.scheme, Some(CredentialScheme::LegacyPlaintext));

        // reported even on a mismatch so the row can still be flagged
        let wrong = verify_password("plainpass2", Some("plainpass"));
        assert!(!wrong.matched);
        assert_eq!(wrong.scheme, Some(CredentialScheme::LegacyPlaintext));
    }

    #[test]
    fn empty_or_missing_credential_fails_closed() {
        assert_eq!(verify_password("", Some("")), Verification::missing());
        assert_eq!(verify_password("anything", None), Verification::missing());
    }

    #[test]
    fn malformed_hash_does_not_match() {
        assert!(!verify_password("secret1", Some("$2b$10$tooshort")).matched);
        assert!(!verify_password("secret1", Some("$argon2id$garbage")).matched);
    }

    #[test]
    fn dummy_hash_is_cost_10_and_never_matches() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        assert!(dummy.starts_with("$2b$10$"));

        assert!(!verify_against_dummy("secret1"));
        assert!(!verify_against_dummy(""));
    }
}
