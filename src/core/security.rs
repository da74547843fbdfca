use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::core::config::Settings;

// Argon2id, tuned for interactive logins.
const MEMORY_KIB: u32 = 102_400;
const ITERATIONS: u32 = 2;
const LANES: u32 = 8;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("could not hash password")]
    PasswordHash,
    #[error("could not verify password")]
    PasswordVerify,
    #[error("could not issue access token")]
    TokenIssue,
    #[error("could not decode access token")]
    TokenDecode,
    #[error("unsupported signing algorithm: {0}")]
    BadAlgorithm(String),
}

/// Access token payload. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
}

fn hasher() -> Result<Argon2<'static>, SecurityError> {
    let params = argon2::Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|_| SecurityError::PasswordHash)?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

pub(crate) fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| SecurityError::PasswordHash)?;

    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecurityError::PasswordVerify)?;

    match hasher()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(SecurityError::PasswordVerify),
    }
}

pub(crate) fn create_access_token(
    subject: &str,
    settings: &Settings,
    expires_in: Option<Duration>,
) -> Result<String, SecurityError> {
    let algorithm = signing_algorithm(settings)?;
    let issued_at = OffsetDateTime::now_utc();
    let lifetime = expires_in.unwrap_or_else(|| {
        Duration::minutes(settings.security().access_token_expire_minutes as i64)
    });

    let claims = Claims {
        sub: subject.to_string(),
        exp: (issued_at + lifetime).unix_timestamp(),
        iat: issued_at.unix_timestamp(),
    };

    encode(
        &jsonwebtoken::Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(settings.security().secret_key.as_bytes()),
    )
    .map_err(|_| SecurityError::TokenIssue)
}

pub(crate) fn verify_token(token: &str, settings: &Settings) -> Result<Claims, SecurityError> {
    let mut validation = Validation::new(signing_algorithm(settings)?);
    validation.validate_exp = true;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());

    let key = DecodingKey::from_secret(settings.security().secret_key.as_bytes());

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| SecurityError::TokenDecode)
}

fn signing_algorithm(settings: &Settings) -> Result<Algorithm, SecurityError> {
    match settings.security().algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        other => Err(SecurityError::BadAlgorithm(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_checks_passwords() {
        let hash = hash_password("correct-horse-battery-staple").expect("hash");

        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn tokens_carry_the_subject() {
        std::env::set_var("SECRET_KEY", "test-secret");
        let settings = Settings::load().expect("settings");

        let token =
            create_access_token("user-123", &settings, Some(Duration::minutes(1))).expect("token");
        let claims = verify_token(&token, &settings).expect("claims");

        assert_eq!(claims.sub, "user-123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        std::env::set_var("SECRET_KEY", "test-secret");
        let settings = Settings::load().expect("settings");

        let token =
            create_access_token("user-123", &settings, Some(Duration::minutes(1))).expect("token");
        let mut tampered = token.clone();
        tampered.pop();

        assert!(verify_token(&tampered, &settings).is_err());
    }
}
