use chrono::{Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Role carried by every cockpit token.
pub const ADMIN_ROLE: &str = "admin";

/// Claims understood by both the cockpit and the SQL service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(email: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: email.into(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 tokens with the shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::from_secret(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn from_secret(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn issue(&self, email: &str) -> Result<String, JwtError> {
        self.sign(&Claims::new(email, self.expiry_hours))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(JwtError::TokenGeneration)
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::InvalidToken)
    }
}

/// Header and claims of a token, decoded without any verification.
#[derive(Debug, Serialize)]
pub struct TokenInspection {
    pub header: Value,
    pub payload: Value,
    pub signature_length: usize,
}

pub fn inspect(token: &str) -> Result<TokenInspection, JwtError> {
    let header = decode_header(token).map_err(JwtError::InvalidToken)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let payload = decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(JwtError::InvalidToken)?
        .claims;

    Ok(TokenInspection {
        header: serde_json::to_value(&header).unwrap_or(Value::Null),
        payload,
        signature_length: token.rsplit('.').next().map(str::len).unwrap_or(0),
    })
}

/// SHA-256 hex digest, the form in which the dashboard sends passwords.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Shape of the configured secret, for diagnosing mismatches with the SQL
/// service without printing the secret itself.
#[derive(Debug, Serialize)]
pub struct SecretReport {
    pub sha256: String,
    pub length: usize,
    pub contains_whitespace: bool,
    pub leading_whitespace: bool,
    pub trailing_whitespace: bool,
}

pub fn secret_report(secret: &str) -> SecretReport {
    SecretReport {
        sha256: hash_password(secret),
        length: secret.chars().count(),
        contains_whitespace: secret.chars().any(char::is_whitespace),
        leading_whitespace: secret.starts_with(char::is_whitespace),
        trailing_whitespace: secret.ends_with(char::is_whitespace),
    }
}
