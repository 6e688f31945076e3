//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! identity, tenant, and role claims are kept as raw strings, and a
//! non-string value reads as missing: a token that verifies but carries a
//! missing or malformed claim still authenticates, and the access layer then
//! denies everything for it.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use leadflow_core::access::CallerFacts;
use leadflow_core::types::DbId;
use serde::{Deserialize, Deserializer, Serialize};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's identity (UUID string).
    #[serde(default, deserialize_with = "string_or_none")]
    pub sub: Option<String>,
    /// The user's tenant (UUID string).
    #[serde(default, deserialize_with = "string_or_none")]
    pub tenant_id: Option<String>,
    /// The user's role name (`"admin"` or `"counselor"`).
    #[serde(default, deserialize_with = "string_or_none")]
    pub role: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Map the claims onto caller facts. Malformed ids become `None`.
    pub fn caller_facts(&self) -> CallerFacts {
        CallerFacts {
            tenant_id: parse_id(self.tenant_id.as_deref()),
            role: self.role.clone(),
            user_id: parse_id(self.sub.as_deref()),
        }
    }
}

fn parse_id(raw: Option<&str>) -> Option<DbId> {
    raw.and_then(|s| s.parse().ok())
}

/// Accept any JSON value for an identity claim; only strings are kept.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for the given user.
///
/// The identity provider normally issues these; the server uses this for
/// tooling and tests.
pub fn generate_access_token(
    user_id: DbId,
    tenant_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: Some(user_id.to_string()),
        tenant_id: Some(tenant_id.to_string()),
        role: Some(role.to_string()),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
    };
    encode_claims(&claims, config)
}

/// Sign arbitrary claims with the configured secret.
pub fn encode_claims(
    claims: &Claims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(), // HS256
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
