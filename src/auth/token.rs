use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token lifetime. A token stays valid for exactly this long after issuance;
/// there is no revocation before expiry (accepted trade-off of the stateless
/// bearer-token design).
const TOKEN_TTL_SECONDS: i64 = 60 * 60; // 1 hour

/// The identity claim embedded in a signed token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Email of the user at issuance time.
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// Constructed once from the configured secret and shared by clone; the keys
/// are derived at construction so the secret is never read from ambient
/// process state afterwards.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Produces a signed token for the given identity, expiring one hour
    /// from now.
    pub fn issue(&self, user_id: i32, email: &str) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::seconds(TOKEN_TTL_SECONDS))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to issue token: {}", e)))
    }

    /// Checks signature integrity and expiry, returning the embedded claims.
    ///
    /// Malformed, tampered, and expired tokens all surface as the same
    /// `Unauthorized` error; callers never learn which check failed.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}
