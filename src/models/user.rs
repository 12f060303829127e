use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public projection of a user, as returned by the API.
///
/// Deliberately excludes the stored credential: this type is the only user
/// shape that is ever serialized into a response.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// A full user row as stored, including the bcrypt hash.
///
/// Not `Serialize`: the hash must never leave the process. Email comparison
/// is case-sensitive throughout (`a@x.com` and `A@x.com` are distinct
/// accounts).
#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The public fields of this user.
    pub fn public(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
