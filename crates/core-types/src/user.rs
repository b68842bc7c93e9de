use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The password is only ever stored as a salted hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
