//! Bearer token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by every authenticated request.
///
/// Tokens are minted by the identity provider in front of this service;
/// the subject is the member's id and `church` the tenant they act for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member ID).
    pub sub: Uuid,
    /// Church ID (tenant context).
    pub church: Uuid,
    /// Member's role in the church.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a member.
    #[must_use]
    pub fn new(member_id: Uuid, church_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: member_id,
            church: church_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the member ID from claims.
    #[must_use]
    pub const fn member_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the church ID from claims.
    #[must_use]
    pub const fn church_id(&self) -> Uuid {
        self.church
    }
}
