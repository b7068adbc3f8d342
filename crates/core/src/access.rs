//! Who may see a church's fiscal data.

use ecclesia_shared::types::{ChurchId, MemberId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Member roles within a church.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurchRole {
    /// Global administrator.
    Admin,
    /// Pastor in charge of the church.
    LeadPastor,
    /// Keeps the church's books.
    Treasurer,
    /// Ordinary member.
    Member,
}

impl ChurchRole {
    /// Returns true if this role can read declarations and record transactions.
    #[must_use]
    pub const fn can_manage_finance(&self) -> bool {
        matches!(self, Self::Admin | Self::LeadPastor | Self::Treasurer)
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::LeadPastor => "lead_pastor",
            Self::Treasurer => "treasurer",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for ChurchRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChurchRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "lead_pastor" => Ok(Self::LeadPastor),
            "treasurer" => Ok(Self::Treasurer),
            "member" => Ok(Self::Member),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// Reasons a request is turned away.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Token issued for another church.
    #[error("token does not belong to this church")]
    WrongChurch,
    /// Role lacks finance rights.
    #[error("finance access requires admin, lead pastor or treasurer")]
    FinanceRoleRequired,
    /// Member asked for somebody else's receipt.
    #[error("receipt belongs to another member")]
    NotOwner,
}

/// Identity of the caller, as read from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    /// Member making the request.
    pub member_id: MemberId,
    /// Church the token was issued for.
    pub church_id: ChurchId,
    /// Role in that church. Unknown roles are treated as `Member`.
    pub role: ChurchRole,
}

impl Requester {
    /// Checks the caller acts for `church_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::WrongChurch` on a tenant mismatch.
    pub fn ensure_church(&self, church_id: ChurchId) -> Result<(), AccessError> {
        if self.church_id == church_id {
            Ok(())
        } else {
            Err(AccessError::WrongChurch)
        }
    }

    /// Checks the caller may read the finances of `church_id`.
    ///
    /// # Errors
    ///
    /// Returns an error on a tenant mismatch or a role without finance rights.
    pub fn ensure_finance(&self, church_id: ChurchId) -> Result<(), AccessError> {
        self.ensure_church(church_id)?;
        if self.role.can_manage_finance() {
            Ok(())
        } else {
            Err(AccessError::FinanceRoleRequired)
        }
    }

    /// Checks the caller may download a receipt issued to `donor_id`.
    ///
    /// Finance roles see every receipt of their church; members only their own.
    ///
    /// # Errors
    ///
    /// Returns an error on a tenant mismatch or a receipt of another member.
    pub fn ensure_receipt_access(
        &self,
        church_id: ChurchId,
        donor_id: Option<MemberId>,
    ) -> Result<(), AccessError> {
        self.ensure_church(church_id)?;
        if self.role.can_manage_finance() || donor_id == Some(self.member_id) {
            Ok(())
        } else {
            Err(AccessError::NotOwner)
        }
    }
}
