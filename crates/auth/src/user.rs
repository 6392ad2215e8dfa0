//! Directory identity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use largify_core::UserId;

use crate::permissions::{self, PermissionSet};
use crate::roles::Role;

/// A directory user.
///
/// Permissions are never stored on the record: the role tag is the single
/// source of truth and the matrix is derived on demand through
/// [`permissions::permissions_for`], so a user's grants can never drift from
/// the role's canonical ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Login key. Stored lowercased; matching is case-insensitive.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: String,
    /// Inactive users are invisible to every directory lookup.
    pub is_active: bool,
    /// Set on the session's copy at login time; `None` until first login.
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The canonical permission set for this user's role.
    pub fn permissions(&self) -> PermissionSet {
        permissions::permissions_for(self.role)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Merge a partial profile update. Absent fields are left untouched;
    /// `updated_at` is bumped on every call.
    pub fn apply(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(department) = &update.department {
            self.department = department.clone();
        }
        self.updated_at = now;
    }
}

/// Partial profile merge. Only the fields a user may edit themselves; role,
/// email and activity flag stay under directory control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
}
