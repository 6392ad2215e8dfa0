use serde::{Deserialize, Serialize};

/// Role held by a directory user.
///
/// The role set is closed: the directory seeds exactly one account per role,
/// and the full capability matrix is derived from the role alone (see
/// [`crate::permissions::permissions_for`]). Tokens and route layers carry the
/// snake_case wire form (`"super_admin"`, `"sales_rep"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    FinanceManager,
    InventoryManager,
    ProjectManager,
    SalesRep,
    HrManager,
    Employee,
    Client,
    Vendor,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 10] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::FinanceManager,
        Role::InventoryManager,
        Role::ProjectManager,
        Role::SalesRep,
        Role::HrManager,
        Role::Employee,
        Role::Client,
        Role::Vendor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::FinanceManager => "finance_manager",
            Role::InventoryManager => "inventory_manager",
            Role::ProjectManager => "project_manager",
            Role::SalesRep => "sales_rep",
            Role::HrManager => "hr_manager",
            Role::Employee => "employee",
            Role::Client => "client",
            Role::Vendor => "vendor",
        }
    }

    /// Parse the wire form. Unknown names are `None`, not an error; callers
    /// that need a fallback use the route layer's default landing path.
    pub fn parse(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_round_trips() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(Role::parse("intern"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("SUPER_ADMIN"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str("\"sales_rep\"").unwrap();
        assert_eq!(back, Role::SalesRep);
    }
}
