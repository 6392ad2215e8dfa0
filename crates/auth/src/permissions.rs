//! Static role → capability matrix.
//!
//! Every query here is total: a `None` user, an unmapped module or a missing
//! capability all evaluate to "denied", never to a panic, so UI gating code
//! can call these unconditionally.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::user::User;

/// Application modules that can be gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Dashboard,
    Users,
    Crm,
    Inventory,
    Projects,
    Finance,
    Hr,
    Quotations,
    Reports,
    Settings,
}

impl Module {
    pub const ALL: [Module; 10] = [
        Module::Dashboard,
        Module::Users,
        Module::Crm,
        Module::Inventory,
        Module::Projects,
        Module::Finance,
        Module::Hr,
        Module::Quotations,
        Module::Reports,
        Module::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Users => "users",
            Module::Crm => "crm",
            Module::Inventory => "inventory",
            Module::Projects => "projects",
            Module::Finance => "finance",
            Module::Hr => "hr",
            Module::Quotations => "quotations",
            Module::Reports => "reports",
            Module::Settings => "settings",
        }
    }

    pub fn parse(name: &str) -> Option<Module> {
        Module::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action a role may perform within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Read,
    Write,
    Admin,
    Delete,
    Approve,
}

/// How far a role's view of business data extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    /// Records the user owns or created.
    Own,
    /// Records assigned to the user.
    Assigned,
    /// Records within the user's department.
    Department,
    /// Every record in the system.
    Global,
}

/// The capability matrix for one role.
///
/// # Invariants
/// - `modules` covers all ten [`Module`]s; an empty capability set means
///   "no access" to that module and is itself meaningful.
/// - One role maps to exactly one `PermissionSet` (no per-user overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub role: Role,
    pub modules: BTreeMap<Module, BTreeSet<Capability>>,
    pub data_scope: DataScope,
}

impl PermissionSet {
    /// Whether this set grants `capability` within `module`.
    pub fn allows(&self, module: Module, capability: Capability) -> bool {
        self.modules
            .get(&module)
            .is_some_and(|caps| caps.contains(&capability))
    }

    /// Whether this set grants any capability at all within `module`.
    pub fn grants_access(&self, module: Module) -> bool {
        self.modules.get(&module).is_some_and(|caps| !caps.is_empty())
    }
}

use Capability::{Admin, Approve, Delete, Read, Write};

const FULL: [Capability; 5] = [Read, Write, Admin, Delete, Approve];

fn build(
    role: Role,
    data_scope: DataScope,
    grants: &[(Module, &[Capability])],
) -> PermissionSet {
    // Seed every module with an empty set so the map is always total.
    let mut modules: BTreeMap<Module, BTreeSet<Capability>> = Module::ALL
        .into_iter()
        .map(|m| (m, BTreeSet::new()))
        .collect();
    for (module, caps) in grants {
        modules.insert(*module, caps.iter().copied().collect());
    }
    PermissionSet {
        role,
        modules,
        data_scope,
    }
}

/// The canonical permission set for `role`.
///
/// Total over the closed [`Role`] enum. Users carry only a role tag; their
/// permissions are always derived through this table, so stored grants can
/// never drift from the role's canonical ones.
pub fn permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::SuperAdmin => build(
            role,
            DataScope::Global,
            &Module::ALL.map(|m| (m, &FULL as &[Capability])),
        ),
        Role::Admin => build(
            role,
            DataScope::Global,
            &[
                (Module::Dashboard, &[Read, Write, Admin]),
                (Module::Users, &[Read, Write, Delete]),
                (Module::Crm, &[Read, Write]),
                (Module::Inventory, &[Read, Write]),
                (Module::Projects, &[Read, Write]),
                (Module::Finance, &[Read]),
                (Module::Hr, &[Read, Write]),
                (Module::Quotations, &[Read, Write]),
                (Module::Reports, &[Read]),
                (Module::Settings, &[Read, Write]),
            ],
        ),
        Role::FinanceManager => build(
            role,
            DataScope::Department,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Finance, &[Read, Write, Approve]),
                (Module::Quotations, &[Read, Approve]),
                (Module::Reports, &[Read]),
            ],
        ),
        Role::InventoryManager => build(
            role,
            DataScope::Department,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Inventory, &[Read, Write, Delete]),
                (Module::Quotations, &[Read]),
                (Module::Reports, &[Read]),
            ],
        ),
        Role::ProjectManager => build(
            role,
            DataScope::Assigned,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Projects, &[Read, Write, Approve]),
                (Module::Reports, &[Read]),
            ],
        ),
        Role::SalesRep => build(
            role,
            DataScope::Own,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Crm, &[Read, Write]),
                (Module::Quotations, &[Read, Write]),
            ],
        ),
        Role::HrManager => build(
            role,
            DataScope::Department,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Users, &[Read]),
                (Module::Hr, &[Read, Write, Admin]),
                (Module::Reports, &[Read]),
            ],
        ),
        Role::Employee => build(
            role,
            DataScope::Own,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Projects, &[Read]),
                (Module::Hr, &[Read]),
            ],
        ),
        Role::Client => build(
            role,
            DataScope::Own,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Projects, &[Read]),
                (Module::Finance, &[Read]),
                (Module::Quotations, &[Read]),
            ],
        ),
        Role::Vendor => build(
            role,
            DataScope::Own,
            &[
                (Module::Dashboard, &[Read]),
                (Module::Inventory, &[Read, Write]),
                (Module::Quotations, &[Read]),
            ],
        ),
    }
}

/// Whether `user` holds `capability` within `module`.
///
/// Deny-by-default: `None` user, unmapped module and missing capability all
/// answer `false`.
pub fn has_permission(user: Option<&User>, module: Module, capability: Capability) -> bool {
    match user {
        Some(user) => permissions_for(user.role).allows(module, capability),
        None => false,
    }
}

/// Whether `user` may enter `module` at all (non-empty capability set).
pub fn can_access(user: Option<&User>, module: Module) -> bool {
    match user {
        Some(user) => permissions_for(user.role).grants_access(module),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_covers_every_module() {
        for role in Role::ALL {
            let set = permissions_for(role);
            assert_eq!(set.role, role);
            for module in Module::ALL {
                assert!(
                    set.modules.contains_key(&module),
                    "{role} is missing an entry for {module}"
                );
            }
        }
    }

    #[test]
    fn none_user_is_always_denied() {
        for module in Module::ALL {
            assert!(!can_access(None, module));
            for capability in FULL {
                assert!(!has_permission(None, module, capability));
            }
        }
    }

    #[test]
    fn super_admin_holds_everything() {
        let set = permissions_for(Role::SuperAdmin);
        assert_eq!(set.data_scope, DataScope::Global);
        for module in Module::ALL {
            for capability in FULL {
                assert!(set.allows(module, capability));
            }
        }
    }

    #[test]
    fn vendor_matrix_is_scoped_to_supply_side() {
        let set = permissions_for(Role::Vendor);
        assert_eq!(set.data_scope, DataScope::Own);
        assert!(!set.allows(Module::Crm, Capability::Read));
        assert!(set.allows(Module::Inventory, Capability::Write));
        assert!(!set.grants_access(Module::Settings));
    }

    #[test]
    fn empty_capability_set_denies_access_but_is_present() {
        let set = permissions_for(Role::Employee);
        let finance = set.modules.get(&Module::Finance).unwrap();
        assert!(finance.is_empty());
        assert!(!set.grants_access(Module::Finance));
    }

    #[test]
    fn approve_is_not_implied_by_write() {
        let set = permissions_for(Role::SalesRep);
        assert!(set.allows(Module::Quotations, Capability::Write));
        assert!(!set.allows(Module::Quotations, Capability::Approve));
    }
}
