//! Landing-path resolution and route guards.
//!
//! Thin, pure wrappers the route-protection middleware builds on. Unknown
//! role names fail open to the generic dashboard (a safe page), never to an
//! error; access checks fail closed through the permission matrix.

use crate::permissions::{self, Module};
use crate::roles::Role;
use crate::user::User;

/// Entry point unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Fallback landing page for role names the route layer does not recognize.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Default landing page per role. Total over the closed enum.
pub fn landing_path_for(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "/dashboard/admin",
        Role::Admin => "/dashboard/admin",
        Role::FinanceManager => "/dashboard/finance",
        Role::InventoryManager => "/dashboard/inventory",
        Role::ProjectManager => "/dashboard/projects",
        Role::SalesRep => "/dashboard/sales",
        Role::HrManager => "/dashboard/hr",
        Role::Employee => "/dashboard/employee",
        Role::Client => "/dashboard/client",
        Role::Vendor => "/dashboard/vendor",
    }
}

/// String-typed variant for route layers that carry the role as text.
pub fn landing_path_for_name(role: &str) -> &'static str {
    Role::parse(role)
        .map(landing_path_for)
        .unwrap_or(DEFAULT_LANDING_PATH)
}

/// Route-protection check: may `user` enter the route serving `module`?
pub fn is_route_allowed(user: Option<&User>, module: Module) -> bool {
    permissions::can_access(user, module)
}

/// Where to send `user` after a successful login.
///
/// An explicit `redirect` query parameter wins over the role default, but
/// only root-relative targets are honored (no absolute or scheme-relative
/// URLs).
pub fn resolve_redirect(user: &User, requested: Option<&str>) -> String {
    if let Some(target) = requested
        && target.starts_with('/')
        && !target.starts_with("//")
    {
        return target.to_string();
    }
    landing_path_for(user.role).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_has_a_landing_path() {
        for role in Role::ALL {
            assert!(landing_path_for(role).starts_with("/dashboard"));
        }
    }

    #[test]
    fn employee_lands_on_the_employee_dashboard() {
        assert_eq!(landing_path_for_name("employee"), "/dashboard/employee");
    }

    #[test]
    fn unknown_role_name_falls_back() {
        assert_eq!(landing_path_for_name("contractor"), DEFAULT_LANDING_PATH);
        assert_eq!(landing_path_for_name(""), DEFAULT_LANDING_PATH);
    }

    #[test]
    fn unauthenticated_users_are_never_route_allowed() {
        for module in Module::ALL {
            assert!(!is_route_allowed(None, module));
        }
    }

    #[test]
    fn redirect_parameter_wins_when_root_relative() {
        let directory = crate::directory::SeedDirectory::new();
        let user = directory.users().next().unwrap().clone();

        assert_eq!(
            resolve_redirect(&user, Some("/projects/42")),
            "/projects/42"
        );
        assert_eq!(
            resolve_redirect(&user, Some("https://evil.example")),
            landing_path_for(user.role)
        );
        assert_eq!(
            resolve_redirect(&user, Some("//evil.example")),
            landing_path_for(user.role)
        );
        assert_eq!(resolve_redirect(&user, None), landing_path_for(user.role));
    }
}
