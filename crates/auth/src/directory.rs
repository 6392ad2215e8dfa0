//! User directory: the only "database" in this system.
//!
//! The backing store is a fixed, preloaded table with one record per role.
//! Lookups are async so callers are already shaped for a real directory
//! service behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use uuid::uuid;

use largify_core::UserId;

use crate::roles::Role;
use crate::user::User;

/// Passwords accepted for any seeded account.
///
/// Demo credential contract: this models a shared-password demo environment
/// and is intentional, not a bug. Anything beyond a demo must replace
/// [`SeedDirectory`] with a salted-hash verifier (argon2-class KDF) behind the
/// same [`UserDirectory`] trait — no caller changes either way.
pub const DEMO_PASSWORDS: [&str; 3] = ["password", "demo123", "largify2024"];

/// Lookup seam between the session layer and whatever holds user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a login attempt.
    ///
    /// Email matching is case-insensitive (the stored form is lowercase).
    /// Inactive accounts never match.
    async fn find_by_credentials(&self, email: &str, password: &str) -> Option<User>;

    /// Primary-key lookup, used during session refresh. Inactive accounts
    /// resolve to `None` so a stale token cannot revive a deactivated user.
    async fn find_by_id(&self, id: UserId) -> Option<User>;
}

/// In-memory directory preloaded with one account per role.
///
/// Seed ids are constant so a fresh process resolves the same subjects that
/// an earlier process issued tokens for.
pub struct SeedDirectory {
    by_email: HashMap<String, User>,
}

impl SeedDirectory {
    pub fn new() -> Self {
        let seeds = [
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000001"),
                "admin@largify.com",
                "Amira",
                "Shah",
                Role::SuperAdmin,
                "Management",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000002"),
                "manager@largify.com",
                "Daniel",
                "Okafor",
                Role::Admin,
                "Management",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000003"),
                "finance@largify.com",
                "Priya",
                "Nair",
                Role::FinanceManager,
                "Finance",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000004"),
                "inventory@largify.com",
                "Tomás",
                "Rivera",
                Role::InventoryManager,
                "Warehouse",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000005"),
                "projects@largify.com",
                "Hana",
                "Kim",
                Role::ProjectManager,
                "Delivery",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000006"),
                "sales@largify.com",
                "Lucas",
                "Meyer",
                Role::SalesRep,
                "Sales",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000007"),
                "hr@largify.com",
                "Ingrid",
                "Olsen",
                Role::HrManager,
                "People",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000008"),
                "employee@largify.com",
                "Ravi",
                "Patel",
                Role::Employee,
                "Operations",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-000000000009"),
                "client@customer.com",
                "Mei",
                "Tan",
                Role::Client,
                "External",
            ),
            seed(
                uuid!("0190a1b2-4c01-7000-8000-00000000000a"),
                "vendor@supplier.com",
                "Omar",
                "Haddad",
                Role::Vendor,
                "External",
            ),
        ];

        Self {
            by_email: seeds.into_iter().map(|u| (u.email.clone(), u)).collect(),
        }
    }

    /// All seeded records, in no particular order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.by_email.values()
    }
}

impl Default for SeedDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn seed(
    id: uuid::Uuid,
    email: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
    department: &str,
) -> User {
    let now = Utc::now();
    User {
        id: UserId::from_uuid(id),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role,
        department: department.to_string(),
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserDirectory for SeedDirectory {
    async fn find_by_credentials(&self, email: &str, password: &str) -> Option<User> {
        if !DEMO_PASSWORDS.contains(&password) {
            return None;
        }
        self.by_email
            .get(&email.trim().to_lowercase())
            .filter(|user| user.is_active)
            .cloned()
    }

    async fn find_by_id(&self, id: UserId) -> Option<User> {
        self.by_email
            .values()
            .find(|user| user.id == id && user.is_active)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_seed_accepts_every_demo_password() {
        let directory = SeedDirectory::new();
        let emails: Vec<String> = directory.users().map(|u| u.email.clone()).collect();
        assert_eq!(emails.len(), 10);

        for email in &emails {
            for password in DEMO_PASSWORDS {
                let user = directory.find_by_credentials(email, password).await;
                assert!(user.is_some(), "{email} rejected {password}");
            }
        }
    }

    #[tokio::test]
    async fn one_seed_per_role() {
        let directory = SeedDirectory::new();
        for role in Role::ALL {
            assert_eq!(
                directory.users().filter(|u| u.role == role).count(),
                1,
                "expected exactly one {role} seed"
            );
        }
    }

    #[tokio::test]
    async fn unlisted_password_is_rejected() {
        let directory = SeedDirectory::new();
        let user = directory
            .find_by_credentials("admin@largify.com", "hunter2")
            .await;
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn email_match_is_case_insensitive() {
        let directory = SeedDirectory::new();
        let user = directory
            .find_by_credentials("  Admin@Largify.COM ", "password")
            .await
            .unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn find_by_id_resolves_seeds_and_nothing_else() {
        let directory = SeedDirectory::new();
        let vendor = directory
            .find_by_credentials("vendor@supplier.com", "password")
            .await
            .unwrap();
        assert_eq!(directory.find_by_id(vendor.id).await.unwrap().id, vendor.id);
        assert!(directory.find_by_id(UserId::new()).await.is_none());
    }

    #[tokio::test]
    async fn seed_ids_are_stable_across_instances() {
        let a = SeedDirectory::new();
        let b = SeedDirectory::new();
        let id_a = a.find_by_credentials("hr@largify.com", "demo123").await.unwrap().id;
        let id_b = b.find_by_credentials("hr@largify.com", "demo123").await.unwrap().id;
        assert_eq!(id_a, id_b);
    }
}
