//! `largify-core` — shared domain primitives.
//!
//! Strongly-typed identifiers used across the workspace. No infrastructure
//! concerns belong here.

pub mod id;

pub use id::UserId;
