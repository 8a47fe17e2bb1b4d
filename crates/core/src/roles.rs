//! Role name constants.
//!
//! Role names are stored as plain strings on the member row and inside JWT
//! claims; these constants keep the comparisons in one place.

/// Administrators manage catalog data and may cancel any claim.
pub const ROLE_ADMIN: &str = "admin";

/// Regular members book slots and manage their own claims.
pub const ROLE_MEMBER: &str = "member";
