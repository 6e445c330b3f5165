//! # Ownership Authorization
//!
//! One shared decision function used by every mutating listing handler.
//! Handlers fetch the target's owner reference and pass it here together
//! with the acting identity; keeping the decision in one place means the
//! enforcement logic cannot drift between update and delete paths.
//!
//! The check is re-executed independently for every mutating operation;
//! ownership is never cached or assumed from an earlier check.

use crate::error::{AppError, AppResult};

/// Decide whether `acting_user` may mutate a resource.
///
/// - `owner` is `None` when the resource does not exist → `NotFound`.
/// - Owner mismatch → `Forbidden`.
/// - Match → `Ok(())`, and the mutation may proceed.
pub fn authorize(owner: Option<String>, acting_user: &str, resource: &str) -> AppResult<()> {
    match owner {
        None => Err(AppError::NotFound(format!("{} not found", resource))),
        Some(ref owner_id) if owner_id != acting_user => Err(AppError::Forbidden(format!(
            "User not authorized to modify this {}",
            resource.to_lowercase()
        ))),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_allowed() {
        assert!(authorize(Some("u1".into()), "u1", "Listing").is_ok());
    }

    #[test]
    fn test_non_owner_forbidden() {
        let err = authorize(Some("u1".into()), "u2", "Listing").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_missing_resource_not_found() {
        let err = authorize(None, "u1", "Listing").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
