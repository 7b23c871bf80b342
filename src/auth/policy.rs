use tracing::warn;

use crate::auth::extractors::Identity;
use crate::error::ApiError;
use crate::users::repo_types::Role;

/// True iff the role is a member of the allowed set. Exact match on the
/// closed enum; no hierarchy, ADMIN does not satisfy a TEACHER-only gate.
pub fn has_role(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// Role gate for handlers. Call only after identity extraction succeeded.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), ApiError> {
    if has_role(identity.role, allowed) {
        Ok(())
    } else {
        warn!(user_id = %identity.user_id, role = ?identity.role, "role gate failed");
        Err(ApiError::Forbidden)
    }
}
