use crate::{
    abstract_trait::{AccessPolicyTrait, Capability},
    errors::ServiceError,
    model::User,
};
use tracing::warn;

/// Any authenticated, active user may do anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveUserPolicy;

impl AccessPolicyTrait for ActiveUserPolicy {
    fn authorize(&self, user: &User, capability: Capability) -> Result<(), ServiceError> {
        if user.is_active {
            Ok(())
        } else {
            warn!("⛔ Inactive user {} denied {capability}", user.username);
            Err(ServiceError::Forbidden(format!(
                "El usuario no tiene permiso para {capability}"
            )))
        }
    }
}
