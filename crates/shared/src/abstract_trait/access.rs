use crate::{errors::ServiceError, model::User as UserModel};
use std::{fmt, sync::Arc};

pub type DynAccessPolicy = Arc<dyn AccessPolicyTrait + Send + Sync>;

/// What an authenticated caller is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageCatalog,
    ViewProfile,
    ViewUsers,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ManageCatalog => "manage_catalog",
            Capability::ViewProfile => "view_profile",
            Capability::ViewUsers => "view_users",
        };
        f.write_str(name)
    }
}

pub trait AccessPolicyTrait {
    /// `Err(ServiceError::Forbidden)` when `user` may not exercise `capability`.
    fn authorize(&self, user: &UserModel, capability: Capability) -> Result<(), ServiceError>;
}
