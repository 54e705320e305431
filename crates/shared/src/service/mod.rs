mod access;
mod auth;
mod category;
mod product;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::access::ActiveUserPolicy;
pub use self::auth::{AuthService, AuthServiceDeps};
pub use self::category::CategoryService;
pub use self::product::ProductService;
