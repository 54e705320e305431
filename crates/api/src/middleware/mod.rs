pub mod basic_auth;
pub mod validate;
