mod database;
mod hashing;
mod myconfig;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::hashing::Hashing;
pub use self::myconfig::{Config, TokenConfig};
