mod category;
mod product;
mod user;

#[cfg(any(test, feature = "testing"))]
mod memory;

pub use self::category::CategoryRepository;
pub use self::product::ProductRepository;
pub use self::user::UserRepository;

#[cfg(any(test, feature = "testing"))]
pub use self::memory::InMemoryStore;
