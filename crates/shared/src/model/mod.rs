mod category;
mod product;
mod status;
mod user;

pub use self::category::Category;
pub use self::product::{PriceQuote, Product, normalize_money};
pub use self::status::ActivationState;
pub use self::user::User;
