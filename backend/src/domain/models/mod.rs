pub mod user;
pub mod wardrobe;
pub mod clothes;
pub mod shoes;

pub use user::*;
pub use wardrobe::*;
pub use clothes::*;
pub use shoes::*;

/// Identifier value meaning "not yet assigned by the store"
pub const UNASSIGNED_ID: i64 = 0;
