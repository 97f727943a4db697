pub mod user_repository;
pub mod wardrobe_repository;
pub mod clothes_repository;
pub mod shoes_repository;

pub use user_repository::UserRepository;
pub use wardrobe_repository::WardrobeRepository;
pub use clothes_repository::ClothesRepository;
pub use shoes_repository::ShoesRepository;
