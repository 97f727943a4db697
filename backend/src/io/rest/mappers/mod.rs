pub mod user_mapper;
pub mod wardrobe_mapper;
pub mod clothes_mapper;
pub mod shoes_mapper;

pub use user_mapper::UserMapper;
pub use wardrobe_mapper::WardrobeMapper;
pub use clothes_mapper::ClothesMapper;
pub use shoes_mapper::ShoesMapper;
