use crate::domain::models::ClothingItem;
use shared::{ClothesDto, ClothesListResponse};

pub struct ClothesMapper;

impl ClothesMapper {
    pub fn to_domain(dto: ClothesDto) -> ClothingItem {
        ClothingItem {
            id: dto.id,
            name: dto.name,
            category: dto.category,
            season: dto.season,
            color: dto.color,
            position: dto.position,
            image_url: dto.image_url,
            wardrobe_id: dto.wardrobe_id,
            user_id: dto.user_id,
            created_at: dto.created_at,
        }
    }

    pub fn to_dto(domain: ClothingItem) -> ClothesDto {
        ClothesDto {
            id: domain.id,
            name: domain.name,
            category: domain.category,
            color: domain.color,
            season: domain.season,
            position: domain.position,
            wardrobe_id: domain.wardrobe_id,
            user_id: domain.user_id,
            image_url: domain.image_url,
            created_at: domain.created_at,
        }
    }

    pub fn to_clothes_list_dto(items: Vec<ClothingItem>) -> ClothesListResponse {
        ClothesListResponse {
            clothes: items.into_iter().map(Self::to_dto).collect(),
        }
    }
}
