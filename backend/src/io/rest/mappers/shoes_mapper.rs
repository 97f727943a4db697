use crate::domain::models::ShoeItem;
use shared::{ShoesDto, ShoesListResponse};

pub struct ShoesMapper;

impl ShoesMapper {
    pub fn to_domain(dto: ShoesDto) -> ShoeItem {
        ShoeItem {
            id: dto.id,
            name: dto.name,
            brand: dto.brand,
            size: dto.size,
            color: dto.color,
            shoe_type: dto.shoe_type,
            season: dto.season,
            price: dto.price,
            image_url: dto.image_url,
            wardrobe_id: dto.wardrobe_id,
            user_id: dto.user_id,
            created_at: dto.created_at,
        }
    }

    pub fn to_dto(domain: ShoeItem) -> ShoesDto {
        ShoesDto {
            id: domain.id,
            name: domain.name,
            brand: domain.brand,
            size: domain.size,
            wardrobe_id: domain.wardrobe_id,
            user_id: domain.user_id,
            color: domain.color,
            shoe_type: domain.shoe_type,
            season: domain.season,
            price: domain.price,
            image_url: domain.image_url,
            created_at: domain.created_at,
        }
    }

    pub fn to_shoes_list_dto(items: Vec<ShoeItem>) -> ShoesListResponse {
        ShoesListResponse {
            shoes: items.into_iter().map(Self::to_dto).collect(),
        }
    }
}
