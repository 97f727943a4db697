use crate::domain::models::Wardrobe;
use shared::{WardrobeDto, WardrobeListResponse};

pub struct WardrobeMapper;

impl WardrobeMapper {
    pub fn to_domain(dto: WardrobeDto) -> Wardrobe {
        Wardrobe {
            id: dto.wardrobe_id,
            name: dto.name,
            description: dto.description,
            created_at: dto.created_at,
        }
    }

    pub fn to_dto(domain: Wardrobe) -> WardrobeDto {
        WardrobeDto {
            wardrobe_id: domain.id,
            name: domain.name,
            description: domain.description,
            created_at: domain.created_at,
        }
    }

    pub fn to_wardrobe_list_dto(wardrobes: Vec<Wardrobe>) -> WardrobeListResponse {
        WardrobeListResponse {
            wardrobes: wardrobes.into_iter().map(Self::to_dto).collect(),
        }
    }
}
