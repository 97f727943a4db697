//! Mapping between user DTOs and domain users.

use crate::domain::models::User;
use shared::{BackupUserInfo, UserDto, UserListResponse};

/// Mapper to convert between shared User DTOs and domain User models.
pub struct UserMapper;

impl UserMapper {
    pub fn to_domain(dto: UserDto) -> User {
        User {
            id: dto.user_id,
            name: dto.name,
            gender: dto.gender,
            birthday: dto.birthday,
            created_at: dto.created_at,
        }
    }

    pub fn to_dto(domain: User) -> UserDto {
        UserDto {
            user_id: domain.id,
            name: domain.name,
            gender: domain.gender,
            birthday: domain.birthday,
            created_at: domain.created_at,
        }
    }

    pub fn to_user_list_dto(users: Vec<User>) -> UserListResponse {
        UserListResponse {
            users: users.into_iter().map(Self::to_dto).collect(),
        }
    }

    /// Display fields shown when picking users to restore
    pub fn to_backup_user_info(dto: &UserDto) -> BackupUserInfo {
        BackupUserInfo {
            user_id: dto.user_id,
            name: dto.name.clone(),
            gender: dto.gender.clone(),
            birthday: dto.birthday.format("%Y-%m-%d").to_string(),
        }
    }
}
