use std::collections::HashSet;

use super::BackupDataset;
use crate::domain::models::{ClothingItem, ShoeItem, User, Wardrobe};
use shared::RestoreRequest;

/// The subset of an archive that a restore will insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestorePlan {
    pub users: Vec<User>,
    pub wardrobes: Vec<Wardrobe>,
    pub clothes: Vec<ClothingItem>,
    pub shoes: Vec<ShoeItem>,
}

impl RestorePlan {
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn record_count(&self) -> usize {
        self.users.len() + self.wardrobes.len() + self.clothes.len() + self.shoes.len()
    }
}

/// Select the records to restore for a set of users.
///
/// Items are kept only when their owner is selected and their kind is
/// included. Wardrobes are all kept when `include_wardrobes` is set;
/// otherwise only those referenced by a kept item are, so no kept item points
/// at a missing wardrobe. An empty user selection yields an empty plan.
pub fn plan_restore(dataset: &BackupDataset, request: &RestoreRequest) -> RestorePlan {
    if request.selected_user_ids.is_empty() {
        return RestorePlan::default();
    }

    let selected: HashSet<i64> = request.selected_user_ids.iter().copied().collect();
    let owned_by_selected = |user_id: Option<i64>| user_id.is_some_and(|id| selected.contains(&id));

    let users: Vec<User> = dataset
        .users
        .iter()
        .filter(|user| selected.contains(&user.id))
        .cloned()
        .collect();

    let clothes: Vec<ClothingItem> = if request.include_clothes {
        dataset
            .clothes
            .iter()
            .filter(|item| owned_by_selected(item.user_id))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let shoes: Vec<ShoeItem> = if request.include_shoes {
        dataset
            .shoes
            .iter()
            .filter(|item| owned_by_selected(item.user_id))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let wardrobes: Vec<Wardrobe> = if request.include_wardrobes {
        dataset.wardrobes.clone()
    } else {
        let needed: HashSet<i64> = clothes
            .iter()
            .filter_map(|item| item.wardrobe_id)
            .chain(shoes.iter().filter_map(|item| item.wardrobe_id))
            .collect();
        dataset
            .wardrobes
            .iter()
            .filter(|wardrobe| needed.contains(&wardrobe.id))
            .cloned()
            .collect()
    };

    RestorePlan {
        users,
        wardrobes,
        clothes,
        shoes,
    }
}
