use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoeItem {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub shoe_type: Option<String>,
    pub season: Option<String>,
    pub price: Option<f64>,
    /// Stored path of the item's photo in private image storage
    pub image_url: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: NaiveDateTime,
}
