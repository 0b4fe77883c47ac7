//! Banner models

use serde::{Deserialize, Serialize};

/// Promotional banner row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub subtitle: String,
    pub subtitle_ar: String,
    pub image_url: String,
    pub is_active: bool,
}

/// Banner creation payload (image already uploaded by the handler)
#[derive(Debug, Clone)]
pub struct BannerCreate {
    pub title: String,
    pub title_ar: String,
    pub subtitle: String,
    pub subtitle_ar: String,
    pub image_url: String,
    pub is_active: bool,
}

/// Banner update payload; `image_url: None` preserves the stored image
#[derive(Debug, Clone)]
pub struct BannerUpdate {
    pub title: String,
    pub title_ar: String,
    pub subtitle: String,
    pub subtitle_ar: String,
    pub image_url: Option<String>,
    pub is_active: bool,
}
