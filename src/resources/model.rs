use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum ResourceType {
    Article,
    Video,
    Recipe,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Article => "Article",
            ResourceType::Video => "Video",
            ResourceType::Recipe => "Recipe",
        }
    }
}

impl FromStr for ResourceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ResourceType::Article,
            ResourceType::Video,
            ResourceType::Recipe,
        ]
        .iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(s))
        .copied()
        .ok_or(())
    }
}

/// Curated waste-reduction resource. Global and read-only after seeding.
/// `category` is free text expected to match a food category value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub resource_type: ResourceType,
}
