use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "Low",
            BudgetTier::Medium => "Medium",
            BudgetTier::High => "High",
        }
    }
}

impl FromStr for BudgetTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [BudgetTier::Low, BudgetTier::Medium, BudgetTier::High]
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}

/// Household profile, one per user. Created alongside the user at
/// registration and updatable only by its owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub household_size: i32,
    pub dietary_preference: String,
    pub budget_tier: BudgetTier,
    pub location: String,
    pub updated_at: OffsetDateTime,
}
