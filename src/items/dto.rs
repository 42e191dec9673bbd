use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::AppError;
use crate::items::model::{Category, ExpiryStatus, FoodItem};

/// Dashboard/list filters. Values arrive as free text from the query string;
/// unrecognized values are treated as if the filter were absent.
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ItemFilter {
    pub fn category(&self) -> Option<Category> {
        self.category.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn status(&self) -> Option<ExpiryStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub expiry_date: Date,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

impl ItemRequest {
    /// Validates the payload, returning the parsed category.
    pub fn validate(&self) -> Result<Category, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        if self.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        if let Some(cost) = self.unit_cost {
            if cost < 0.0 {
                return Err(AppError::validation("unit_cost must not be negative"));
            }
        }
        self.category
            .parse::<Category>()
            .map_err(|_| AppError::validation(format!("unknown category '{}'", self.category)))
    }
}

/// Item as rendered on the dashboard: stored fields plus the derived
/// freshness data.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub quantity: i32,
    pub expiry_date: Date,
    pub unit_cost: Option<f64>,
    pub has_receipt: bool,
    pub days_remaining: i64,
    pub status: ExpiryStatus,
    pub created_at: OffsetDateTime,
}

impl ItemView {
    pub fn from_item(item: FoodItem, today: Date) -> Self {
        let days_remaining = item.days_remaining(today);
        let status = item.status(today);
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            quantity: item.quantity,
            expiry_date: item.expiry_date,
            unit_cost: item.unit_cost,
            has_receipt: item.receipt_key.is_some(),
            days_remaining,
            status,
            created_at: item.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn request() -> ItemRequest {
        ItemRequest {
            name: "Milk".into(),
            category: "Dairy".into(),
            quantity: 2,
            expiry_date: date!(2025 - 06 - 20),
            unit_cost: Some(1.5),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(request().validate().unwrap(), Category::Dairy);
    }

    #[test]
    fn rejects_blank_name_and_bad_quantity() {
        let mut r = request();
        r.name = "  ".into();
        assert!(r.validate().is_err());

        let mut r = request();
        r.quantity = 0;
        assert!(r.validate().is_err());

        let mut r = request();
        r.unit_cost = Some(-0.5);
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_unknown_category() {
        let mut r = request();
        r.category = "Beverages".into();
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn unrecognized_filters_fall_back_to_absent() {
        let f = ItemFilter {
            category: Some("Plastics".into()),
            status: Some("stale".into()),
        };
        assert_eq!(f.category(), None);
        assert_eq!(f.status(), None);

        let f = ItemFilter {
            category: Some("Meat".into()),
            status: Some("expiring-soon".into()),
        };
        assert_eq!(f.category(), Some(Category::Meat));
        assert_eq!(f.status(), Some(ExpiryStatus::ExpiringSoon));
    }
}
