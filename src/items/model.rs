use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Items expiring within this many days (inclusive) count as expiring-soon
/// and trigger rescue recommendations.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 3;

/// Food categories. Stored as text; `resources.category` is free text that is
/// expected to match one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum Category {
    Dairy,
    Fruits,
    Vegetables,
    Meat,
    Grains,
    Snacks,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Dairy,
        Category::Fruits,
        Category::Vegetables,
        Category::Meat,
        Category::Grains,
        Category::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Fruits => "Fruits",
            Category::Vegetables => "Vegetables",
            Category::Meat => "Meat",
            Category::Grains => "Grains",
            Category::Snacks => "Snacks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}

/// Freshness of an item relative to "today". Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Fresh,
}

impl ExpiryStatus {
    pub fn classify(days_remaining: i64) -> Self {
        if days_remaining < 0 {
            ExpiryStatus::Expired
        } else if days_remaining <= EXPIRING_SOON_WINDOW_DAYS {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Fresh
        }
    }
}

impl FromStr for ExpiryStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("expired") => Ok(ExpiryStatus::Expired),
            s if s.eq_ignore_ascii_case("expiring-soon") => Ok(ExpiryStatus::ExpiringSoon),
            s if s.eq_ignore_ascii_case("fresh") => Ok(ExpiryStatus::Fresh),
            _ => Err(()),
        }
    }
}

/// Day delta between an item's expiry date and today. Negative once expired.
/// Both inputs are calendar dates; no time-of-day is involved.
pub fn days_remaining(expiry_date: Date, today: Date) -> i64 {
    (expiry_date - today).whole_days()
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: Category,
    pub quantity: i32,
    pub expiry_date: Date,
    pub unit_cost: Option<f64>,
    pub receipt_key: Option<String>,
    pub created_at: OffsetDateTime,
}

impl FoodItem {
    pub fn days_remaining(&self, today: Date) -> i64 {
        days_remaining(self.expiry_date, today)
    }

    pub fn status(&self, today: Date) -> ExpiryStatus {
        ExpiryStatus::classify(self.days_remaining(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn classify_boundaries() {
        assert_eq!(ExpiryStatus::classify(-1), ExpiryStatus::Expired);
        assert_eq!(ExpiryStatus::classify(0), ExpiryStatus::ExpiringSoon);
        assert_eq!(ExpiryStatus::classify(3), ExpiryStatus::ExpiringSoon);
        assert_eq!(ExpiryStatus::classify(4), ExpiryStatus::Fresh);
    }

    #[test]
    fn days_remaining_is_signed() {
        let today = date!(2025 - 06 - 15);
        assert_eq!(days_remaining(date!(2025 - 06 - 14), today), -1);
        assert_eq!(days_remaining(today, today), 0);
        assert_eq!(days_remaining(date!(2025 - 06 - 18), today), 3);
        assert_eq!(days_remaining(date!(2025 - 07 - 15), today), 30);
    }

    #[test]
    fn expired_iff_negative_days() {
        let today = date!(2025 - 06 - 15);
        for delta in -10..10i64 {
            let expiry = today + time::Duration::days(delta);
            let status = ExpiryStatus::classify(days_remaining(expiry, today));
            assert_eq!(status == ExpiryStatus::Expired, delta < 0);
            assert_eq!(
                status == ExpiryStatus::ExpiringSoon,
                (0..=EXPIRING_SOON_WINDOW_DAYS).contains(&delta)
            );
        }
    }

    #[test]
    fn category_parses_known_values_only() {
        assert_eq!("Dairy".parse::<Category>(), Ok(Category::Dairy));
        assert_eq!("vegetables".parse::<Category>(), Ok(Category::Vegetables));
        assert!("Beverages".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn status_parses_kebab_case() {
        assert_eq!("expired".parse::<ExpiryStatus>(), Ok(ExpiryStatus::Expired));
        assert_eq!(
            "expiring-soon".parse::<ExpiryStatus>(),
            Ok(ExpiryStatus::ExpiringSoon)
        );
        assert!("stale".parse::<ExpiryStatus>().is_err());
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ExpiryStatus::ExpiringSoon).unwrap(),
            "\"expiring-soon\""
        );
    }
}
