use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Historical record of one consumed unit. `food_name` and `food_category`
/// are snapshots taken at log time; later changes to the source item never
/// alter them. `food_item_id` is a weak back-reference, nulled when the item
/// is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConsumptionLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_item_id: Option<Uuid>,
    pub food_name: String,
    pub food_category: String,
    pub quantity: i32,
    pub consumed_at: OffsetDateTime,
}

/// What happens to the source item when one unit is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Quantity stays >= 1; persist the decrement.
    Decremented(i32),
    /// Quantity would reach 0; delete the row instead.
    Depleted,
}

pub fn consume_outcome(current_quantity: i32) -> ConsumeOutcome {
    if current_quantity > 1 {
        ConsumeOutcome::Decremented(current_quantity - 1)
    } else {
        ConsumeOutcome::Depleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_unit_left_depletes_the_item() {
        assert_eq!(consume_outcome(1), ConsumeOutcome::Depleted);
    }

    #[test]
    fn more_than_one_unit_decrements() {
        assert_eq!(consume_outcome(2), ConsumeOutcome::Decremented(1));
        assert_eq!(consume_outcome(5), ConsumeOutcome::Decremented(4));
    }

    #[test]
    fn repeated_consumption_reaches_zero_exactly_once() {
        // Q units survive exactly Q consume calls; the last one depletes.
        let mut quantity = 4;
        let mut logs = 0;
        loop {
            logs += 1;
            match consume_outcome(quantity) {
                ConsumeOutcome::Decremented(rest) => quantity = rest,
                ConsumeOutcome::Depleted => break,
            }
        }
        assert_eq!(logs, 4);
    }
}
