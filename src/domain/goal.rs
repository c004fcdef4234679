//! Monthly revenue goals per store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{common::*, report::MonthYear};

/// Revenue target for one store in one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreGoal {
    pub id: Uuid,
    pub store_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub target_revenue: Decimal,
}

impl StoreGoal {
    pub fn new(store_id: Uuid, month: u32, year: i32, target_revenue: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            month,
            year,
            target_revenue,
        }
    }

    /// Returns true when both goals target the same store and month.
    pub fn same_slot(&self, other: &StoreGoal) -> bool {
        self.store_id == other.store_id && self.month == other.month && self.year == other.year
    }

    pub fn month_year(&self) -> Option<MonthYear> {
        MonthYear::new(self.month, self.year).ok()
    }
}

impl Identifiable for StoreGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Goal attainment for a month. `progress_percent` never exceeds 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalProgress {
    pub goal: StoreGoal,
    pub current_revenue: Decimal,
    pub progress_percent: Decimal,
    pub remaining: Decimal,
    pub goal_met: bool,
}
