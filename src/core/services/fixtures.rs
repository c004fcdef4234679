use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    ClosingSnapshot, MovementCategory, MovementItem, MovementType, Store, StoreClosing,
};

use super::{ClosingDraft, ClosingService};

pub(crate) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Snapshot builder with one movement type per category.
pub(crate) struct Fixture {
    pub snapshot: ClosingSnapshot,
    pub revenue: Uuid,
    pub expense: Uuid,
    pub other: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        let mut snapshot = ClosingSnapshot::new();
        let revenue =
            snapshot.add_movement_type(MovementType::new("Sales", MovementCategory::Revenue));
        let expense =
            snapshot.add_movement_type(MovementType::new("Supplies", MovementCategory::Expense));
        let other =
            snapshot.add_movement_type(MovementType::new("Withdrawal", MovementCategory::Other));
        Self {
            snapshot,
            revenue,
            expense,
            other,
        }
    }

    pub fn store(&mut self, name: &str) -> Uuid {
        self.snapshot.add_store(Store::new(name))
    }

    pub fn closing(
        &mut self,
        store_id: Uuid,
        date: NaiveDate,
        revenue: Decimal,
        expense: Decimal,
    ) -> Uuid {
        self.closing_with_balances(store_id, date, revenue, expense, Decimal::ZERO, Decimal::ZERO)
    }

    pub fn closing_with_balances(
        &mut self,
        store_id: Uuid,
        date: NaiveDate,
        revenue: Decimal,
        expense: Decimal,
        initial_balance: Decimal,
        final_balance: Decimal,
    ) -> Uuid {
        let closing = self.build_closing(
            store_id,
            date,
            revenue,
            expense,
            initial_balance,
            final_balance,
        );
        self.snapshot.add_closing(closing)
    }

    pub fn build_closing(
        &self,
        store_id: Uuid,
        date: NaiveDate,
        revenue: Decimal,
        expense: Decimal,
        initial_balance: Decimal,
        final_balance: Decimal,
    ) -> StoreClosing {
        let mut movements = Vec::new();
        if !revenue.is_zero() {
            movements.push(MovementItem::new(self.revenue, revenue));
        }
        if !expense.is_zero() {
            movements.push(MovementItem::new(self.expense, expense));
        }
        let draft = ClosingDraft {
            store_id,
            closing_date: date,
            initial_balance,
            final_balance,
            movements,
            notes: None,
        };
        ClosingService::build(draft, &self.snapshot.movement_types).closing
    }
}
