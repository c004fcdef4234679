//! End-of-day cash closings and the totals derived from their movements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{common::*, movement::MovementItem};

/// Category totals reduced from a closing's movements.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClosingTotals {
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub total_other: Decimal,
    pub net_result: Decimal,
}

impl ClosingTotals {
    /// Builds totals from category sums; `net_result` is always revenue minus expense.
    pub fn from_parts(total_revenue: Decimal, total_expense: Decimal, total_other: Decimal) -> Self {
        Self {
            total_revenue,
            total_expense,
            total_other,
            net_result: total_revenue.saturating_sub(total_expense),
        }
    }
}

/// One reconciliation event for one store on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreClosing {
    pub id: Uuid,
    pub store_id: Uuid,
    pub closing_date: NaiveDate,
    pub initial_balance: Decimal,
    pub final_balance: Decimal,
    #[serde(default)]
    pub movements: Vec<MovementItem>,
    #[serde(flatten)]
    pub(crate) totals: ClosingTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StoreClosing {
    /// Creates a closing without movements. Totals start at zero and are only
    /// populated through the closing service.
    pub fn new(
        store_id: Uuid,
        closing_date: NaiveDate,
        initial_balance: Decimal,
        final_balance: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            closing_date,
            initial_balance,
            final_balance,
            movements: Vec::new(),
            totals: ClosingTotals::default(),
            notes: None,
        }
    }

    pub fn totals(&self) -> ClosingTotals {
        self.totals
    }

    pub fn total_revenue(&self) -> Decimal {
        self.totals.total_revenue
    }

    pub fn total_expense(&self) -> Decimal {
        self.totals.total_expense
    }

    pub fn total_other(&self) -> Decimal {
        self.totals.total_other
    }

    pub fn net_result(&self) -> Decimal {
        self.totals.net_result
    }

    pub(crate) fn set_derived(&mut self, movements: Vec<MovementItem>, totals: ClosingTotals) {
        self.movements = movements;
        self.totals = totals;
    }

    /// Compares the declared net result against the physical balance change.
    pub fn reconciliation(&self) -> BalanceReconciliation {
        BalanceReconciliation::new(
            self.net_result(),
            self.final_balance.saturating_sub(self.initial_balance),
        )
    }
}

impl Identifiable for StoreClosing {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for StoreClosing {
    fn display_label(&self) -> String {
        format!("{} ({} movements)", self.closing_date, self.movements.len())
    }
}

/// Cash reconciliation check for a closing.
///
/// `declared_net` is the reporting net result; `balance_change` is the drawer
/// delta (`final - initial`). They are distinct values and never substitute
/// for one another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceReconciliation {
    pub declared_net: Decimal,
    pub balance_change: Decimal,
    pub difference: Decimal,
}

impl BalanceReconciliation {
    pub fn new(declared_net: Decimal, balance_change: Decimal) -> Self {
        Self {
            declared_net,
            balance_change,
            difference: balance_change.saturating_sub(declared_net),
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero()
    }
}
