#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use closing_core::{
    config::ConfigManager,
    core::services::{ClosingDraft, ClosingService},
    domain::{ClosingSnapshot, MovementCategory, MovementItem, MovementType, Store},
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated base directory and a config manager rooted in it.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, config_manager)
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Snapshot builder with one movement type per category.
pub struct SnapshotBuilder {
    pub snapshot: ClosingSnapshot,
    pub revenue: Uuid,
    pub expense: Uuid,
    pub other: Uuid,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let mut snapshot = ClosingSnapshot::new();
        let revenue =
            snapshot.add_movement_type(MovementType::new("Vendas", MovementCategory::Revenue));
        let expense =
            snapshot.add_movement_type(MovementType::new("Fornecedores", MovementCategory::Expense));
        let other =
            snapshot.add_movement_type(MovementType::new("Sangria", MovementCategory::Other));
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
        let mut movements = Vec::new();
        if !revenue.is_zero() {
            movements.push(MovementItem::new(self.revenue, revenue));
        }
        if !expense.is_zero() {
            movements.push(MovementItem::new(self.expense, expense));
        }
        self.closing_with_movements(store_id, date, movements)
    }

    pub fn closing_with_movements(
        &mut self,
        store_id: Uuid,
        date: NaiveDate,
        movements: Vec<MovementItem>,
    ) -> Uuid {
        let draft = ClosingDraft {
            store_id,
            closing_date: date,
            initial_balance: Decimal::ZERO,
            final_balance: Decimal::ZERO,
            movements,
            notes: None,
        };
        let registered = ClosingService::build(draft, &self.snapshot.movement_types);
        self.snapshot.add_closing(registered.closing)
    }

    pub fn build(self) -> ClosingSnapshot {
        self.snapshot
    }
}
