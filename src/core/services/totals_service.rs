//! Reduces a closing's movements into category totals.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    closing::ClosingTotals,
    common::find_by_id,
    movement::{ConfigurationIssue, MovementCategory, MovementItem, MovementType, PaymentMethod},
};

use super::{CategoryCatalog, CategoryService};

const UNASSIGNED_METHOD: &str = "Unassigned";
const UNKNOWN_METHOD: &str = "Unknown method";

/// Totals for a movement list plus the movements that had to be excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsOutcome {
    pub totals: ClosingTotals,
    pub issues: Vec<ConfigurationIssue>,
}

impl TotalsOutcome {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Recognized amounts grouped by payment method. Never feeds the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodTotal {
    pub payment_method_id: Option<Uuid>,
    pub name: String,
    pub revenue: Decimal,
    pub expense: Decimal,
    pub other: Decimal,
    pub movement_count: usize,
}

/// Stateless calculator for closing totals.
pub struct TotalsService;

impl TotalsService {
    /// Computes revenue, expense, other and net totals for a movement list.
    ///
    /// Revenue is recognized net of discounts; expenses and other movements
    /// are taken at face value. Movements whose type cannot be resolved are
    /// excluded and reported in [`TotalsOutcome::issues`].
    pub fn compute_closing_totals(
        movements: &[MovementItem],
        movement_types: &[MovementType],
    ) -> TotalsOutcome {
        let catalog = CategoryService::catalog(movement_types);
        Self::compute_with_catalog(movements, &catalog, None)
    }

    pub(crate) fn compute_with_catalog(
        movements: &[MovementItem],
        catalog: &CategoryCatalog,
        closing_id: Option<Uuid>,
    ) -> TotalsOutcome {
        let mut revenue = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        let mut other = Decimal::ZERO;
        let mut issues = Vec::new();

        for movement in movements {
            match catalog.resolve(movement.movement_type_id) {
                Ok(category) => {
                    let amount = movement.recognized_amount(category);
                    match category {
                        MovementCategory::Revenue => revenue = revenue.saturating_add(amount),
                        MovementCategory::Expense => expense = expense.saturating_add(amount),
                        MovementCategory::Other => other = other.saturating_add(amount),
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        movement = %movement.id,
                        movement_type = %movement.movement_type_id,
                        closing = ?closing_id,
                        "excluding movement from totals: {err}"
                    );
                    issues.push(ConfigurationIssue::unresolved(movement, closing_id, err));
                }
            }
        }

        TotalsOutcome {
            totals: ClosingTotals::from_parts(revenue, expense, other),
            issues,
        }
    }

    /// Groups recognized amounts per payment method, in catalog order.
    ///
    /// Movements without a method come last under `Unassigned`; references to
    /// methods missing from the catalog are grouped under `Unknown method`.
    /// Movements with unresolved types are skipped, as in the totals.
    pub fn payment_breakdown(
        movements: &[MovementItem],
        payment_methods: &[PaymentMethod],
        movement_types: &[MovementType],
    ) -> Vec<PaymentMethodTotal> {
        let catalog = CategoryService::catalog(movement_types);
        let mut grouped: HashMap<Option<Uuid>, PaymentMethodTotal> = HashMap::new();

        for movement in movements {
            let Ok(category) = catalog.resolve(movement.movement_type_id) else {
                continue;
            };
            let entry = grouped
                .entry(movement.payment_method_id)
                .or_insert_with(|| PaymentMethodTotal {
                    payment_method_id: movement.payment_method_id,
                    name: method_name(movement.payment_method_id, payment_methods),
                    revenue: Decimal::ZERO,
                    expense: Decimal::ZERO,
                    other: Decimal::ZERO,
                    movement_count: 0,
                });
            let amount = movement.recognized_amount(category);
            match category {
                MovementCategory::Revenue => entry.revenue = entry.revenue.saturating_add(amount),
                MovementCategory::Expense => entry.expense = entry.expense.saturating_add(amount),
                MovementCategory::Other => entry.other = entry.other.saturating_add(amount),
            }
            entry.movement_count += 1;
        }

        let mut breakdown = Vec::with_capacity(grouped.len());
        for method in payment_methods {
            if let Some(total) = grouped.remove(&Some(method.id)) {
                breakdown.push(total);
            }
        }
        let unassigned = grouped.remove(&None);
        let mut unknown: Vec<PaymentMethodTotal> = grouped.into_values().collect();
        unknown.sort_by_key(|total| total.payment_method_id);
        breakdown.extend(unknown);
        breakdown.extend(unassigned);
        breakdown
    }
}

fn method_name(id: Option<Uuid>, payment_methods: &[PaymentMethod]) -> String {
    match id {
        None => UNASSIGNED_METHOD.into(),
        Some(id) => find_by_id(payment_methods, id)
            .map(|method| method.name.clone())
            .unwrap_or_else(|| UNKNOWN_METHOD.into()),
    }
}
