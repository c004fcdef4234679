//! Closing lifecycle: registration, movement replacement, and reconciliation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    closing::{BalanceReconciliation, StoreClosing},
    movement::{ConfigurationIssue, MovementCategory, MovementItem, MovementType},
    snapshot::ClosingSnapshot,
};

use super::{CategoryService, ServiceError, ServiceResult, TotalsService};

/// Input for a new closing. Totals are never part of the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingDraft {
    pub store_id: Uuid,
    pub closing_date: NaiveDate,
    pub initial_balance: Decimal,
    pub final_balance: Decimal,
    #[serde(default)]
    pub movements: Vec<MovementItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A closing with derived totals plus any movements excluded from them.
#[derive(Debug, Clone)]
pub struct RegisteredClosing {
    pub closing: StoreClosing,
    pub issues: Vec<ConfigurationIssue>,
}

pub struct ClosingService;

impl ClosingService {
    /// Checks the amount rules enforced before a movement reaches the aggregators.
    pub fn validate_movement(
        movement: &MovementItem,
        movement_types: &[MovementType],
    ) -> ServiceResult<()> {
        if movement.amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(format!(
                "movement {} amount must be positive, got {}",
                movement.id, movement.amount
            )));
        }
        let discount = movement.discount_or_zero();
        if discount < Decimal::ZERO {
            return Err(ServiceError::Invalid(format!(
                "movement {} discount must not be negative, got {}",
                movement.id, discount
            )));
        }
        // Unresolved types are reported by the totals calculator instead.
        if let Ok(MovementCategory::Revenue) =
            CategoryService::resolve(movement.movement_type_id, movement_types)
        {
            if discount > movement.amount {
                return Err(ServiceError::Invalid(format!(
                    "movement {} discount {} exceeds amount {}",
                    movement.id, discount, movement.amount
                )));
            }
        }
        Ok(())
    }

    /// Builds a closing from a draft, deriving totals from its movements.
    pub fn build(draft: ClosingDraft, movement_types: &[MovementType]) -> RegisteredClosing {
        let mut closing = StoreClosing::new(
            draft.store_id,
            draft.closing_date,
            draft.initial_balance,
            draft.final_balance,
        );
        closing.notes = draft.notes;
        let issues = Self::replace_movements(&mut closing, draft.movements, movement_types);
        RegisteredClosing { closing, issues }
    }

    /// Validates a draft against the snapshot catalogs and builds the closing.
    pub fn register(
        snapshot: &ClosingSnapshot,
        draft: ClosingDraft,
    ) -> ServiceResult<RegisteredClosing> {
        if snapshot.store(draft.store_id).is_none() {
            return Err(ServiceError::StoreNotFound(draft.store_id));
        }
        for movement in &draft.movements {
            Self::validate_movement(movement, &snapshot.movement_types)?;
        }
        let registered = Self::build(draft, &snapshot.movement_types);
        tracing::debug!(
            closing = %registered.closing.id,
            store = %registered.closing.store_id,
            date = %registered.closing.closing_date,
            movements = registered.closing.movements.len(),
            issues = registered.issues.len(),
            "closing registered"
        );
        Ok(registered)
    }

    /// Replaces the movement list and re-derives the totals from scratch.
    pub fn replace_movements(
        closing: &mut StoreClosing,
        movements: Vec<MovementItem>,
        movement_types: &[MovementType],
    ) -> Vec<ConfigurationIssue> {
        let catalog = CategoryService::catalog(movement_types);
        let outcome = TotalsService::compute_with_catalog(&movements, &catalog, Some(closing.id));
        closing.set_derived(movements, outcome.totals);
        outcome.issues
    }

    /// Re-derives totals for the current movements, e.g. after a catalog fix.
    pub fn recompute(
        closing: &mut StoreClosing,
        movement_types: &[MovementType],
    ) -> Vec<ConfigurationIssue> {
        let movements = std::mem::take(&mut closing.movements);
        Self::replace_movements(closing, movements, movement_types)
    }

    pub fn reconcile(closing: &StoreClosing) -> BalanceReconciliation {
        closing.reconciliation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::fixtures::{day, Fixture};
    use rust_decimal_macros::dec;

    fn draft(fixture: &Fixture, store_id: Uuid, movements: Vec<MovementItem>) -> ClosingDraft {
        ClosingDraft {
            store_id,
            closing_date: day(2024, 3, 5),
            initial_balance: dec!(200),
            final_balance: dec!(900),
            movements,
            notes: Some(format!("{} movements", fixture.snapshot.movement_types.len())),
        }
    }

    #[test]
    fn register_derives_totals_from_movements() {
        let mut fixture = Fixture::new();
        let store = fixture.store("Centro");
        let movements = vec![
            MovementItem::new(fixture.revenue, dec!(1000)).with_discount(dec!(100)),
            MovementItem::new(fixture.expense, dec!(200)),
        ];
        let registered =
            ClosingService::register(&fixture.snapshot, draft(&fixture, store, movements))
                .unwrap();
        assert!(registered.issues.is_empty());
        assert_eq!(registered.closing.total_revenue(), dec!(900));
        assert_eq!(registered.closing.total_expense(), dec!(200));
        assert_eq!(registered.closing.net_result(), dec!(700));
    }

    #[test]
    fn register_rejects_unknown_store() {
        let fixture = Fixture::new();
        let missing = Uuid::new_v4();
        let err = ClosingService::register(&fixture.snapshot, draft(&fixture, missing, vec![]))
            .expect_err("unknown store");
        assert!(matches!(err, ServiceError::StoreNotFound(id) if id == missing));
    }

    #[test]
    fn register_rejects_revenue_discount_above_amount() {
        let mut fixture = Fixture::new();
        let store = fixture.store("Centro");
        let movements =
            vec![MovementItem::new(fixture.revenue, dec!(10)).with_discount(dec!(11))];
        let err = ClosingService::register(&fixture.snapshot, draft(&fixture, store, movements))
            .expect_err("discount above amount");
        assert!(err.to_string().contains("exceeds amount"));
    }

    #[test]
    fn validate_rejects_non_positive_amounts() {
        let fixture = Fixture::new();
        let zero = MovementItem::new(fixture.expense, dec!(0));
        assert!(ClosingService::validate_movement(&zero, &fixture.snapshot.movement_types).is_err());
        let negative_discount =
            MovementItem::new(fixture.expense, dec!(5)).with_discount(dec!(-1));
        assert!(ClosingService::validate_movement(
            &negative_discount,
            &fixture.snapshot.movement_types
        )
        .is_err());
    }

    #[test]
    fn replacing_movements_recomputes_instead_of_patching() {
        let mut fixture = Fixture::new();
        let store = fixture.store("Centro");
        let mut registered = ClosingService::build(
            draft(
                &fixture,
                store,
                vec![MovementItem::new(fixture.revenue, dec!(500))],
            ),
            &fixture.snapshot.movement_types,
        );
        let issues = ClosingService::replace_movements(
            &mut registered.closing,
            vec![
                MovementItem::new(fixture.revenue, dec!(80)),
                MovementItem::new(fixture.other, dec!(30)),
            ],
            &fixture.snapshot.movement_types,
        );
        assert!(issues.is_empty());
        assert_eq!(registered.closing.total_revenue(), dec!(80));
        assert_eq!(registered.closing.total_other(), dec!(30));
        assert_eq!(registered.closing.movements.len(), 2);
    }

    #[test]
    fn recompute_picks_up_catalog_fixes() {
        let mut fixture = Fixture::new();
        let store = fixture.store("Centro");
        let late_type = MovementType::new("Delivery", MovementCategory::Revenue);
        let mut registered = ClosingService::build(
            draft(
                &fixture,
                store,
                vec![MovementItem::new(late_type.id, dec!(40))],
            ),
            &fixture.snapshot.movement_types,
        );
        assert_eq!(registered.issues.len(), 1);
        assert_eq!(registered.issues[0].closing_id, Some(registered.closing.id));
        assert_eq!(registered.closing.total_revenue(), dec!(0));

        fixture.snapshot.add_movement_type(late_type);
        let issues =
            ClosingService::recompute(&mut registered.closing, &fixture.snapshot.movement_types);
        assert!(issues.is_empty());
        assert_eq!(registered.closing.total_revenue(), dec!(40));
    }

    #[test]
    fn reconciliation_is_distinct_from_net_result() {
        let mut fixture = Fixture::new();
        let store = fixture.store("Centro");
        let registered = ClosingService::build(
            draft(
                &fixture,
                store,
                vec![
                    MovementItem::new(fixture.revenue, dec!(1000)),
                    MovementItem::new(fixture.expense, dec!(300)),
                ],
            ),
            &fixture.snapshot.movement_types,
        );
        let check = ClosingService::reconcile(&registered.closing);
        assert_eq!(check.declared_net, dec!(700));
        assert_eq!(check.balance_change, dec!(700));
        assert!(check.is_balanced());
        assert_eq!(registered.closing.net_result(), dec!(700));

        let mut short = registered.closing.clone();
        short.final_balance = dec!(850);
        let check = ClosingService::reconcile(&short);
        assert_eq!(check.difference, dec!(-50));
        assert!(!check.is_balanced());
        assert_eq!(short.net_result(), dec!(700));
    }
}
