//! Builds DRE (income statement) reports over a date window.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    config::Config,
    domain::{
        closing::StoreClosing,
        report::{DateWindow, DreData, DreStoreRow, DreTotals},
        snapshot::ClosingSnapshot,
        store::Store,
    },
};

/// Stateless DRE builder operating over [`ClosingSnapshot`]s.
pub struct DreService;

impl DreService {
    /// Builds the report for the inclusive window `[start, end]`.
    ///
    /// A reversed window is not rejected; it simply matches no closings.
    pub fn build_report(
        snapshot: &ClosingSnapshot,
        start: NaiveDate,
        end: NaiveDate,
        store_id: Option<Uuid>,
        config: &Config,
    ) -> DreData {
        Self::build_report_for_window(snapshot, DateWindow { start, end }, store_id, config)
    }

    pub fn build_report_for_window(
        snapshot: &ClosingSnapshot,
        window: DateWindow,
        store_id: Option<Uuid>,
        config: &Config,
    ) -> DreData {
        if window.is_empty() {
            tracing::debug!(start = %window.start, end = %window.end, "DRE window is reversed");
        }

        let known_stores: HashSet<Uuid> = snapshot.stores.iter().map(|store| store.id).collect();
        let mut by_store: HashMap<Uuid, Vec<&StoreClosing>> = HashMap::new();
        let mut orphaned_closings = 0usize;

        for closing in &snapshot.closings {
            if !window.contains(closing.closing_date) {
                continue;
            }
            if store_id.is_some_and(|id| closing.store_id != id) {
                continue;
            }
            if !known_stores.contains(&closing.store_id) {
                orphaned_closings += 1;
                continue;
            }
            by_store.entry(closing.store_id).or_default().push(closing);
        }

        if orphaned_closings > 0 {
            tracing::warn!(
                orphaned_closings,
                "closings reference stores missing from the catalog"
            );
        }

        let candidates: Vec<&Store> = match store_id {
            Some(id) => snapshot.store(id).into_iter().collect(),
            None => snapshot.stores.iter().collect(),
        };

        let stores: Vec<DreStoreRow> = candidates
            .into_iter()
            .filter_map(|store| {
                let mut closings = by_store.remove(&store.id)?;
                if closings.is_empty() {
                    return None;
                }
                closings.sort_by_key(|closing| closing.closing_date);
                let mut totals = DreTotals::default();
                for closing in &closings {
                    totals.add_closing(closing);
                }
                Some(DreStoreRow {
                    store: store.clone(),
                    closings: closings.into_iter().cloned().collect(),
                    totals,
                })
            })
            .collect();

        let mut consolidated = DreTotals::default();
        for row in &stores {
            consolidated.accumulate(&row.totals);
        }

        tracing::debug!(
            start = %window.start,
            end = %window.end,
            store = ?store_id,
            rows = stores.len(),
            "DRE report built"
        );

        DreData {
            period: window.label(&config.date_format),
            window,
            stores,
            consolidated,
            orphaned_closings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::fixtures::{day, Fixture};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn single_store_march_scenario() {
        let mut fixture = Fixture::new();
        let store_a = fixture.store("A");
        fixture.closing(store_a, day(2024, 3, 4), dec!(1000), dec!(300));
        fixture.closing(store_a, day(2024, 3, 18), dec!(500), dec!(100));
        fixture.closing(store_a, day(2024, 4, 1), dec!(999), dec!(1));

        let report = DreService::build_report(
            &fixture.snapshot,
            day(2024, 3, 1),
            day(2024, 3, 31),
            Some(store_a),
            &Config::default(),
        );

        assert_eq!(report.stores.len(), 1);
        let row = &report.stores[0];
        assert_eq!(row.totals.total_revenue, dec!(1500));
        assert_eq!(row.totals.total_expense, dec!(400));
        assert_eq!(row.totals.net_result, dec!(1100));
        assert_eq!(row.closing_count(), 2);
        assert_eq!(report.consolidated, row.totals);
        assert_eq!(report.period, "01/03/2024 - 31/03/2024");
    }

    #[test]
    fn stores_without_activity_are_dropped() {
        let mut fixture = Fixture::new();
        let busy = fixture.store("Busy");
        let idle = fixture.store("Idle");
        fixture.closing(busy, day(2024, 3, 10), dec!(100), dec!(40));

        let report = DreService::build_report(
            &fixture.snapshot,
            day(2024, 3, 1),
            day(2024, 3, 31),
            None,
            &Config::default(),
        );
        assert_eq!(report.stores.len(), 1);
        assert!(report.store_row(idle).is_none());
        assert!(report.store_row(busy).is_some());
    }

    #[test]
    fn consolidated_is_sum_of_rows() {
        let mut fixture = Fixture::new();
        let a = fixture.store("A");
        let b = fixture.store("B");
        let c = fixture.store("C");
        fixture.closing(a, day(2024, 5, 1), dec!(0.10), dec!(0.20));
        fixture.closing(b, day(2024, 5, 2), dec!(1234.56), dec!(999.99));
        fixture.closing(c, day(2024, 5, 3), dec!(0.01), dec!(7));
        fixture.closing(a, day(2024, 5, 31), dec!(3.33), dec!(0));

        let report = DreService::build_report(
            &fixture.snapshot,
            day(2024, 5, 1),
            day(2024, 5, 31),
            None,
            &Config::default(),
        );
        let revenue: Decimal = report.stores.iter().map(|r| r.totals.total_revenue).sum();
        let expense: Decimal = report.stores.iter().map(|r| r.totals.total_expense).sum();
        let net: Decimal = report.stores.iter().map(|r| r.totals.net_result).sum();
        assert_eq!(report.consolidated.total_revenue, revenue);
        assert_eq!(report.consolidated.total_expense, expense);
        assert_eq!(report.consolidated.net_result, net);
    }

    #[test]
    fn empty_and_reversed_windows_yield_zero_reports() {
        let mut fixture = Fixture::new();
        let a = fixture.store("A");
        fixture.closing(a, day(2024, 3, 10), dec!(100), dec!(40));

        let empty = DreService::build_report(
            &fixture.snapshot,
            day(2023, 1, 1),
            day(2023, 1, 31),
            None,
            &Config::default(),
        );
        assert!(empty.stores.is_empty());
        assert!(empty.consolidated.is_zero());

        let reversed = DreService::build_report(
            &fixture.snapshot,
            day(2024, 3, 31),
            day(2024, 3, 1),
            None,
            &Config::default(),
        );
        assert!(reversed.stores.is_empty());
        assert!(reversed.consolidated.is_zero());
    }

    #[test]
    fn unknown_store_filter_yields_empty_report() {
        let mut fixture = Fixture::new();
        let a = fixture.store("A");
        fixture.closing(a, day(2024, 3, 10), dec!(100), dec!(40));
        let report = DreService::build_report(
            &fixture.snapshot,
            day(2024, 3, 1),
            day(2024, 3, 31),
            Some(Uuid::new_v4()),
            &Config::default(),
        );
        assert!(report.stores.is_empty());
    }

    #[test]
    fn closings_for_unknown_stores_are_counted_as_orphaned() {
        let mut fixture = Fixture::new();
        let a = fixture.store("A");
        fixture.closing(a, day(2024, 3, 10), dec!(100), dec!(40));
        fixture.closing(Uuid::new_v4(), day(2024, 3, 11), dec!(50), dec!(0));
        let report = DreService::build_report(
            &fixture.snapshot,
            day(2024, 3, 1),
            day(2024, 3, 31),
            None,
            &Config::default(),
        );
        assert_eq!(report.orphaned_closings, 1);
        assert_eq!(report.consolidated.total_revenue, dec!(100));
    }

    #[test]
    fn uses_stored_totals_without_rederiving() {
        let mut fixture = Fixture::new();
        let a = fixture.store("A");
        fixture.closing(a, day(2024, 3, 10), dec!(100), dec!(40));
        // Dropping the catalog would zero any re-derivation from movements.
        fixture.snapshot.movement_types.clear();
        let report = DreService::build_report(
            &fixture.snapshot,
            day(2024, 3, 1),
            day(2024, 3, 31),
            None,
            &Config::default(),
        );
        assert_eq!(report.consolidated.total_revenue, dec!(100));
    }
}
