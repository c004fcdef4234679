//! Month-over-month comparison built from two DRE reports.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config::Config,
    domain::{
        report::{DreTotals, MomReport, MomRow, MonthYear},
        snapshot::ClosingSnapshot,
    },
};

use super::DreService;

/// Reported change when the previous value is zero.
pub const ZERO_BASELINE_CHANGE: Decimal = Decimal::ONE_HUNDRED;

pub struct ComparisonService;

impl ComparisonService {
    /// Compares each store's DRE for `month` against the preceding month.
    ///
    /// Rows follow the current month; stores active only in the previous
    /// month are not surfaced.
    pub fn build_month_over_month(
        snapshot: &ClosingSnapshot,
        month: MonthYear,
        store_id: Option<Uuid>,
        config: &Config,
    ) -> MomReport {
        let previous_month = month.previous();
        let current =
            DreService::build_report_for_window(snapshot, month.window(), store_id, config);
        let previous = DreService::build_report_for_window(
            snapshot,
            previous_month.window(),
            store_id,
            config,
        );

        let previous_totals: HashMap<Uuid, DreTotals> = previous
            .stores
            .into_iter()
            .map(|row| (row.store.id, row.totals))
            .collect();

        let rows: Vec<MomRow> = current
            .stores
            .into_iter()
            .map(|row| {
                let prev = previous_totals
                    .get(&row.store.id)
                    .copied()
                    .unwrap_or_default();
                MomRow {
                    revenue_change: Self::change_percent(
                        row.totals.total_revenue,
                        prev.total_revenue,
                    ),
                    expense_change: Self::change_percent(
                        row.totals.total_expense,
                        prev.total_expense,
                    ),
                    result_change: Self::result_change_percent(
                        row.totals.net_result,
                        prev.net_result,
                    ),
                    prev_revenue: prev.total_revenue,
                    prev_expense: prev.total_expense,
                    prev_result: prev.net_result,
                    current: row,
                }
            })
            .collect();

        tracing::debug!(
            month = %month,
            previous = %previous_month,
            rows = rows.len(),
            "month-over-month report built"
        );

        MomReport {
            month,
            previous_month,
            rows,
        }
    }

    /// Percentage change for revenue and expense.
    ///
    /// A zero previous value reports [`ZERO_BASELINE_CHANGE`].
    pub fn change_percent(current: Decimal, previous: Decimal) -> Decimal {
        if previous.is_zero() {
            return ZERO_BASELINE_CHANGE;
        }
        percent_of(current.saturating_sub(previous), previous)
    }

    /// Percentage change for the net result, divided by `|previous|` so a
    /// recovery from a loss reads as positive growth.
    pub fn result_change_percent(current: Decimal, previous: Decimal) -> Decimal {
        if previous.is_zero() {
            return ZERO_BASELINE_CHANGE;
        }
        percent_of(current.saturating_sub(previous), previous.abs())
    }
}

fn percent_of(delta: Decimal, divisor: Decimal) -> Decimal {
    delta
        .checked_div(divisor)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            // Saturate on overflow; the sign follows the delta over the divisor.
            if delta.is_sign_negative() == divisor.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}
