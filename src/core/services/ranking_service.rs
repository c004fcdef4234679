//! Lifetime store rankings.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{closing::StoreClosing, report::StoreRanking, snapshot::ClosingSnapshot};

/// Running sums for one store before the averages are taken.
#[derive(Default)]
struct StoreTally {
    closings: usize,
    revenue: Decimal,
    expense: Decimal,
    balances: Decimal,
    last_closing: Option<NaiveDate>,
}

impl StoreTally {
    fn add(&mut self, closing: &StoreClosing) {
        self.closings += 1;
        self.revenue = self.revenue.saturating_add(closing.total_revenue());
        self.expense = self.expense.saturating_add(closing.total_expense());
        self.balances = self
            .balances
            .saturating_add(closing.initial_balance)
            .saturating_add(closing.final_balance);
        self.last_closing = self.last_closing.max(Some(closing.closing_date));
    }

    /// Mean of every opening and closing balance.
    fn average_balance(&self) -> Decimal {
        if self.closings == 0 {
            return Decimal::ZERO;
        }
        let samples = Decimal::from(self.closings) * Decimal::from(2u8);
        self.balances.checked_div(samples).unwrap_or(Decimal::ZERO)
    }
}

pub struct RankingService;

impl RankingService {
    /// Ranks every catalog store by lifetime revenue, highest first.
    ///
    /// Stores without closings still get a zeroed row. Ties keep catalog order.
    /// A store id listed twice in the catalog is ranked once, at its first entry.
    pub fn build_rankings(snapshot: &ClosingSnapshot) -> Vec<StoreRanking> {
        let mut tallies: HashMap<Uuid, StoreTally> = HashMap::new();
        for closing in &snapshot.closings {
            tallies.entry(closing.store_id).or_default().add(closing);
        }

        let mut seen: HashSet<Uuid> = HashSet::with_capacity(snapshot.stores.len());
        let mut duplicates = 0usize;
        let mut rankings: Vec<StoreRanking> = snapshot
            .stores
            .iter()
            .filter(|store| {
                let first = seen.insert(store.id);
                if !first {
                    duplicates += 1;
                }
                first
            })
            .map(|store| match tallies.get(&store.id) {
                None => StoreRanking::empty(store.clone()),
                Some(tally) => StoreRanking {
                    store: store.clone(),
                    total_closings: tally.closings,
                    total_revenue: tally.revenue,
                    total_expense: tally.expense,
                    net_result: tally.revenue.saturating_sub(tally.expense),
                    average_balance: tally.average_balance(),
                    last_closing_date: tally.last_closing,
                },
            })
            .collect();

        if duplicates > 0 {
            tracing::warn!(duplicates, "store catalog lists the same store id more than once");
        }

        rankings.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));

        tracing::debug!(
            stores = rankings.len(),
            closings = snapshot.closings.len(),
            "store rankings built"
        );
        rankings
    }
}
