//! Monthly goal attainment and goal upserts.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    closing::StoreClosing,
    goal::{GoalProgress, StoreGoal},
    report::MonthYear,
    snapshot::ClosingSnapshot,
};

use super::{ServiceError, ServiceResult};

const FULL_PROGRESS: Decimal = Decimal::ONE_HUNDRED;

/// Outcome of [`GoalService::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalUpsert {
    Created(Uuid),
    Updated(Uuid),
}

impl GoalUpsert {
    pub fn id(&self) -> Uuid {
        match self {
            GoalUpsert::Created(id) | GoalUpsert::Updated(id) => *id,
        }
    }
}

pub struct GoalService;

impl GoalService {
    /// Measures realized revenue against the goal's target for its month.
    ///
    /// `closings` may span any stores or dates; only the goal's store and
    /// month are counted.
    pub fn compute_progress(goal: &StoreGoal, closings: &[StoreClosing]) -> GoalProgress {
        let current_revenue: Decimal = match goal.month_year() {
            Some(month) => closings
                .iter()
                .filter(|closing| closing.store_id == goal.store_id)
                .filter(|closing| month.contains(closing.closing_date))
                .map(StoreClosing::total_revenue)
                .fold(Decimal::ZERO, Decimal::saturating_add),
            None => {
                tracing::warn!(goal = %goal.id, month = goal.month, "goal has an invalid month");
                Decimal::ZERO
            }
        };

        let target = goal.target_revenue;
        let progress_percent = if target <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            current_revenue
                .checked_div(target)
                .and_then(|ratio| ratio.checked_mul(FULL_PROGRESS))
                .unwrap_or(FULL_PROGRESS)
                .clamp(Decimal::ZERO, FULL_PROGRESS)
        };

        GoalProgress {
            goal: goal.clone(),
            current_revenue,
            progress_percent,
            remaining: target.saturating_sub(current_revenue).max(Decimal::ZERO),
            goal_met: target > Decimal::ZERO && current_revenue >= target,
        }
    }

    /// Inserts a goal, or updates the target of the goal already set for the
    /// same store and month.
    pub fn upsert(goals: &mut Vec<StoreGoal>, goal: StoreGoal) -> ServiceResult<GoalUpsert> {
        MonthYear::new(goal.month, goal.year)?;
        if goal.target_revenue < Decimal::ZERO {
            return Err(ServiceError::Invalid(format!(
                "goal target must not be negative, got {}",
                goal.target_revenue
            )));
        }

        if let Some(existing) = goals.iter_mut().find(|existing| existing.same_slot(&goal)) {
            existing.target_revenue = goal.target_revenue;
            tracing::debug!(goal = %existing.id, target = %existing.target_revenue, "goal updated");
            return Ok(GoalUpsert::Updated(existing.id));
        }

        let id = goal.id;
        goals.push(goal);
        tracing::debug!(goal = %id, "goal created");
        Ok(GoalUpsert::Created(id))
    }

    /// Progress for every goal set for `month`, in snapshot order.
    pub fn progress_for_month(snapshot: &ClosingSnapshot, month: MonthYear) -> Vec<GoalProgress> {
        snapshot
            .goals
            .iter()
            .filter(|goal| goal.month == month.month() && goal.year == month.year())
            .map(|goal| Self::compute_progress(goal, &snapshot.closings))
            .collect()
    }
}
