//! Reporting windows and the value objects returned by the report services.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    currency::format_date,
    domain::{closing::StoreClosing, common::*, store::Store},
    errors::{ClosingError, Result},
};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive reporting window `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ClosingError::InvalidInput(format!(
                "window end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses `YYYY-MM-DD` bounds; malformed dates fail fast.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    pub fn for_month(month: MonthYear) -> Self {
        month.window()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Human-readable rendering such as `01/03/2024 - 31/03/2024`.
    pub fn label(&self, date_format: &str) -> String {
        format!(
            "{} - {}",
            format_date(self.start, date_format),
            format_date(self.end, date_format)
        )
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT)
        .map_err(|_| ClosingError::InvalidInput(format!("Invalid date format: {}", raw)))
}

/// Calendar month used by month-over-month comparisons and goals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "RawMonthYear")]
pub struct MonthYear {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawMonthYear {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonthYear> for MonthYear {
    type Error = ClosingError;

    fn try_from(raw: RawMonthYear) -> Result<Self> {
        Self::new(raw.month, raw.year)
    }
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ClosingError::InvalidInput(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none()
            || NaiveDate::from_ymd_opt(year + 1, 1, 1).is_none()
            || NaiveDate::from_ymd_opt(year - 1, 12, 1).is_none()
        {
            return Err(ClosingError::InvalidInput(format!(
                "year {} is outside the supported calendar",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// Accepts `YYYY-MM` or `MM/YYYY`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = || ClosingError::InvalidInput(format!("Invalid month format: {}", raw));
        let (year, month) = if let Some((year, month)) = raw.split_once('-') {
            (year, month)
        } else if let Some((month, year)) = raw.split_once('/') {
            (year, month)
        } else {
            return Err(invalid());
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(month, year)
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The immediately preceding calendar month; January rolls back to December.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_next| first_next - Duration::days(1))
            .unwrap_or_else(|| self.first_day())
    }

    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Revenue, expense and net totals for a DRE row or the consolidated line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DreTotals {
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub total_other: Decimal,
    pub net_result: Decimal,
}

impl DreTotals {
    /// Adds a closing's stored totals and refreshes the net result.
    pub fn add_closing(&mut self, closing: &StoreClosing) {
        self.total_revenue = self.total_revenue.saturating_add(closing.total_revenue());
        self.total_expense = self.total_expense.saturating_add(closing.total_expense());
        self.total_other = self.total_other.saturating_add(closing.total_other());
        self.net_result = self.total_revenue.saturating_sub(self.total_expense);
    }

    /// Element-wise sum used to build the consolidated line. Sums saturate.
    pub fn accumulate(&mut self, other: &DreTotals) {
        self.total_revenue = self.total_revenue.saturating_add(other.total_revenue);
        self.total_expense = self.total_expense.saturating_add(other.total_expense);
        self.total_other = self.total_other.saturating_add(other.total_other);
        self.net_result = self.net_result.saturating_add(other.net_result);
    }

    pub fn is_zero(&self) -> bool {
        self.total_revenue.is_zero()
            && self.total_expense.is_zero()
            && self.total_other.is_zero()
            && self.net_result.is_zero()
    }
}

/// Per-store DRE line with the closings that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DreStoreRow {
    pub store: Store,
    pub closings: Vec<StoreClosing>,
    pub totals: DreTotals,
}

impl DreStoreRow {
    pub fn closing_count(&self) -> usize {
        self.closings.len()
    }
}

impl Displayable for DreStoreRow {
    fn display_label(&self) -> String {
        format!(
            "{}: revenue {} / expense {} / net {}",
            self.store.display_label(),
            self.totals.total_revenue,
            self.totals.total_expense,
            self.totals.net_result
        )
    }
}

/// Income-statement report for a window, per store plus a consolidated line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DreData {
    pub period: String,
    pub window: DateWindow,
    pub stores: Vec<DreStoreRow>,
    pub consolidated: DreTotals,
    #[serde(default)]
    pub orphaned_closings: usize,
}

impl DreData {
    pub fn store_row(&self, store_id: uuid::Uuid) -> Option<&DreStoreRow> {
        self.stores.iter().find(|row| row.store.id == store_id)
    }
}

/// A current-period DRE row joined with the previous month's figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MomRow {
    pub current: DreStoreRow,
    pub prev_revenue: Decimal,
    pub prev_expense: Decimal,
    pub prev_result: Decimal,
    pub revenue_change: Decimal,
    pub expense_change: Decimal,
    pub result_change: Decimal,
}

/// Month-over-month comparison output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MomReport {
    pub month: MonthYear,
    pub previous_month: MonthYear,
    pub rows: Vec<MomRow>,
}

impl MomReport {
    pub fn row(&self, store_id: uuid::Uuid) -> Option<&MomRow> {
        self.rows.iter().find(|row| row.current.store.id == store_id)
    }
}

/// Lifetime metrics for a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreRanking {
    pub store: Store,
    pub total_closings: usize,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub net_result: Decimal,
    pub average_balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_closing_date: Option<NaiveDate>,
}

impl StoreRanking {
    pub fn empty(store: Store) -> Self {
        Self {
            store,
            total_closings: 0,
            total_revenue: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net_result: Decimal::ZERO,
            average_balance: Decimal::ZERO,
            last_closing_date: None,
        }
    }
}
