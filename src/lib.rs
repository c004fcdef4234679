#![doc(test(attr(deny(warnings))))]

//! Closing Core consolidates end-of-day store cash closings into DRE reports,
//! month-over-month comparisons, lifetime store rankings, and goal tracking.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod utils;

pub use crate::core::report_manager::{
    InMemorySnapshot, JsonSnapshotFile, ReportManager, SnapshotSource,
};
pub use crate::core::services::{
    CategoryService, ClosingService, ComparisonService, DreService, GoalService, RankingService,
    StoreService, TotalsService,
};
pub use errors::{ClosingError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git_hash = build.git_hash,
            target = build.target,
            "Closing Core tracing initialized."
        );
    });
}
