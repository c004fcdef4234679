use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::Config;
use crate::core::cache::{CacheStats, CacheableReport, ReportCache, ReportKey};
use crate::core::services::{
    ComparisonService, DreService, GoalService, RankingService, StoreService, TotalsOutcome,
    TotalsService,
};
use crate::domain::{
    goal::{GoalProgress, StoreGoal},
    movement::MovementItem,
    report::{DateWindow, DreData, MomReport, MonthYear, StoreRanking},
    snapshot::ClosingSnapshot,
};
use crate::errors::{ClosingError, Result};
use crate::utils::{
    paths::snapshots_dir_in,
    persistence::{load_snapshot_from_file, save_snapshot_to_file},
};

/// Trait that abstracts where closing snapshots come from.
pub trait SnapshotSource: Send + Sync {
    fn load(&self) -> Result<ClosingSnapshot>;
    fn describe(&self) -> String;
}

/// Snapshot exported to a JSON file by the persistence collaborator.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves `<base>/snapshots/<name>.json`.
    pub fn named(base: &Path, name: &str) -> Self {
        Self::new(snapshots_dir_in(base).join(format!("{}.json", name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, snapshot: &ClosingSnapshot) -> Result<()> {
        save_snapshot_to_file(snapshot, &self.path)
    }
}

impl SnapshotSource for JsonSnapshotFile {
    fn load(&self) -> Result<ClosingSnapshot> {
        load_snapshot_from_file(&self.path)
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

/// Snapshot held in memory; `replace` stands in for an upstream data change.
#[derive(Debug, Default)]
pub struct InMemorySnapshot {
    snapshot: RwLock<ClosingSnapshot>,
}

impl InMemorySnapshot {
    pub fn new(snapshot: ClosingSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn replace(&self, snapshot: ClosingSnapshot) {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = snapshot;
    }
}

impl SnapshotSource for InMemorySnapshot {
    fn load(&self) -> Result<ClosingSnapshot> {
        let guard = self
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "in-memory snapshot".into()
    }
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for Arc<T> {
    fn load(&self) -> Result<ClosingSnapshot> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Facade that answers report queries over the most recently loaded snapshot.
pub struct ReportManager {
    source: Box<dyn SnapshotSource>,
    config: Config,
    snapshot: Option<Arc<ClosingSnapshot>>,
    version: u64,
    cache: Mutex<ReportCache>,
}

impl ReportManager {
    pub fn new(source: Box<dyn SnapshotSource>, config: Config) -> Self {
        let cache = ReportCache::with_capacity(config.cache_capacity);
        Self {
            source,
            config,
            snapshot: None,
            version: 0,
            cache: Mutex::new(cache),
        }
    }

    pub fn source(&self) -> &dyn SnapshotSource {
        self.source.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swaps the configuration. Cached reports are dropped since labels
    /// depend on it.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        let mut cache = self.lock_cache();
        cache.invalidate(self.version);
        cache.set_capacity(self.config.cache_capacity);
    }

    /// Pulls a fresh snapshot from the source and returns the new version.
    pub fn refresh(&mut self) -> Result<u64> {
        let snapshot = self.source.load()?;
        if let Err(err) = StoreService::validate_catalog(&snapshot.stores) {
            tracing::warn!(source = %self.source.describe(), "{err}");
        }
        self.version += 1;
        tracing::info!(
            source = %self.source.describe(),
            version = self.version,
            stores = snapshot.stores.len(),
            closings = snapshot.closings.len(),
            goals = snapshot.goals.len(),
            "snapshot refreshed"
        );
        self.snapshot = Some(Arc::new(snapshot));
        self.lock_cache().invalidate(self.version);
        Ok(self.version)
    }

    pub fn snapshot(&self) -> Result<Arc<ClosingSnapshot>> {
        self.snapshot.clone().ok_or(ClosingError::SnapshotNotLoaded)
    }

    /// Zero until the first successful [`refresh`](Self::refresh).
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    /// Totals for an arbitrary movement list, resolved against the loaded catalog.
    pub fn compute_closing_totals(&self, movements: &[MovementItem]) -> Result<TotalsOutcome> {
        let snapshot = self.snapshot()?;
        Ok(TotalsService::compute_closing_totals(
            movements,
            &snapshot.movement_types,
        ))
    }

    pub fn build_dre_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        store_id: Option<Uuid>,
    ) -> Result<DreData> {
        let snapshot = self.snapshot()?;
        let window = DateWindow { start, end };
        Ok(self.cached(ReportKey::Dre { window, store_id }, || {
            DreService::build_report_for_window(&snapshot, window, store_id, &self.config)
        }))
    }

    pub fn build_month_over_month_report(
        &self,
        month: MonthYear,
        store_id: Option<Uuid>,
    ) -> Result<MomReport> {
        let snapshot = self.snapshot()?;
        Ok(self.cached(ReportKey::MonthOverMonth { month, store_id }, || {
            ComparisonService::build_month_over_month(&snapshot, month, store_id, &self.config)
        }))
    }

    pub fn build_store_rankings(&self) -> Result<Vec<StoreRanking>> {
        let snapshot = self.snapshot()?;
        Ok(self.cached(ReportKey::Rankings, || {
            RankingService::build_rankings(&snapshot)
        }))
    }

    pub fn compute_goal_progress(&self, goal: &StoreGoal) -> Result<GoalProgress> {
        let snapshot = self.snapshot()?;
        let key = ReportKey::Goal {
            goal_id: goal.id,
            store_id: goal.store_id,
            month: goal.month,
            year: goal.year,
            target_revenue: goal.target_revenue,
        };
        Ok(self.cached(key, || {
            GoalService::compute_progress(goal, &snapshot.closings)
        }))
    }

    /// Progress for every goal in the snapshot set for `month`.
    pub fn goal_progress_for_month(&self, month: MonthYear) -> Result<Vec<GoalProgress>> {
        let snapshot = self.snapshot()?;
        Ok(GoalService::progress_for_month(&snapshot, month))
    }

    fn cached<T, F>(&self, key: ReportKey, build: F) -> T
    where
        T: CacheableReport,
        F: FnOnce() -> T,
    {
        if !self.config.cache_reports {
            return build();
        }
        self.lock_cache().get_or_insert_with(self.version, key, build)
    }

    fn lock_cache(&self) -> MutexGuard<'_, ReportCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
