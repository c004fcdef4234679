//! Memoized report results keyed on the snapshot version.

use std::collections::{HashMap, VecDeque};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::domain::{
    goal::GoalProgress,
    report::{DateWindow, DreData, MomReport, MonthYear, StoreRanking},
};

/// Identifies one query against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportKey {
    Dre {
        window: DateWindow,
        store_id: Option<Uuid>,
    },
    MonthOverMonth {
        month: MonthYear,
        store_id: Option<Uuid>,
    },
    Rankings,
    Goal {
        goal_id: Uuid,
        store_id: Uuid,
        month: u32,
        year: i32,
        target_revenue: Decimal,
    },
}

#[derive(Debug, Clone)]
pub enum CachedReport {
    Dre(DreData),
    MonthOverMonth(MomReport),
    Rankings(Vec<StoreRanking>),
    Goal(GoalProgress),
}

/// Conversion between a report value and its cache slot.
pub trait CacheableReport: Clone {
    fn into_cached(self) -> CachedReport;
    fn from_cached(cached: &CachedReport) -> Option<Self>;
}

impl CacheableReport for DreData {
    fn into_cached(self) -> CachedReport {
        CachedReport::Dre(self)
    }

    fn from_cached(cached: &CachedReport) -> Option<Self> {
        match cached {
            CachedReport::Dre(report) => Some(report.clone()),
            _ => None,
        }
    }
}

impl CacheableReport for MomReport {
    fn into_cached(self) -> CachedReport {
        CachedReport::MonthOverMonth(self)
    }

    fn from_cached(cached: &CachedReport) -> Option<Self> {
        match cached {
            CachedReport::MonthOverMonth(report) => Some(report.clone()),
            _ => None,
        }
    }
}

impl CacheableReport for Vec<StoreRanking> {
    fn into_cached(self) -> CachedReport {
        CachedReport::Rankings(self)
    }

    fn from_cached(cached: &CachedReport) -> Option<Self> {
        match cached {
            CachedReport::Rankings(rankings) => Some(rankings.clone()),
            _ => None,
        }
    }
}

impl CacheableReport for GoalProgress {
    fn into_cached(self) -> CachedReport {
        CachedReport::Goal(self)
    }

    fn from_cached(cached: &CachedReport) -> Option<Self> {
        match cached {
            CachedReport::Goal(progress) => Some(progress.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub version: u64,
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Report results for a single snapshot version.
///
/// Entries from an older version are dropped the first time a newer version
/// is seen, so a refreshed snapshot never serves stale reports. At most
/// `capacity` entries are kept; the least recently used one goes first.
#[derive(Debug)]
pub struct ReportCache {
    version: u64,
    capacity: usize,
    entries: HashMap<ReportKey, CachedReport>,
    /// Keys from least to most recently used.
    recency: VecDeque<ReportKey>,
    hits: u64,
    misses: u64,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            version: 0,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinks or grows the limit, evicting the oldest entries if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    pub fn get_or_insert_with<T, F>(&mut self, version: u64, key: ReportKey, build: F) -> T
    where
        T: CacheableReport,
        F: FnOnce() -> T,
    {
        self.sync_version(version);
        if let Some(report) = self.entries.get(&key).and_then(T::from_cached) {
            self.hits += 1;
            tracing::trace!(?key, version, "report cache hit");
            self.touch(&key);
            return report;
        }
        self.misses += 1;
        tracing::trace!(?key, version, "report cache miss");
        let report = build();
        if self.entries.contains_key(&key) {
            self.touch(&key);
        } else {
            while self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
            self.recency.push_back(key.clone());
        }
        self.entries.insert(key, report.clone().into_cached());
        report
    }

    /// Drops every entry and moves the cache to `version`.
    pub fn invalidate(&mut self, version: u64) {
        self.entries.clear();
        self.recency.clear();
        self.version = version;
    }

    pub fn contains(&self, key: &ReportKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            version: self.version,
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
        }
    }

    fn sync_version(&mut self, version: u64) {
        if self.version != version {
            tracing::trace!(from = self.version, to = version, "report cache reset");
            self.invalidate(version);
        }
    }

    fn touch(&mut self, key: &ReportKey) {
        if let Some(position) = self.recency.iter().position(|queued| queued == key) {
            if let Some(key) = self.recency.remove(position) {
                self.recency.push_back(key);
            }
        }
    }

    fn evict_oldest(&mut self) {
        match self.recency.pop_front() {
            Some(key) => {
                tracing::trace!(?key, "report cache eviction");
                self.entries.remove(&key);
            }
            None => self.entries.clear(),
        }
    }
}
