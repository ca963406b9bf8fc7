use crate::attendance::AttendanceObserver;
use crate::error::AttendanceResult;
use crate::model::attendance::AttendanceRecord;
use crate::model::statistics::{DashboardSummary, EmployeeHistory, StatisticsSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Date plus the fingerprint of the roster the value was computed against.
pub type RosterDateKey = (NaiveDate, u64);

/// A cached value and the mark generation observed before computing it.
#[derive(Clone)]
struct Stamped<V> {
    generation: u64,
    value: V,
}

/// Read-side cache for the HTTP layer. Subscribed to the gateway: every mark
/// bumps the generation and entries stamped earlier are never served again.
/// Roster-dependent values carry the roster fingerprint in their key.
pub struct StatsCache {
    daily: Cache<RosterDateKey, Stamped<StatisticsSnapshot>>,
    dashboards: Cache<RosterDateKey, Stamped<DashboardSummary>>,
    histories: Cache<String, Stamped<EmployeeHistory>>,
    generation: AtomicU64,
}

impl StatsCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            daily: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            dashboards: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            histories: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn daily<F>(&self, key: RosterDateKey, compute: F) -> AttendanceResult<StatisticsSnapshot>
    where
        F: Future<Output = AttendanceResult<StatisticsSnapshot>>,
    {
        self.get_or_compute(&self.daily, key, compute).await
    }

    pub async fn dashboard<F>(&self, key: RosterDateKey, compute: F) -> AttendanceResult<DashboardSummary>
    where
        F: Future<Output = AttendanceResult<DashboardSummary>>,
    {
        self.get_or_compute(&self.dashboards, key, compute).await
    }

    pub async fn history<F>(&self, employee_id: &str, compute: F) -> AttendanceResult<EmployeeHistory>
    where
        F: Future<Output = AttendanceResult<EmployeeHistory>>,
    {
        self.get_or_compute(&self.histories, employee_id.to_string(), compute)
            .await
    }

    async fn get_or_compute<K, V, F>(
        &self,
        cache: &Cache<K, Stamped<V>>,
        key: K,
        compute: F,
    ) -> AttendanceResult<V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        F: Future<Output = AttendanceResult<V>>,
    {
        let generation = self.generation.load(Ordering::Acquire);
        if let Some(hit) = cache.get(&key).await {
            if hit.generation >= generation {
                return Ok(hit.value);
            }
        }

        let value = compute.await?;
        // A mark landing after this point leaves the stamp behind the
        // generation, so the entry reads as a miss from then on.
        if self.generation.load(Ordering::Acquire) == generation {
            cache
                .insert(
                    key,
                    Stamped {
                        generation,
                        value: value.clone(),
                    },
                )
                .await;
        }
        Ok(value)
    }
}

#[async_trait]
impl AttendanceObserver for StatsCache {
    async fn attendance_marked(&self, record: &AttendanceRecord) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        // Everything stamped earlier is unreachable now; release the space.
        self.daily.invalidate_all();
        self.dashboards.invalidate_all();
        self.histories.invalidate_all();

        tracing::debug!(
            employee_id = %record.employee_id,
            date = %record.date,
            "Statistics cache invalidated"
        );
    }
}
