//! Attendance state and aggregation: the write path, the per-date join and
//! the derived statistics.

pub mod aggregator;
pub mod gateway;
pub mod merger;

pub use aggregator::StatisticsAggregator;
pub use gateway::{AttendanceGateway, AttendanceObserver};
pub use merger::AttendanceMerger;
