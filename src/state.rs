use crate::attendance::{AttendanceGateway, StatisticsAggregator};
use crate::config::Config;
use crate::roster::RosterSource;
use crate::store::AttendanceStore;
use crate::utils::clock::Clock;
use crate::utils::stats_cache::StatsCache;
use actix_web::web::{self, Data};
use std::sync::Arc;

/// Shared components handed to every worker. Built once per process.
#[derive(Clone)]
pub struct AppState {
    pub config: Data<Config>,
    pub store: Data<dyn AttendanceStore>,
    pub roster: Data<dyn RosterSource>,
    pub gateway: Data<AttendanceGateway>,
    pub aggregator: Data<StatisticsAggregator>,
    pub cache: Data<StatsCache>,
}

impl AppState {
    pub fn build(
        config: Config,
        store: Arc<dyn AttendanceStore>,
        roster: Arc<dyn RosterSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gateway = AttendanceGateway::new(
            store.clone(),
            roster.clone(),
            clock.clone(),
            config.store_timeout,
        );
        let aggregator = StatisticsAggregator::new(store.clone(), clock, config.store_timeout);

        let cache = Arc::new(StatsCache::new(
            config.stats_cache_capacity,
            config.stats_cache_ttl,
        ));
        gateway.subscribe(cache.clone());

        Self {
            config: Data::new(config),
            store: Data::from(store),
            roster: Data::from(roster),
            gateway: Data::new(gateway),
            aggregator: Data::new(aggregator),
            cache: Data::from(cache),
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.store.clone())
            .app_data(self.roster.clone())
            .app_data(self.gateway.clone())
            .app_data(self.aggregator.clone())
            .app_data(self.cache.clone());
    }
}
