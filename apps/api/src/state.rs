use std::sync::Arc;

use ticketsense_application::{AnalyticsService, InsightService};
use ticketsense_core::BasicCredentials;

use crate::origin_policy::OriginPolicy;

/// Backing store reported by the health endpoint.
#[derive(Clone)]
pub enum CacheProbe {
    Disabled,
    Memory,
    Redis(redis::Client),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub insight_service: InsightService,
    pub analytics_service: AnalyticsService,
    pub credentials: Arc<BasicCredentials>,
    pub origin_policy: OriginPolicy,
    pub cache_probe: CacheProbe,
}
