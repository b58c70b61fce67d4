//! Application services and ports.

#![forbid(unsafe_code)]

mod analytics_service;
mod cache_gateway;
mod insight_ports;
mod insight_service;

#[cfg(test)]
mod test_support;

pub use analytics_service::{AnalyticsService, FlaggedEvaluations};
pub use cache_gateway::{CacheGateway, RecordNamespace};
pub use insight_ports::{
    GenerationRequest, KeyValueStore, ScanPage, StructuredGenerator, TicketingPlatform,
};
pub use insight_service::{InsightService, InsightSettings};
