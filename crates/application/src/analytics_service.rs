//! Read-only analytics over cached evaluations.

use ticketsense_domain::{EvaluationRecord, RecordStatus};
use tracing::warn;

use crate::cache_gateway::{CacheGateway, RecordNamespace};

/// Outcome of a flagged-evaluation scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlaggedEvaluations {
    /// Flagged records in cache enumeration order.
    Available(Vec<EvaluationRecord>),
    /// The record cache is disabled or unreachable.
    CacheUnavailable,
}

/// Application service for evaluation analytics.
#[derive(Clone)]
pub struct AnalyticsService {
    cache: CacheGateway,
}

impl AnalyticsService {
    /// Creates the analytics service.
    #[must_use]
    pub fn new(cache: CacheGateway) -> Self {
        Self { cache }
    }

    /// Lists cached evaluations with errors or a score below the quality threshold.
    pub async fn list_flagged(&self) -> FlaggedEvaluations {
        let records = match self
            .cache
            .scan::<EvaluationRecord>(RecordNamespace::Evaluation)
            .await
        {
            Ok(records) => records,
            Err(error) => {
                warn!(error = %error, "flagged evaluation scan skipped");
                return FlaggedEvaluations::CacheUnavailable;
            }
        };

        FlaggedEvaluations::Available(
            records
                .into_iter()
                .filter(EvaluationRecord::is_flagged)
                .map(|mut record| {
                    record.status = RecordStatus::FromCache;
                    record
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use ticketsense_domain::{AgentIdentity, EvaluationRecord, RecordStatus};

    use super::{AnalyticsService, FlaggedEvaluations};
    use crate::cache_gateway::{CacheGateway, RecordNamespace};
    use crate::test_support::{FailingStore, MemoryStore, ticket_id};

    fn evaluation(id: &str, tov_score: u8, solution_score: u8, errors: &[&str]) -> EvaluationRecord {
        EvaluationRecord {
            tov_score,
            solution_score,
            errors: errors.iter().map(|error| (*error).to_owned()).collect(),
            language: "en".to_owned(),
            next_action: "Follow up".to_owned(),
            status: RecordStatus::GeneratedNew,
            ..EvaluationRecord::empty(ticket_id(id), AgentIdentity::default(), Utc::now())
        }
    }

    #[tokio::test]
    async fn lists_records_with_errors_or_low_scores() {
        let gateway = CacheGateway::new(Arc::new(MemoryStore::default()), "ts", None);
        for record in [
            evaluation("1", 5, 5, &[]),
            evaluation("2", 3, 5, &[]),
            evaluation("3", 5, 2, &["rude"]),
        ] {
            gateway
                .put(RecordNamespace::Evaluation, &record.ticket_id, &record)
                .await;
        }

        let FlaggedEvaluations::Available(flagged) =
            AnalyticsService::new(gateway).list_flagged().await
        else {
            panic!("expected available cache");
        };

        let ids: Vec<&str> = flagged.iter().map(|record| record.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert!(flagged.iter().all(|record| record.status == RecordStatus::FromCache));
    }

    #[tokio::test]
    async fn ignores_summaries_and_returns_empty_when_nothing_matches() {
        let gateway = CacheGateway::new(Arc::new(MemoryStore::default()), "ts", None);
        let record = evaluation("1", 5, 4, &[]);
        gateway
            .put(RecordNamespace::Evaluation, &record.ticket_id, &record)
            .await;
        gateway
            .put(RecordNamespace::Summary, &ticket_id("2"), &"not an evaluation")
            .await;

        let flagged = AnalyticsService::new(gateway).list_flagged().await;
        assert_eq!(flagged, FlaggedEvaluations::Available(Vec::new()));
    }

    #[tokio::test]
    async fn reports_unavailable_cache() {
        let disabled = AnalyticsService::new(CacheGateway::disabled("ts"));
        assert_eq!(disabled.list_flagged().await, FlaggedEvaluations::CacheUnavailable);

        let failing = AnalyticsService::new(CacheGateway::new(Arc::new(FailingStore), "ts", None));
        assert_eq!(failing.list_flagged().await, FlaggedEvaluations::CacheUnavailable);
    }
}
