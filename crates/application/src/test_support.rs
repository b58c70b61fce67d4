use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use ticketsense_core::{AppError, AppResult, TicketId};
use ticketsense_domain::{AuditLog, TicketSnapshot};

use crate::insight_ports::{
    GenerationRequest, KeyValueStore, ScanPage, StructuredGenerator, TicketingPlatform,
};

pub(crate) fn ticket_id(value: &str) -> TicketId {
    match TicketId::new(value) {
        Ok(ticket_id) => ticket_id,
        Err(error) => panic!("invalid test ticket id: {error}"),
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Ordered in-memory store with configurable scan page size.
pub(crate) struct MemoryStore {
    entries: Mutex<BTreeMap<String, (String, Option<u64>)>>,
    page_size: Option<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            page_size: None,
        }
    }
}

impl MemoryStore {
    pub(crate) fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub(crate) fn insert_raw(&self, key: &str, value: &str) {
        locked(&self.entries).insert(key.to_owned(), (value.to_owned(), None));
    }

    pub(crate) fn ttl_of(&self, key: &str) -> Option<Option<u64>> {
        locked(&self.entries).get(key).map(|(_, ttl)| *ttl)
    }

    pub(crate) fn len(&self) -> usize {
        locked(&self.entries).len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(locked(&self.entries).get(key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> AppResult<()> {
        locked(&self.entries).insert(key.to_owned(), (value.to_owned(), ttl_seconds));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(locked(&self.entries).remove(key).is_some())
    }

    async fn scan_prefix(
        &self,
        prefix: &str,
        cursor: u64,
        batch_size: usize,
    ) -> AppResult<ScanPage> {
        let page_size = self.page_size.unwrap_or(batch_size).max(1);
        let offset = usize::try_from(cursor).unwrap_or(usize::MAX);
        let matching: Vec<(String, String)> = locked(&self.entries)
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, (value, _))| (key.clone(), value.clone()))
            .collect();

        let entries: Vec<(String, String)> =
            matching.iter().skip(offset).take(page_size).cloned().collect();
        let next_offset = offset.saturating_add(entries.len());
        let next_cursor = if next_offset >= matching.len() {
            0
        } else {
            u64::try_from(next_offset).unwrap_or(0)
        };

        Ok(ScanPage {
            entries,
            next_cursor,
        })
    }
}

/// Store whose every operation fails.
pub(crate) struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::Unavailable("connection refused".to_owned()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: Option<u64>) -> AppResult<()> {
        Err(AppError::Unavailable("connection refused".to_owned()))
    }

    async fn delete(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::Unavailable("connection refused".to_owned()))
    }

    async fn scan_prefix(
        &self,
        _prefix: &str,
        _cursor: u64,
        _batch_size: usize,
    ) -> AppResult<ScanPage> {
        Err(AppError::Unavailable("connection refused".to_owned()))
    }
}

/// Scripted helpdesk returning fixed payloads and counting calls.
#[derive(Default)]
pub(crate) struct FakeTicketing {
    pub(crate) ticket: Mutex<Option<TicketSnapshot>>,
    pub(crate) audits: Mutex<Option<Value>>,
    pub(crate) ticket_calls: AtomicUsize,
    pub(crate) audit_calls: AtomicUsize,
}

impl FakeTicketing {
    pub(crate) fn with(ticket: TicketSnapshot, audits: Value) -> Self {
        Self {
            ticket: Mutex::new(Some(ticket)),
            audits: Mutex::new(Some(audits)),
            ..Self::default()
        }
    }

    pub(crate) fn go_offline(&self) {
        *locked(&self.ticket) = None;
        *locked(&self.audits) = None;
    }

    pub(crate) fn fail_audits(&self) {
        *locked(&self.audits) = None;
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.ticket_calls.load(Ordering::SeqCst) + self.audit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketingPlatform for FakeTicketing {
    async fn fetch_ticket(&self, ticket_id: &TicketId) -> AppResult<TicketSnapshot> {
        self.ticket_calls.fetch_add(1, Ordering::SeqCst);
        if ticket_id.as_str() == "404" {
            return Err(AppError::NotFound(format!("ticket '{ticket_id}' does not exist")));
        }

        locked(&self.ticket)
            .clone()
            .ok_or_else(|| AppError::Upstream("helpdesk timed out".to_owned()))
    }

    async fn fetch_audit_log(&self, _ticket_id: &TicketId) -> AppResult<AuditLog> {
        self.audit_calls.fetch_add(1, Ordering::SeqCst);
        locked(&self.audits)
            .as_ref()
            .map(AuditLog::from_json)
            .ok_or_else(|| AppError::Upstream("helpdesk timed out".to_owned()))
    }
}

/// Generator replaying one scripted outcome and recording requests.
pub(crate) struct FakeGenerator {
    response: Mutex<Option<Value>>,
    pub(crate) requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    pub(crate) fn replying(response: Value) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            response: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        locked(&self.requests).len()
    }

    pub(crate) fn last_instruction(&self) -> Option<String> {
        locked(&self.requests)
            .last()
            .map(|request| request.instruction.clone())
    }
}

#[async_trait]
impl StructuredGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest) -> AppResult<Value> {
        locked(&self.requests).push(request);
        locked(&self.response)
            .clone()
            .ok_or_else(|| AppError::Upstream("generator deadline exceeded".to_owned()))
    }
}
