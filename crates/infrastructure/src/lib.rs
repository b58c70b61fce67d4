//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod gemini_structured_generator;
mod in_memory_key_value_store;
mod redis_key_value_store;
mod zendesk_ticketing_client;

pub use gemini_structured_generator::GeminiStructuredGenerator;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
pub use redis_key_value_store::RedisKeyValueStore;
pub use zendesk_ticketing_client::ZendeskTicketingClient;
