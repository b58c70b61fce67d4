mod generator;
mod store;
mod ticketing;

pub use generator::{GenerationRequest, StructuredGenerator};
pub use store::{KeyValueStore, ScanPage};
pub use ticketing::TicketingPlatform;
