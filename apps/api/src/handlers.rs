pub mod analytics;
pub mod cache;
pub mod health;
pub mod insights;
