pub mod analyze;
pub mod health;
pub mod index;
pub mod metrics;
