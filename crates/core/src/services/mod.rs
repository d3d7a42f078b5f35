pub mod alignment_service;
pub mod holdings_service;
pub mod snapshot_service;
