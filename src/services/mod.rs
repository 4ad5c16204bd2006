pub mod hygiene;
pub mod ingestion;
pub mod membership;
pub mod processing;
pub mod server;
