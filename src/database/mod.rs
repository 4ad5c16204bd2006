pub mod achievements;
pub mod connection;
pub mod matches;
pub mod models;
pub mod scores;
pub mod setup;
pub mod shooters;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
