pub mod models;
pub mod names;
pub mod numbers;
mod progress;

pub use models::*;
pub use names::{member_name, normalize_name};
pub use numbers::RecordError;
pub use progress::PassProgress;
