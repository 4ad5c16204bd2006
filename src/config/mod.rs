pub mod settings;
pub mod venues;

pub use settings::AppConfig;
pub use venues::{get_venues, VenueConfig};
