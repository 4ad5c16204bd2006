use log::warn;

const DEFAULT_DATABASE_PATH: &str = "allshooters.db";

#[derive(Debug, Clone)]
pub struct ClassificationSettings {
    /// Scores above this count as B-level.
    pub b_threshold: f64,
    /// Scores above this count as A-level.
    pub a_threshold: f64,
    /// Eligibility gate and promotion window size.
    pub window: usize,
    /// Classify shooters without an active membership number too.
    pub include_inactive: bool,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            b_threshold: 67.0,
            a_threshold: 87.0,
            window: 3,
            include_inactive: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TotalsSettings {
    pub top_venues: usize,
}

impl Default for TotalsSettings {
    fn default() -> Self {
        Self { top_venues: 3 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    /// Bearer token for admin endpoints; admin is disabled when unset.
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub classification: ClassificationSettings,
    pub totals: TotalsSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            classification: ClassificationSettings::default(),
            totals: TotalsSettings::default(),
            server: ServerSettings::default(),
        }
    }

    /// Defaults overridden by `DATABASE_PATH`, `WYCO_INCLUDE_INACTIVE`
    /// and `ADMIN_TOKEN`.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = path;
        }

        if let Ok(value) = std::env::var("WYCO_INCLUDE_INACTIVE") {
            match parse_flag(&value) {
                Some(flag) => config.classification.include_inactive = flag,
                None => warn!("Ignoring WYCO_INCLUDE_INACTIVE={}, expected true or false", value),
            }
        }

        config.server.admin_token = std::env::var("ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
