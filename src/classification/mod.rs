pub mod achievements;
pub mod classifier;
pub mod normalization;
pub mod totals;
pub mod types;

pub use achievements::{award_achievements, Achievement, Award, OverallResult};
pub use classifier::{eligible_sequence, reconcile, target_class};
pub use normalization::{normalize_match, round_points, MatchNormalization};
pub use totals::season_total;
pub use types::{ClassOutcome, Classification, MatchId, RawScore, ScoreId, ShooterId, OVERALL_STAGE};
