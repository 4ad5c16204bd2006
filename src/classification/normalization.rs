use super::types::{RawScore, ScoreId};

const DECIMAL_PLACES: i32 = 2;

/// Result of normalizing one match.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchNormalization {
    /// Top score was zero or missing; no score in the match gets a value.
    Skipped,
    Scored(Vec<(ScoreId, f64)>),
}

pub fn round_points(value: f64) -> f64 {
    let factor = 10f64.powi(DECIMAL_PLACES);
    (value * factor).round() / factor
}

/// Expresses every Overall score of a match as a percentage of the best one.
pub fn normalize_match(scores: &[RawScore]) -> MatchNormalization {
    let Some(max_points) = max_points(scores) else {
        return MatchNormalization::Skipped;
    };

    let normalized = scores
        .iter()
        .map(|score| (score.score_id, wyco_points(score.points, max_points)))
        .collect();

    MatchNormalization::Scored(normalized)
}

fn max_points(scores: &[RawScore]) -> Option<f64> {
    scores
        .iter()
        .filter_map(|s| s.points)
        .filter(|p| p.is_finite())
        .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |m| m.max(p))))
        .filter(|&max| max > 0.0)
}

fn wyco_points(points: Option<f64>, max_points: f64) -> f64 {
    match points {
        Some(p) if p > 0.0 && p.is_finite() => round_points(p / max_points * 100.0),
        _ => 0.0,
    }
}
