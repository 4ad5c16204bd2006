use super::normalization::round_points;

/// Sums a shooter's best `top_venues` per-venue results.
pub fn season_total(best_per_venue: &[f64], top_venues: usize) -> f64 {
    let mut scores: Vec<f64> = best_per_venue
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .collect();
    scores.sort_by(|a, b| b.total_cmp(a));

    round_points(scores.iter().take(top_venues).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_top_three_venues() {
        assert_eq!(season_total(&[90.0, 100.0, 45.5, 80.25], 3), 270.25);
    }

    #[test]
    fn test_fewer_venues_than_limit() {
        assert_eq!(season_total(&[62.5], 3), 62.5);
        assert_eq!(season_total(&[], 3), 0.0);
    }
}
