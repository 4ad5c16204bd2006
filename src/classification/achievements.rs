use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::fmt;

use super::types::{MatchId, ShooterId};

/// Finishing below this percentage of the winner earns the consolation badge.
const TRIED_BELOW_PERCENTAGE: f64 = 20.0;
/// Overall results within one calendar month needed for the attendance badge.
const MONTHLY_MATCHES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Achievement {
    TopGun,
    WellYouTried,
    Threesome,
}

impl Achievement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::TopGun => "Top Gun",
            Achievement::WellYouTried => "Well, you tried...",
            Achievement::Threesome => "Threesome",
        }
    }

    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "Top Gun" => Some(Achievement::TopGun),
            "Well, you tried..." => Some(Achievement::WellYouTried),
            "Threesome" => Some(Achievement::Threesome),
            _ => None,
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Overall result as the award rules see it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallResult {
    pub shooter_id: ShooterId,
    pub match_id: MatchId,
    pub match_date: NaiveDate,
    pub place: Option<i64>,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Award {
    pub shooter_id: ShooterId,
    pub match_id: MatchId,
    pub achievement: Achievement,
}

/// Every badge the results earn, sorted and without duplicates.
pub fn award_achievements(results: &[OverallResult]) -> Vec<Award> {
    let mut awards = Vec::new();

    for result in results {
        if result.place == Some(1) {
            awards.push(award(result, Achievement::TopGun));
        }
        if result
            .percentage
            .is_some_and(|p| p > 0.0 && p < TRIED_BELOW_PERCENTAGE)
        {
            awards.push(award(result, Achievement::WellYouTried));
        }
    }

    let mut by_month: HashMap<(ShooterId, i32, u32), Vec<&OverallResult>> = HashMap::new();
    for result in results {
        let key = (result.shooter_id, result.match_date.year(), result.match_date.month());
        by_month.entry(key).or_default().push(result);
    }
    for month in by_month.values().filter(|m| m.len() >= MONTHLY_MATCHES) {
        awards.extend(month.iter().map(|r| award(r, Achievement::Threesome)));
    }

    awards.sort();
    awards.dedup();
    awards
}

fn award(result: &OverallResult, achievement: Achievement) -> Award {
    Award {
        shooter_id: result.shooter_id,
        match_id: result.match_id,
        achievement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(shooter_id: i64, match_id: i64, date: &str, place: Option<i64>, percentage: f64) -> OverallResult {
        OverallResult {
            shooter_id,
            match_id,
            match_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            place,
            percentage: Some(percentage),
        }
    }

    fn badges(awards: &[Award], achievement: Achievement) -> Vec<(i64, i64)> {
        awards
            .iter()
            .filter(|a| a.achievement == achievement)
            .map(|a| (a.shooter_id, a.match_id))
            .collect()
    }

    #[test]
    fn test_top_gun_for_match_winner_only() {
        let awards = award_achievements(&[
            result(1, 10, "2025-05-03", Some(1), 100.0),
            result(2, 10, "2025-05-03", Some(2), 91.0),
            result(3, 10, "2025-05-03", None, 88.0),
        ]);

        assert_eq!(badges(&awards, Achievement::TopGun), vec![(1, 10)]);
    }

    #[test]
    fn test_well_you_tried_between_zero_and_twenty() {
        let mut zeroed = result(4, 10, "2025-05-03", Some(9), 0.0);
        zeroed.percentage = None;
        let awards = award_achievements(&[
            result(1, 10, "2025-05-03", Some(5), 19.99),
            result(2, 10, "2025-05-03", Some(6), 20.0),
            result(3, 10, "2025-05-03", Some(7), 0.0),
            zeroed,
        ]);

        assert_eq!(badges(&awards, Achievement::WellYouTried), vec![(1, 10)]);
    }

    #[test]
    fn test_threesome_needs_three_matches_in_one_month() {
        let awards = award_achievements(&[
            result(1, 10, "2025-05-03", Some(2), 80.0),
            result(1, 11, "2025-05-17", Some(2), 80.0),
            result(1, 12, "2025-05-31", Some(2), 80.0),
            result(1, 13, "2025-06-01", Some(2), 80.0),
            // same month number, different year
            result(2, 10, "2025-05-03", Some(3), 70.0),
            result(2, 11, "2025-05-17", Some(3), 70.0),
            result(2, 20, "2024-05-11", Some(3), 70.0),
        ]);

        assert_eq!(
            badges(&awards, Achievement::Threesome),
            vec![(1, 10), (1, 11), (1, 12)]
        );
    }

    #[test]
    fn test_stored_labels_round_trip() {
        for achievement in [Achievement::TopGun, Achievement::WellYouTried, Achievement::Threesome] {
            assert_eq!(Achievement::from_stored(achievement.as_str()), Some(achievement));
        }
        assert_eq!(Achievement::from_stored("Sharpshooter"), None);
    }
}
