use chrono::{NaiveDate, NaiveDateTime};

use crate::classification::{Achievement, Classification};

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub venue_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Shooter {
    pub id: i64,
    pub name: String,
    pub wyco_number: Option<String>,
    pub membership_active: Option<bool>,
    pub classification: Classification,
    pub wyco_points: f64,
}

impl Shooter {
    /// Active member with a membership number on file.
    pub fn is_numbered_member(&self) -> bool {
        self.membership_active == Some(true)
            && self
                .wyco_number
                .as_deref()
                .is_some_and(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Score {
    pub id: i64,
    pub match_id: i64,
    pub shooter_id: i64,
    pub stage_name: String,
    pub place: Option<i64>,
    pub percentage: Option<f64>,
    pub points: Option<f64>,
    pub wyco_points: Option<f64>,
}

// DTOs for joined queries
#[derive(Debug, Clone)]
pub struct ScoreHistoryRow {
    pub match_id: i64,
    pub match_name: String,
    pub match_date: NaiveDate,
    pub venue_id: Option<i64>,
    pub place: Option<i64>,
    pub points: Option<f64>,
    pub wyco_points: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MatchResultRow {
    pub shooter_id: i64,
    pub shooter_name: String,
    pub classification: Classification,
    pub place: Option<i64>,
    pub percentage: Option<f64>,
    pub points: Option<f64>,
    pub wyco_points: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ShooterFilter {
    pub name_contains: Option<String>,
    pub classification: Option<Classification>,
    pub members_only: bool,
    pub limit: usize,
    pub offset: usize,
}

/// Score row as it arrives from an imported result sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScore<'a> {
    pub stage_name: &'a str,
    pub place: Option<i64>,
    pub percentage: Option<f64>,
    pub points: Option<f64>,
}

/// A stored badge with the match it was earned at.
#[derive(Debug, Clone)]
pub struct AchievementRow {
    pub achievement: Achievement,
    pub match_id: i64,
    pub match_name: String,
    pub match_date: NaiveDate,
}
