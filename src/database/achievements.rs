use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use rusqlite::{params, types::Value, Connection};

use super::models::AchievementRow;
use crate::classification::{Achievement, Award, OverallResult, OVERALL_STAGE};
use crate::domain::numbers::stored_numeric;

/// Every Overall result with its match date, for the award rules.
pub fn list_overall_results(conn: &Connection) -> Result<Vec<OverallResult>> {
    let mut stmt = conn.prepare(
        "SELECT s.shooter_id, s.match_id, m.match_date, s.place, s.percentage
         FROM scores s
         JOIN matches m ON s.match_id = m.match_id
         WHERE s.stage_name = ?1
         ORDER BY m.match_date ASC, m.match_id ASC",
    )?;
    let rows = stmt
        .query_map(params![OVERALL_STAGE], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, NaiveDate>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Value>(4)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let results = rows
        .into_iter()
        .map(|(shooter_id, match_id, match_date, place, percentage)| OverallResult {
            shooter_id,
            match_id,
            match_date,
            place,
            percentage: stored_numeric("percentage", percentage).unwrap_or_else(|e| {
                warn!("Ignoring percentage of shooter {} in match {}: {}", shooter_id, match_id, e);
                None
            }),
        })
        .collect();

    Ok(results)
}

/// Stores a badge once. Returns `true` when it was not held before.
pub fn insert_if_absent(conn: &Connection, award: &Award) -> Result<bool> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO achievements (shooter_id, match_id, achievement) VALUES (?1, ?2, ?3)",
            params![award.shooter_id, award.match_id, award.achievement.as_str()],
        )
        .context("Failed to store achievement")?;
    Ok(inserted > 0)
}

/// A shooter's badges, newest match first.
pub fn list_for_shooter(conn: &Connection, shooter_id: i64) -> Result<Vec<AchievementRow>> {
    let mut stmt = conn.prepare(
        "SELECT a.achievement, m.match_id, m.match_name, m.match_date
         FROM achievements a
         JOIN matches m ON a.match_id = m.match_id
         WHERE a.shooter_id = ?1
         ORDER BY m.match_date DESC, m.match_id DESC, a.achievement ASC",
    )?;
    let rows = stmt
        .query_map(params![shooter_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, NaiveDate>(3)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .filter_map(|(label, match_id, match_name, match_date)| {
            let Some(achievement) = Achievement::from_stored(&label) else {
                warn!("Unknown achievement '{}' for shooter {}", label, shooter_id);
                return None;
            };
            Some(AchievementRow {
                achievement,
                match_id,
                match_name,
                match_date,
            })
        })
        .collect())
}
