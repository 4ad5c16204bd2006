use anyhow::{Context, Result};
use log::warn;
use rusqlite::{params, types::Value, Connection};

use super::models::{MatchResultRow, NewScore, Score, ScoreHistoryRow};
use crate::classification::{Classification, RawScore, OVERALL_STAGE};
use crate::domain::numbers::stored_numeric;

pub fn upsert_score(
    conn: &Connection,
    match_id: i64,
    shooter_id: i64,
    score: &NewScore,
) -> Result<Score> {
    let sql = "INSERT INTO scores (match_id, shooter_id, stage_name, place, percentage, points)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)
               ON CONFLICT (match_id, shooter_id, stage_name)
               DO UPDATE SET place = excluded.place, percentage = excluded.percentage, points = excluded.points
               RETURNING score_id, match_id, shooter_id, stage_name, place, percentage, points, wyco_points";

    conn.query_row(
        sql,
        params![
            match_id,
            shooter_id,
            score.stage_name,
            score.place,
            score.percentage,
            score.points
        ],
        parse_score_row,
    )
    .context("Failed to upsert score")
}

fn parse_score_row(row: &rusqlite::Row) -> rusqlite::Result<Score> {
    Ok(Score {
        id: row.get(0)?,
        match_id: row.get(1)?,
        shooter_id: row.get(2)?,
        stage_name: row.get(3)?,
        place: row.get(4)?,
        percentage: row.get(5)?,
        points: row.get(6)?,
        wyco_points: row.get(7)?,
    })
}

pub fn stage_exists(conn: &Connection, match_id: i64, stage_name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM scores WHERE match_id = ?1 AND stage_name = ?2)",
        params![match_id, stage_name],
        |row| row.get(0),
    )
    .context("Failed to check for existing stage")
}

/// Raw Overall points of a match. Rows whose points are not numeric are
/// left out and logged.
pub fn list_overall_points(conn: &Connection, match_id: i64) -> Result<Vec<RawScore>> {
    let mut stmt = conn.prepare(
        "SELECT score_id, shooter_id, points FROM scores WHERE match_id = ?1 AND stage_name = ?2",
    )?;
    let rows = stmt
        .query_map(params![match_id, OVERALL_STAGE], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, Value>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let scores = rows
        .into_iter()
        .filter_map(|(score_id, shooter_id, points)| match stored_numeric("points", points) {
            Ok(points) => Some(RawScore {
                score_id,
                shooter_id,
                points,
            }),
            Err(e) => {
                warn!("Skipping score {} in match {}: {}", score_id, match_id, e);
                None
            }
        })
        .collect();

    Ok(scores)
}

pub fn clear_match_wyco_points(conn: &Connection, match_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE scores SET wyco_points = NULL WHERE match_id = ?1 AND stage_name = ?2",
        params![match_id, OVERALL_STAGE],
    )
    .context("Failed to clear match WYCO points")?;
    Ok(())
}

pub fn set_wyco_points(conn: &Connection, score_id: i64, wyco_points: f64) -> Result<()> {
    conn.execute(
        "UPDATE scores SET wyco_points = ?1 WHERE score_id = ?2",
        params![wyco_points, score_id],
    )
    .context("Failed to update score WYCO points")?;
    Ok(())
}

/// A shooter's Overall WYCO points in match-date order, oldest first.
/// Unreadable values come back as `None`.
pub fn overall_history(conn: &Connection, shooter_id: i64) -> Result<Vec<Option<f64>>> {
    let mut stmt = conn.prepare(
        "SELECT s.score_id, s.wyco_points
         FROM scores s
         JOIN matches m ON s.match_id = m.match_id
         WHERE s.shooter_id = ?1 AND s.stage_name = ?2
         ORDER BY m.match_date ASC, m.match_id ASC",
    )?;
    let rows = stmt
        .query_map(params![shooter_id, OVERALL_STAGE], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Value>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let history = rows
        .into_iter()
        .map(|(score_id, value)| {
            stored_numeric("wyco_points", value).unwrap_or_else(|e| {
                warn!("Ignoring score {} for shooter {}: {}", score_id, shooter_id, e);
                None
            })
        })
        .collect();

    Ok(history)
}

/// Best Overall WYCO points per venue for a shooter.
pub fn best_per_venue(conn: &Connection, shooter_id: i64) -> Result<Vec<f64>> {
    let mut stmt = conn.prepare(
        "SELECT m.venue_id, MAX(s.wyco_points)
         FROM scores s
         JOIN matches m ON s.match_id = m.match_id
         WHERE s.shooter_id = ?1
           AND s.stage_name = ?2
           AND s.wyco_points IS NOT NULL
           AND m.venue_id IS NOT NULL
         GROUP BY m.venue_id",
    )?;
    let rows = stmt
        .query_map(params![shooter_id, OVERALL_STAGE], |row| row.get::<_, Value>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .filter_map(|v| stored_numeric("wyco_points", v).ok().flatten())
        .collect())
}

pub fn history_rows(conn: &Connection, shooter_id: i64) -> Result<Vec<ScoreHistoryRow>> {
    let mut stmt = conn.prepare(
        "SELECT m.match_id, m.match_name, m.match_date, m.venue_id, s.place, s.points, s.wyco_points
         FROM scores s
         JOIN matches m ON s.match_id = m.match_id
         WHERE s.shooter_id = ?1 AND s.stage_name = ?2
         ORDER BY m.match_date ASC, m.match_id ASC",
    )?;
    let rows = stmt
        .query_map(params![shooter_id, OVERALL_STAGE], |row| {
            Ok(ScoreHistoryRow {
                match_id: row.get(0)?,
                match_name: row.get(1)?,
                match_date: row.get(2)?,
                venue_id: row.get(3)?,
                place: row.get(4)?,
                points: stored_numeric("points", row.get(5)?).ok().flatten(),
                wyco_points: stored_numeric("wyco_points", row.get(6)?).ok().flatten(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn match_results(conn: &Connection, match_id: i64) -> Result<Vec<MatchResultRow>> {
    let mut stmt = conn.prepare(
        "SELECT sh.shooter_id, sh.name, sh.classification, s.place, s.percentage, s.points, s.wyco_points
         FROM scores s
         JOIN shooters sh ON s.shooter_id = sh.shooter_id
         WHERE s.match_id = ?1 AND s.stage_name = ?2
         ORDER BY s.place IS NULL, s.place ASC, sh.name ASC",
    )?;
    let rows = stmt
        .query_map(params![match_id, OVERALL_STAGE], |row| {
            let classification: Option<String> = row.get(2)?;
            Ok(MatchResultRow {
                shooter_id: row.get(0)?,
                shooter_name: row.get(1)?,
                classification: Classification::from_stored(classification.as_deref()),
                place: row.get(3)?,
                percentage: stored_numeric("percentage", row.get(4)?).ok().flatten(),
                points: stored_numeric("points", row.get(5)?).ok().flatten(),
                wyco_points: stored_numeric("wyco_points", row.get(6)?).ok().flatten(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Moves every score of `from` onto `into`. A score that would collide with
/// one `into` already has for the same match and stage is dropped.
/// Returns the number of scores moved.
pub fn reparent(conn: &Connection, from: i64, into: i64) -> Result<usize> {
    let moved = conn
        .execute(
            "UPDATE OR IGNORE scores SET shooter_id = ?1 WHERE shooter_id = ?2",
            params![into, from],
        )
        .context("Failed to move scores between shooters")?;

    let dropped = conn
        .execute("DELETE FROM scores WHERE shooter_id = ?1", params![from])
        .context("Failed to drop colliding scores")?;
    if dropped > 0 {
        warn!(
            "Dropped {} score(s) of shooter {} already present on shooter {}",
            dropped, from, into
        );
    }

    Ok(moved)
}
