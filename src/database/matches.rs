use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Match;

const MATCH_COLUMNS: &str = "match_id, match_name, match_date, venue_id, created_at";

/// Inserts a match unless one with the same name exists.
/// Returns the match and whether it was newly created.
pub fn insert_if_absent(
    conn: &Connection,
    name: &str,
    date: NaiveDate,
    venue_id: Option<i64>,
) -> Result<(Match, bool)> {
    if let Some(existing) = find_by_name(conn, name)? {
        return Ok((existing, false));
    }

    let sql = format!(
        "INSERT INTO matches (match_name, match_date, venue_id) VALUES (?1, ?2, ?3) RETURNING {}",
        MATCH_COLUMNS
    );

    let created = conn
        .query_row(&sql, params![name, date, venue_id], parse_match_row)
        .context("Failed to insert match")?;
    Ok((created, true))
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Match>> {
    let sql = format!("SELECT {} FROM matches WHERE match_name = ?1", MATCH_COLUMNS);

    conn.query_row(&sql, params![name], parse_match_row)
        .optional()
        .context("Failed to query match by name")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Match>> {
    let sql = format!("SELECT {} FROM matches WHERE match_id = ?1", MATCH_COLUMNS);

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        venue_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Newest first.
pub fn list_all(conn: &Connection) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches ORDER BY match_date DESC, match_id DESC",
        MATCH_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_ids(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT match_id FROM matches ORDER BY match_id")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_before(conn: &Connection, cutoff: NaiveDate) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches WHERE match_date < ?1 ORDER BY match_date",
        MATCH_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![cutoff], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Deletes a match with its scores and the badges it earned.
pub fn delete_with_scores(conn: &Connection, match_id: i64) -> Result<()> {
    conn.execute("DELETE FROM achievements WHERE match_id = ?1", params![match_id])
        .context("Failed to delete match achievements")?;
    conn.execute("DELETE FROM scores WHERE match_id = ?1", params![match_id])
        .context("Failed to delete match scores")?;
    conn.execute("DELETE FROM matches WHERE match_id = ?1", params![match_id])
        .context("Failed to delete match")?;
    Ok(())
}
