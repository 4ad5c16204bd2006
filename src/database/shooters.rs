use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension};

use super::models::{Shooter, ShooterFilter};
use crate::classification::Classification;

const SHOOTER_COLUMNS: &str =
    "shooter_id, name, wyco_number, membership_active, classification, wyco_points";

const NUMBERED_MEMBER: &str =
    "membership_active = 1 AND wyco_number IS NOT NULL AND TRIM(wyco_number) <> ''";

pub fn upsert_by_name(conn: &Connection, name: &str) -> Result<Shooter> {
    if let Some(existing) = find_by_name(conn, name)? {
        return Ok(existing);
    }

    let sql = format!(
        "INSERT INTO shooters (name) VALUES (?1) RETURNING {}",
        SHOOTER_COLUMNS
    );

    conn.query_row(&sql, params![name], parse_shooter_row)
        .context("Failed to insert new shooter")
}

pub fn insert_member(
    conn: &Connection,
    name: &str,
    wyco_number: &str,
    active: bool,
) -> Result<Shooter> {
    let sql = format!(
        "INSERT INTO shooters (name, wyco_number, membership_active) VALUES (?1, ?2, ?3) RETURNING {}",
        SHOOTER_COLUMNS
    );

    conn.query_row(&sql, params![name, wyco_number, active], parse_shooter_row)
        .context("Failed to insert member")
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Shooter>> {
    let sql = format!("SELECT {} FROM shooters WHERE name = ?1", SHOOTER_COLUMNS);

    conn.query_row(&sql, params![name], parse_shooter_row)
        .optional()
        .context("Failed to query shooter by name")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Shooter>> {
    let sql = format!("SELECT {} FROM shooters WHERE shooter_id = ?1", SHOOTER_COLUMNS);

    conn.query_row(&sql, params![id], parse_shooter_row)
        .optional()
        .context("Failed to query shooter by id")
}

fn parse_shooter_row(row: &rusqlite::Row) -> rusqlite::Result<Shooter> {
    let classification: Option<String> = row.get(4)?;

    Ok(Shooter {
        id: row.get(0)?,
        name: row.get(1)?,
        wyco_number: row.get(2)?,
        membership_active: row.get(3)?,
        classification: Classification::from_stored(classification.as_deref()),
        wyco_points: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
    })
}

/// Ordered by id, so the oldest record of a name comes first.
pub fn list_all(conn: &Connection) -> Result<Vec<Shooter>> {
    let sql = format!("SELECT {} FROM shooters ORDER BY shooter_id", SHOOTER_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_shooter_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Shooters the classification pass looks at.
pub fn list_for_classification(conn: &Connection, include_inactive: bool) -> Result<Vec<Shooter>> {
    if include_inactive {
        return list_all(conn);
    }

    let sql = format!(
        "SELECT {} FROM shooters WHERE {} ORDER BY shooter_id",
        SHOOTER_COLUMNS, NUMBERED_MEMBER
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_shooter_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_classification(
    conn: &Connection,
    shooter_id: i64,
    classification: Classification,
) -> Result<()> {
    conn.execute(
        "UPDATE shooters SET classification = ?1 WHERE shooter_id = ?2",
        params![classification.as_str(), shooter_id],
    )
    .context("Failed to update shooter classification")?;
    Ok(())
}

pub fn update_wyco_points(conn: &Connection, shooter_id: i64, total: f64) -> Result<()> {
    conn.execute(
        "UPDATE shooters SET wyco_points = ?1 WHERE shooter_id = ?2",
        params![total, shooter_id],
    )
    .context("Failed to update shooter WYCO total")?;
    Ok(())
}

pub fn update_membership(
    conn: &Connection,
    shooter_id: i64,
    wyco_number: Option<&str>,
    active: Option<bool>,
) -> Result<()> {
    conn.execute(
        "UPDATE shooters SET wyco_number = ?1, membership_active = ?2 WHERE shooter_id = ?3",
        params![wyco_number, active, shooter_id],
    )
    .context("Failed to update shooter membership")?;
    Ok(())
}

pub fn delete(conn: &Connection, shooter_id: i64) -> Result<()> {
    conn.execute("DELETE FROM achievements WHERE shooter_id = ?1", params![shooter_id])
        .context("Failed to delete shooter achievements")?;
    conn.execute("DELETE FROM shooters WHERE shooter_id = ?1", params![shooter_id])
        .context("Failed to delete shooter")?;
    Ok(())
}

/// Leaderboard page ordered by WYCO total, plus the unpaged total count.
pub fn list_standings(conn: &Connection, filter: &ShooterFilter) -> Result<(Vec<Shooter>, usize)> {
    let mut conditions = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &filter.name_contains {
        values.push(Value::Text(format!("%{}%", escape_like(name))));
        conditions.push(format!("name LIKE ?{} ESCAPE '\\'", values.len()));
    }
    if let Some(class) = filter.classification {
        values.push(Value::Text(class.as_str().to_string()));
        conditions.push(format!("classification = ?{}", values.len()));
    }
    if filter.members_only {
        conditions.push(NUMBERED_MEMBER.to_string());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM shooters {}", where_clause);
    let total: i64 = conn
        .query_row(&count_sql, params_from_iter(values.iter()), |row| row.get(0))
        .context("Failed to count shooters")?;

    let sql = format!(
        "SELECT {} FROM shooters {} ORDER BY wyco_points DESC, name ASC LIMIT {} OFFSET {}",
        SHOOTER_COLUMNS, where_clause, filter.limit, filter.offset
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), parse_shooter_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((rows, total as usize))
}

/// Makes `%`, `_` and `\` match themselves under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
