use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

use crate::database::{self, setup, shooters};
use crate::domain::member_name;

const LAST_NAME: &str = "member_last_name";
const FIRST_NAME: &str = "member_first_name";
const NUMBER: &str = "user_id";
const STATUS: &str = "membership_status";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// A roster line after header mapping.
#[derive(Debug, Clone, PartialEq)]
struct MemberRecord {
    name: String,
    wyco_number: String,
    active: bool,
}

pub fn import_members_file(database_path: &str, csv_path: &Path) -> Result<MembershipReport> {
    let pool = database::create_pool(database_path)?;
    let mut conn = database::get_connection(&pool)?;
    setup::ensure_schema(&conn)?;

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let report = import_members(&mut conn, reader)?;
    info!(
        "Members imported: {} inserted, {} updated, {} skipped",
        report.inserted, report.updated, report.skipped
    );
    Ok(report)
}

/// Applies a membership roster: numbers and active flags are set on
/// existing shooters by name, unknown members are created.
pub fn import_members<R: std::io::Read>(
    conn: &mut Connection,
    mut reader: csv::Reader<R>,
) -> Result<MembershipReport> {
    let columns = header_index(reader.headers().context("Failed to read CSV headers")?)?;
    let mut report = MembershipReport::default();

    let tx = conn.transaction()?;
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Line {}: unreadable row, skipping: {}", line, e);
                report.skipped += 1;
                continue;
            }
        };

        let Some(member) = map_record(&record, &columns) else {
            report.skipped += 1;
            continue;
        };

        match shooters::find_by_name(&tx, &member.name)? {
            Some(existing) => {
                shooters::update_membership(&tx, existing.id, Some(&member.wyco_number), Some(member.active))?;
                report.updated += 1;
            }
            None => {
                shooters::insert_member(&tx, &member.name, &member.wyco_number, member.active)?;
                report.inserted += 1;
            }
        }
    }
    tx.commit().context("Failed to commit membership import")?;

    Ok(report)
}

fn header_index(headers: &csv::StringRecord) -> Result<HashMap<String, usize>> {
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| (h.trim().to_lowercase(), idx))
        .collect();

    for required in [LAST_NAME, FIRST_NAME, NUMBER, STATUS] {
        if !columns.contains_key(required) {
            anyhow::bail!("Membership CSV is missing column '{}'", required);
        }
    }

    Ok(columns)
}

fn map_record(record: &csv::StringRecord, columns: &HashMap<String, usize>) -> Option<MemberRecord> {
    let field = |name: &str| {
        columns
            .get(name)
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
            .trim()
    };

    let name = member_name(field(LAST_NAME), field(FIRST_NAME));
    if name.is_empty() {
        return None;
    }

    Some(MemberRecord {
        name,
        wyco_number: field(NUMBER).to_string(),
        active: field(STATUS).eq_ignore_ascii_case("active"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
 Member_Last_Name ,Member_First_Name,User_ID,Membership_Status
Doe,John,1001,Active
Roe,Jane,1002,expired
,,1003,active
New,Nora,1004, ACTIVE
";

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup::ensure_schema(&conn).unwrap();
        conn
    }

    fn reader(body: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes())
    }

    #[test]
    fn test_import_updates_and_inserts() {
        let mut conn = setup();
        shooters::upsert_by_name(&conn, "Doe, John").unwrap();
        shooters::upsert_by_name(&conn, "Roe, Jane").unwrap();

        let report = import_members(&mut conn, reader(ROSTER)).unwrap();

        assert_eq!(report, MembershipReport { inserted: 1, updated: 2, skipped: 1 });

        let doe = shooters::find_by_name(&conn, "Doe, John").unwrap().unwrap();
        assert_eq!(doe.wyco_number.as_deref(), Some("1001"));
        assert!(doe.is_numbered_member());

        let roe = shooters::find_by_name(&conn, "Roe, Jane").unwrap().unwrap();
        assert_eq!(roe.membership_active, Some(false));

        let nora = shooters::find_by_name(&conn, "New, Nora").unwrap().unwrap();
        assert!(nora.is_numbered_member());
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let mut conn = setup();
        let err = import_members(&mut conn, reader("last,first\nDoe,John\n")).unwrap_err();
        assert!(err.to_string().contains("member_last_name"));
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("members.db");
        let csv_path = dir.path().join("wyconumbers.csv");
        std::fs::write(&csv_path, ROSTER).unwrap();

        let report = import_members_file(db.to_str().unwrap(), &csv_path).unwrap();

        assert_eq!(report.inserted, 3);
    }
}
