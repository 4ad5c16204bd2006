use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::database::{self, matches, scores, setup, shooters, NewScore};
use crate::domain::{MatchExport, StageExport};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    pub files_read: usize,
    pub files_rejected: usize,
    pub matches_created: usize,
    pub matches_skipped: usize,
    pub stages_inserted: usize,
    pub stages_skipped: usize,
    pub rows_inserted: usize,
    pub rows_rejected: usize,
}

/// Loads exported result sheets into the store. Matches already present
/// are left alone.
pub struct IngestionService {
    database_path: String,
}

impl IngestionService {
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    pub fn run(&self, path: &Path) -> Result<IngestionReport> {
        info!("=== Starting Result Ingestion ===");

        let pool = database::create_pool(&self.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        setup::ensure_schema(&conn)?;

        let report = ingest_path(&mut conn, path, Local::now().date_naive())?;

        info!(
            "  → {} new matches, {} already present, {} rows stored, {} rows rejected",
            report.matches_created, report.matches_skipped, report.rows_inserted, report.rows_rejected
        );
        info!("=== Ingestion Complete ===");
        Ok(report)
    }
}

/// Ingests one export file, or every `*.json` file in a directory.
/// `today` dates matches whose export carries no date at all.
pub fn ingest_path(conn: &mut Connection, path: &Path, today: NaiveDate) -> Result<IngestionReport> {
    let mut report = IngestionReport::default();

    for file in collect_files(path)? {
        let export = match load_export(&file) {
            Ok(export) => export,
            Err(e) => {
                warn!("Skipping {}: {:#}", file.display(), e);
                report.files_rejected += 1;
                continue;
            }
        };
        report.files_read += 1;

        if let Err(e) = ingest_export(conn, &export, today, &mut report) {
            warn!("Match '{}' from {} not stored: {:#}", export.name, file.display(), e);
            report.files_rejected += 1;
        }
    }

    Ok(report)
}

fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path)
        .with_context(|| format!("Failed to read results directory {}", path.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let file = entry?.path();
        if file.is_file() && file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();

    Ok(files)
}

fn load_export(path: &Path) -> Result<MatchExport> {
    let json = fs::read_to_string(path).context("Failed to read export file")?;
    serde_json::from_str(&json).with_context(|| {
        format!(
            "Failed to parse JSON. First 200 chars: {}",
            json.chars().take(200).collect::<String>()
        )
    })
}

/// Stores one match in its own transaction.
pub fn ingest_export(
    conn: &mut Connection,
    export: &MatchExport,
    today: NaiveDate,
    report: &mut IngestionReport,
) -> Result<()> {
    let name = export.name.trim();
    if name.is_empty() {
        anyhow::bail!("Match has no name");
    }

    let tx = conn.transaction()?;

    let date = export.match_date(today);
    let venue_id = export.venue_id();
    let (stored, created) = matches::insert_if_absent(&tx, name, date, venue_id)?;
    if !created {
        info!("Match '{}' already exists, skipping", name);
        report.matches_skipped += 1;
        return Ok(());
    }

    info!("Match: {} | Date: {} | Venue ID: {:?}", name, date, venue_id);
    if venue_id.is_none() {
        warn!("Match '{}' has no venue; it will not count towards season totals", name);
    }

    for stage in &export.stages {
        insert_stage(&tx, stored.id, stage, report)?;
    }

    tx.commit().context("Failed to commit match")?;
    report.matches_created += 1;
    Ok(())
}

fn insert_stage(
    conn: &Connection,
    match_id: i64,
    stage: &StageExport,
    report: &mut IngestionReport,
) -> Result<()> {
    let stage_name = stage.name.trim();
    // Only reachable for a stage listed twice in one export; the first sheet wins.
    if scores::stage_exists(conn, match_id, stage_name)? {
        info!("Stage '{}' already exists, skipping", stage_name);
        report.stages_skipped += 1;
        return Ok(());
    }

    let mut inserted = 0;
    for (idx, row) in stage.results.iter().enumerate() {
        let parsed = match row.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stage '{}' row {}: {}, skipping", stage_name, idx + 1, e);
                report.rows_rejected += 1;
                continue;
            }
        };

        if parsed.percentage <= 0.0 {
            continue;
        }

        let shooter = shooters::upsert_by_name(conn, &parsed.name)?;
        let score = NewScore {
            stage_name,
            place: parsed.place,
            percentage: Some(parsed.percentage),
            points: Some(parsed.points),
        };
        scores::upsert_score(conn, match_id, shooter.id, &score)?;
        inserted += 1;
    }

    report.stages_inserted += 1;
    report.rows_inserted += inserted;
    info!("Inserted {} rows for stage '{}'", inserted, stage_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::OVERALL_STAGE;
    use std::io::Write;

    const EXPORT: &str = r#"{
        "name": "Cheyenne PRS 2025-05-03",
        "stages": [
            { "name": "Overall", "results": [
                { "name": "Doe, John", "place": 1, "percentage": "100.00%", "points": "512.40" },
                { "name": "Roe, Jane", "place": 2, "percentage": "80.5", "points": 412.5 },
                { "name": "Late, Larry", "place": 3, "percentage": "0.00%", "points": "0" },
                { "name": "Bad, Row", "place": 4, "percentage": "40", "points": "DQ" }
            ]},
            { "name": "Stage 1", "results": [
                { "name": "Doe, John", "place": 1, "percentage": 100, "points": 60 }
            ]}
        ]
    }"#;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup::ensure_schema(&conn).unwrap();
        conn
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn write_export(dir: &Path, file: &str, body: &str) -> PathBuf {
        let path = dir.join(file);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_ingest_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_export(dir.path(), "cheyenne.json", EXPORT);
        write_export(dir.path(), "broken.json", "{ not json");
        write_export(dir.path(), "notes.txt", "ignored");
        let mut conn = setup();

        let report = ingest_path(&mut conn, dir.path(), today()).unwrap();

        assert_eq!(report.files_read, 1);
        assert_eq!(report.files_rejected, 1);
        assert_eq!(report.matches_created, 1);
        assert_eq!(report.stages_inserted, 2);
        assert_eq!(report.rows_inserted, 3);
        assert_eq!(report.rows_rejected, 1);

        let stored = matches::find_by_name(&conn, "Cheyenne PRS 2025-05-03").unwrap().unwrap();
        assert_eq!(stored.venue_id, Some(1));
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2025, 5, 3).unwrap());
        assert!(shooters::find_by_name(&conn, "Late, Larry").unwrap().is_none());

        let raw = scores::list_overall_points(&conn, stored.id).unwrap();
        assert_eq!(raw.len(), 2);
        assert!(raw.iter().any(|s| s.points == Some(512.4)));
        assert!(scores::stage_exists(&conn, stored.id, OVERALL_STAGE).unwrap());
    }

    #[test]
    fn test_reingest_skips_existing_match() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_export(dir.path(), "cheyenne.json", EXPORT);
        let mut conn = setup();

        ingest_path(&mut conn, &file, today()).unwrap();
        let again = ingest_path(&mut conn, &file, today()).unwrap();

        assert_eq!(again.matches_created, 0);
        assert_eq!(again.matches_skipped, 1);
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM scores", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_repeated_stage_in_one_export_keeps_first_sheet() {
        let export: MatchExport = serde_json::from_str(
            r#"{
                "name": "Laramie Steel 2025-07-12",
                "stages": [
                    { "name": "Overall", "results": [
                        { "name": "Doe, John", "place": 1, "percentage": 100, "points": 300 }
                    ]},
                    { "name": " Overall ", "results": [
                        { "name": "Doe, John", "place": 1, "percentage": 100, "points": 999 }
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let mut conn = setup();
        let mut report = IngestionReport::default();

        ingest_export(&mut conn, &export, today(), &mut report).unwrap();

        assert_eq!(report.stages_inserted, 1);
        assert_eq!(report.stages_skipped, 1);
        let stored = matches::find_by_name(&conn, "Laramie Steel 2025-07-12").unwrap().unwrap();
        let raw = scores::list_overall_points(&conn, stored.id).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].points, Some(300.0));
    }
}
