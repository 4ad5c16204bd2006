pub mod api;
pub mod classification;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod services;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;
use std::path::Path;

use crate::classification::ClassOutcome;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::ingestion::IngestionService;
use crate::services::processing::{ProcessingReport, ProcessingService};
use crate::services::server::ServerService;
use crate::services::{hygiene, membership};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_ingest(path: &Path) -> Result<()> {
    let config = AppConfig::from_env();
    let service = IngestionService::new(config.database_path);
    let report = service.run(path)?;
    println!(
        "{} {} new match(es), {} already present, {} row(s) rejected",
        "Ingested:".bold(),
        report.matches_created,
        report.matches_skipped,
        report.rows_rejected
    );
    Ok(())
}

pub fn handle_process(include_inactive: bool) -> Result<()> {
    let mut config = AppConfig::from_env();
    config.classification.include_inactive |= include_inactive;

    let service = ProcessingService::new(config);
    let report = service.run()?;
    print_class_changes(&report);
    if report.achievements_awarded > 0 {
        println!("{} {} new achievement(s)", "Awarded".bold(), report.achievements_awarded);
    }
    Ok(())
}

fn print_class_changes(report: &ProcessingReport) {
    if report.changes.is_empty() {
        println!("{}", "No classification changes.".dimmed());
        return;
    }

    println!("{}", "Classification changes:".bold());
    for change in &report.changes {
        match change.outcome {
            ClassOutcome::Promoted { from, to } => println!(
                "  {} {}: {} -> {}",
                "▲".green(),
                change.name,
                from,
                to.to_string().green()
            ),
            ClassOutcome::Reset { from } => println!(
                "  {} {}: {} -> {}",
                "▼".yellow(),
                change.name,
                from,
                "Unclassified".yellow()
            ),
            ClassOutcome::Unchanged(_) => {}
        }
    }
}

pub fn handle_import_members(csv_path: &Path) -> Result<()> {
    let config = AppConfig::from_env();
    let report = membership::import_members_file(&config.database_path, csv_path)?;
    println!(
        "{} {} inserted, {} updated, {} skipped",
        "Members:".bold(),
        report.inserted,
        report.updated,
        report.skipped
    );
    Ok(())
}

pub fn handle_dedupe(dry_run: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.database_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&conn)?;

    let merged = hygiene::merge_duplicates(&mut conn, dry_run)?;
    let verb = if dry_run { "Would merge" } else { "Merged" };
    println!("{} {} duplicate record(s)", verb.bold(), merged.len());
    for entry in &merged {
        println!(
            "  \"{}\" (ID {}) -> \"{}\" (ID {})",
            entry.duplicate_name, entry.duplicate_id, entry.primary_name, entry.primary_id
        );
    }
    Ok(())
}

pub fn handle_merge(into: i64, from: i64) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.database_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&conn)?;

    let entry = hygiene::merge_shooters(&mut conn, into, from)?;
    println!(
        "{} \"{}\" into \"{}\" ({} score(s) moved)",
        "Merged".bold(),
        entry.duplicate_name,
        entry.primary_name,
        entry.scores_moved
    );
    Ok(())
}

pub fn handle_prune(before: NaiveDate) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.database_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&conn)?;

    let removed = hygiene::prune_before(&mut conn, before)?;
    println!("{} {} match(es) before {}", "Deleted".bold(), removed.len(), before);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
