use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;
use std::collections::BTreeMap;

use crate::database::{matches, scores, shooters, Shooter};
use crate::domain::normalize_name;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeEntry {
    pub primary_id: i64,
    pub primary_name: String,
    pub duplicate_id: i64,
    pub duplicate_name: String,
    pub scores_moved: usize,
}

/// Folds shooter records whose names differ only in case, spacing or
/// comma placement into the oldest record of the group.
pub fn merge_duplicates(conn: &mut Connection, dry_run: bool) -> Result<Vec<MergeEntry>> {
    let tx = conn.transaction()?;

    let mut groups: BTreeMap<String, Vec<Shooter>> = BTreeMap::new();
    for shooter in shooters::list_all(&tx)? {
        groups.entry(normalize_name(&shooter.name)).or_default().push(shooter);
    }

    let mut merged = Vec::new();
    for (_, group) in groups.into_iter().filter(|(_, g)| g.len() > 1) {
        let mut members = group.into_iter();
        let Some(mut primary) = members.next() else {
            continue;
        };

        for duplicate in members {
            let moved = if dry_run {
                0
            } else {
                fold_into(&tx, &mut primary, &duplicate)?
            };
            merged.push(merge_entry(&primary, &duplicate, moved));
        }
    }

    if dry_run {
        info!("Dry run: {} duplicate record(s) found, nothing changed", merged.len());
    } else {
        tx.commit().context("Failed to commit duplicate merge")?;
        info!("Merged {} duplicate shooter profile(s)", merged.len());
    }

    for entry in &merged {
        info!(
            " - \"{}\" (ID {}) → \"{}\" (ID {})",
            entry.duplicate_name, entry.duplicate_id, entry.primary_name, entry.primary_id
        );
    }

    Ok(merged)
}

/// Merges one named record into another, e.g. a nickname into the full name.
pub fn merge_shooters(conn: &mut Connection, into: i64, from: i64) -> Result<MergeEntry> {
    if into == from {
        anyhow::bail!("Cannot merge shooter {} into itself", into);
    }

    let tx = conn.transaction()?;
    let mut primary = shooters::find_by_id(&tx, into)?
        .with_context(|| format!("Shooter {} not found", into))?;
    let duplicate = shooters::find_by_id(&tx, from)?
        .with_context(|| format!("Shooter {} not found", from))?;

    let moved = fold_into(&tx, &mut primary, &duplicate)?;
    tx.commit().context("Failed to commit shooter merge")?;

    info!("Merged shooter ID {} into {} ({} scores moved)", from, into, moved);
    Ok(merge_entry(&primary, &duplicate, moved))
}

fn merge_entry(primary: &Shooter, duplicate: &Shooter, scores_moved: usize) -> MergeEntry {
    MergeEntry {
        primary_id: primary.id,
        primary_name: primary.name.clone(),
        duplicate_id: duplicate.id,
        duplicate_name: duplicate.name.clone(),
        scores_moved,
    }
}

/// Moves scores and fills gaps on `primary` from `duplicate`, then deletes
/// the duplicate. The better of the two classes is kept.
fn fold_into(conn: &Connection, primary: &mut Shooter, duplicate: &Shooter) -> Result<usize> {
    let moved = scores::reparent(conn, duplicate.id, primary.id)?;

    let has_number = primary
        .wyco_number
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty());
    if !has_number && duplicate.wyco_number.is_some() {
        primary.wyco_number = duplicate.wyco_number.clone();
    }
    if primary.membership_active.is_none() {
        primary.membership_active = duplicate.membership_active;
    }
    if duplicate.classification.outranks(primary.classification) {
        primary.classification = duplicate.classification;
    }

    shooters::delete(conn, duplicate.id)?;
    shooters::update_membership(
        conn,
        primary.id,
        primary.wyco_number.as_deref(),
        primary.membership_active,
    )?;
    shooters::update_classification(conn, primary.id, primary.classification)?;

    Ok(moved)
}

/// Deletes every match dated before `cutoff`, with its scores.
/// Returns the names of the removed matches.
pub fn prune_before(conn: &mut Connection, cutoff: NaiveDate) -> Result<Vec<String>> {
    let tx = conn.transaction()?;
    let old = matches::list_before(&tx, cutoff)?;

    info!("Deleting {} match(es) before {}:", old.len(), cutoff);
    for m in &old {
        info!(" - {} ({})", m.name, m.date);
        matches::delete_with_scores(&tx, m.id)?;
    }

    tx.commit().context("Failed to commit match cleanup")?;
    Ok(old.into_iter().map(|m| m.name).collect())
}
