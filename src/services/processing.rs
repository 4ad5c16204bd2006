use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::Connection;

use crate::classification::{
    self, award_achievements, eligible_sequence, normalize_match, reconcile, season_total, ClassOutcome,
    MatchNormalization,
};
use crate::config::settings::AppConfig;
use crate::database::{self, achievements, matches, scores, setup, shooters, Shooter};
use crate::domain::PassProgress;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassChange {
    pub shooter_id: i64,
    pub name: String,
    pub outcome: ClassOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingReport {
    pub matches_normalized: usize,
    pub matches_skipped: usize,
    pub matches_failed: usize,
    pub shooters_scanned: usize,
    pub shooters_failed: usize,
    pub changes: Vec<ClassChange>,
    pub achievements_awarded: usize,
}

/// Normalize, classify, then award badges. Each phase commits as one unit
/// before the next one reads.
pub struct ProcessingService {
    config: AppConfig,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<ProcessingReport> {
        info!("=== Starting WYCO Processing ===");
        info!("Target DB: {}", self.config.database_path);

        let pool = database::create_pool(&self.config.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        setup::ensure_schema(&conn)?;

        let report = self.process(&mut conn)?;

        info!("=== Processing Complete ===");
        Ok(report)
    }

    pub fn process(&self, conn: &mut Connection) -> Result<ProcessingReport> {
        let mut report = ProcessingReport::default();

        self.normalize_all(conn, &mut report)?;
        info!(
            "  → Normalized {} matches ({} skipped, {} failed)\n",
            report.matches_normalized, report.matches_skipped, report.matches_failed
        );

        self.classify_all(conn, &mut report)?;
        info!(
            "  → Classified {} shooters ({} changed, {} failed)\n",
            report.shooters_scanned,
            report.changes.len(),
            report.shooters_failed
        );

        self.award_all(conn, &mut report)?;
        info!("  → Awarded {} new achievement(s)\n", report.achievements_awarded);

        Ok(report)
    }

    fn award_all(&self, conn: &mut Connection, report: &mut ProcessingReport) -> Result<()> {
        info!("Phase 3: Awarding achievements...");

        let tx = conn.transaction().context("Failed to open achievements transaction")?;
        let results = achievements::list_overall_results(&tx)?;

        for award in award_achievements(&results) {
            if achievements::insert_if_absent(&tx, &award)? {
                report.achievements_awarded += 1;
            }
        }

        tx.commit().context("Failed to commit achievements phase")
    }

    fn normalize_all(&self, conn: &mut Connection, report: &mut ProcessingReport) -> Result<()> {
        info!("Phase 1: Calculating WYCO points per match...");

        let mut tx = conn.transaction().context("Failed to open normalization transaction")?;
        let match_ids = matches::list_ids(&tx)?;
        let mut progress = PassProgress::new("matches", match_ids.len());

        for match_id in match_ids {
            let sp = tx.savepoint()?;
            match normalize_one(&sp, match_id) {
                Ok(true) => {
                    sp.commit()?;
                    report.matches_normalized += 1;
                    progress.increment_done();
                }
                Ok(false) => {
                    sp.commit()?;
                    warn!("Match {}: top score is zero or missing, no WYCO points written", match_id);
                    report.matches_skipped += 1;
                    progress.increment_skipped();
                }
                Err(e) => {
                    warn!("Match {}: normalization failed, skipping: {:#}", match_id, e);
                    report.matches_failed += 1;
                    progress.increment_skipped();
                }
            }
        }

        tx.commit().context("Failed to commit normalization phase")
    }

    fn classify_all(&self, conn: &mut Connection, report: &mut ProcessingReport) -> Result<()> {
        info!("Phase 2: Classifying shooters...");

        let mut tx = conn.transaction().context("Failed to open classification transaction")?;
        let in_scope =
            shooters::list_for_classification(&tx, self.config.classification.include_inactive)?;
        let mut progress = PassProgress::new("shooters", in_scope.len());

        for shooter in &in_scope {
            let sp = tx.savepoint()?;
            match self.classify_one(&sp, shooter) {
                Ok(outcome) => {
                    sp.commit()?;
                    report.shooters_scanned += 1;
                    progress.increment_done();
                    if outcome.new_class().is_some() {
                        report.changes.push(ClassChange {
                            shooter_id: shooter.id,
                            name: shooter.name.clone(),
                            outcome,
                        });
                    }
                }
                Err(e) => {
                    warn!("Shooter {} ({}): classification failed, skipping: {:#}", shooter.id, shooter.name, e);
                    report.shooters_failed += 1;
                    progress.increment_skipped();
                }
            }
        }

        tx.commit().context("Failed to commit classification phase")
    }

    fn classify_one(&self, conn: &Connection, shooter: &Shooter) -> Result<ClassOutcome> {
        let history = scores::overall_history(conn, shooter.id)?;
        let eligible = eligible_sequence(history);
        let outcome = reconcile(shooter.classification, &eligible, &self.config.classification);

        match outcome {
            ClassOutcome::Promoted { from, to } => {
                info!("{}: {} → {}", shooter.name, from, to);
                shooters::update_classification(conn, shooter.id, to)?;
            }
            ClassOutcome::Reset { from } => {
                warn!("{}: {} → Unclassified (not enough scores)", shooter.name, from);
                shooters::update_classification(conn, shooter.id, classification::Classification::Unclassified)?;
            }
            ClassOutcome::Unchanged(_) => {}
        }

        let best = scores::best_per_venue(conn, shooter.id)?;
        let total = season_total(&best, self.config.totals.top_venues);
        shooters::update_wyco_points(conn, shooter.id, total)?;

        Ok(outcome)
    }
}

/// Returns `false` when the match has no usable top score.
fn normalize_one(conn: &Connection, match_id: i64) -> Result<bool> {
    let raw = scores::list_overall_points(conn, match_id)?;
    scores::clear_match_wyco_points(conn, match_id)?;

    match normalize_match(&raw) {
        MatchNormalization::Skipped => Ok(false),
        MatchNormalization::Scored(values) => {
            for (score_id, wyco_points) in values {
                scores::set_wyco_points(conn, score_id, wyco_points)?;
            }
            Ok(true)
        }
    }
}
