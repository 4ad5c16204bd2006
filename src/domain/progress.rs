use log::info;

/// Logs milestones while a pass walks over matches or shooters.
pub struct PassProgress {
    label: &'static str,
    total: usize,
    done: usize,
    skipped: usize,
}

impl PassProgress {
    pub fn new(label: &'static str, total: usize) -> Self {
        Self {
            label,
            total,
            done: 0,
            skipped: 0,
        }
    }

    pub fn increment_done(&mut self) {
        self.done += 1;
        self.log_progress();
    }

    pub fn increment_skipped(&mut self) {
        self.skipped += 1;
        self.log_progress();
    }

    pub fn current_count(&self) -> usize {
        self.done + self.skipped
    }

    fn log_progress(&self) {
        let current = self.current_count();
        if should_log(current, self.total) {
            info!(
                "  → {}: {}/{} ({} done, {} skipped)",
                self.label, current, self.total, self.done, self.skipped
            );
        }
    }
}

fn should_log(current: usize, total: usize) -> bool {
    is_milestone(current) || current == total
}

fn is_milestone(count: usize) -> bool {
    count % 100 == 0
}
