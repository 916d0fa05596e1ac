use std::io::Write;

use crate::types::{ActionResult, BatchReport, Outcome, PowerAction, RunningSet, VmRecord};

/// Writes human-readable progress and result lines.
///
/// Write errors are ignored: a closed stdout must not interrupt a batch that is
/// already changing VM state.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn running(&mut self, set: &RunningSet) {
        self.unmatched(&set.unmatched);
        if set.running.is_empty() {
            let _ = writeln!(self.out, "No virtual machines are currently running.");
            return;
        }
        let _ = writeln!(self.out, "Running virtual machines:");
        for vm in &set.running {
            let _ = writeln!(self.out, "  - {vm}");
        }
    }

    pub fn unmatched(&mut self, paths: &[String]) {
        for path in paths {
            let _ = writeln!(
                self.out,
                "Warning: {path} is running but not present in the configuration."
            );
        }
    }

    pub fn query_failed(&mut self, message: &str) {
        let _ = writeln!(self.out, "Failed to query running virtual machines: {message}");
    }

    pub fn nothing_to_suspend(&mut self) {
        let _ = writeln!(self.out, "No running virtual machines found to suspend.");
    }

    pub fn starting(&mut self, action: PowerAction, vm: &VmRecord) {
        let _ = writeln!(self.out, "{} {vm}...", action.progressive());
    }

    pub fn outcome(&mut self, action: PowerAction, result: &ActionResult) {
        match &result.outcome {
            Outcome::Success { note } => {
                let _ = writeln!(self.out, "{} {} successfully.", result.vm, action.past());
                if let Some(note) = note {
                    let _ = writeln!(self.out, "  {note}");
                }
            }
            Outcome::Failure { message } => {
                let _ = writeln!(self.out, "Failed to {action} {}: {message}", result.vm);
            }
        }
    }

    pub fn summary(&mut self, report: &BatchReport) {
        let _ = writeln!(
            self.out,
            "Done: {} succeeded, {} failed.",
            report.succeeded(),
            report.failed()
        );
    }
}
