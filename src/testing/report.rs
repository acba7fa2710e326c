use std::fmt::Write as _;

use serde::Serialize;

use super::runner::{CaseOutcome, CaseResult};

/// Summary report for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub duration_ms: u128,
    pub results: Vec<CaseResult>,
}

impl RunReport {
    pub fn from_results(results: Vec<CaseResult>, duration_ms: u128) -> Self {
        let mut report = RunReport {
            total: results.len(),
            duration_ms,
            ..Default::default()
        };
        for result in &results {
            match result.outcome {
                CaseOutcome::Passed => report.passed += 1,
                CaseOutcome::Failed => report.failed += 1,
                CaseOutcome::Errored { .. } => report.errored += 1,
            }
        }
        report.results = results;
        report
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// 0 when everything passed, 1 on assertion failures, 2 on infrastructure errors.
    pub fn exit_code(&self) -> i32 {
        if self.errored > 0 {
            2
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }

    pub fn result(&self, name: &str) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let status = result
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "---".to_string());
            let label = match &result.outcome {
                CaseOutcome::Passed => "PASS",
                CaseOutcome::Failed => "FAIL",
                CaseOutcome::Errored { .. } => "ERROR",
            };
            let _ = writeln!(
                out,
                "{label:<5} {:<32} {:<6} {status} ({} ms)",
                result.name, result.method, result.duration_ms
            );

            // An errored case may still carry checks that failed before it stopped.
            for failure in result.failures() {
                let _ = writeln!(out, "      - {}: {}", failure.assertion, failure.message);
            }
            if let CaseOutcome::Errored { message, .. } = &result.outcome {
                let _ = writeln!(out, "      ! {message}");
            }
        }

        let _ = writeln!(
            out,
            "\n{} cases: {} passed, {} failed, {} errored in {} ms",
            self.total, self.passed, self.failed, self.errored, self.duration_ms
        );
        out
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
