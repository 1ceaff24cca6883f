//! Case runner: drives workflows, records outcomes, persists results.
//!
//! Each case is looked up in the result table, executed through its
//! family workflow and written back as Passed or Failed. The table is
//! flushed after every case so an aborted run still leaves the rows it
//! finished; failures additionally get a screenshot before the browser
//! state moves on.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::artifacts::ArtifactStore;
use crate::config::SuiteConfig;
use crate::data::{ResultTable, TestData, STATUS_FAILED, STATUS_PASSED};
use crate::driver::Driver;
use crate::error::{SuiteError, SuiteResult};
use crate::workflows::{self, CaseContext};

/// Outcome of one executed case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub tc_id: String,
    pub passed: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot: Option<String>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub outcomes: Vec<CaseOutcome>,
}

pub struct TestRunner {
    config: SuiteConfig,
    table: ResultTable,
    artifacts: ArtifactStore,
}

impl TestRunner {
    pub fn new(config: SuiteConfig) -> SuiteResult<Self> {
        let table = ResultTable::load(&config.data_file)?;
        let artifacts = ArtifactStore::new(&config.artifacts_dir);
        Ok(Self {
            config,
            table,
            artifacts,
        })
    }

    /// Run one case by id and persist its row.
    pub async fn run_case(
        &mut self,
        driver: &mut dyn Driver,
        tc_id: &str,
    ) -> SuiteResult<CaseOutcome> {
        let record = self
            .table
            .find(tc_id)
            .ok_or_else(|| SuiteError::CaseNotFound(tc_id.to_string()))?;
        let expected = record.expected.clone();
        let data = TestData::parse(&record.test_data);

        let start = Instant::now();
        let result = {
            let mut ctx = CaseContext {
                driver,
                config: &self.config,
                data: &data,
            };
            workflows::run_case(tc_id, &mut ctx).await
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(()) => {
                self.table.record(tc_id, STATUS_PASSED, &expected);
                CaseOutcome {
                    tc_id: tc_id.to_string(),
                    passed: true,
                    duration_ms,
                    error: None,
                    screenshot: None,
                }
            }
            Err(err) => {
                // Screenshot first, while the failing state is still up.
                let screenshot = match self.artifacts.capture(driver, tc_id).await {
                    Ok(path) => Some(path.display().to_string()),
                    Err(capture_err) => {
                        warn!("failed to capture screenshot for {tc_id}: {capture_err}");
                        None
                    }
                };
                self.table.record(
                    tc_id,
                    STATUS_FAILED,
                    &format!("{expected} | Actual: {err}"),
                );
                CaseOutcome {
                    tc_id: tc_id.to_string(),
                    passed: false,
                    duration_ms,
                    error: Some(err.to_string()),
                    screenshot,
                }
            }
        };

        self.table.flush()?;
        Ok(outcome)
    }

    /// Run every row in the table, in sheet order. Rows outside the
    /// known families are skipped, not failed.
    pub async fn run_all(&mut self, driver: &mut dyn Driver) -> SuiteResult<SuiteSummary> {
        let ids: Vec<String> = self
            .table
            .records()
            .iter()
            .map(|r| r.tc_id.clone())
            .collect();
        self.run_ids(driver, &ids).await
    }

    /// Run the rows whose id starts with `filter` (an exact id or a
    /// family prefix like `FPASS`).
    pub async fn run_matching(
        &mut self,
        driver: &mut dyn Driver,
        filter: &str,
    ) -> SuiteResult<SuiteSummary> {
        let ids: Vec<String> = self
            .table
            .records()
            .iter()
            .filter(|r| r.tc_id.starts_with(filter))
            .map(|r| r.tc_id.clone())
            .collect();
        if ids.is_empty() {
            return Err(SuiteError::CaseNotFound(filter.to_string()));
        }
        self.run_ids(driver, &ids).await
    }

    async fn run_ids(
        &mut self,
        driver: &mut dyn Driver,
        ids: &[String],
    ) -> SuiteResult<SuiteSummary> {
        let start = Instant::now();
        let mut outcomes = Vec::new();
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        info!("Running {} case(s)...", ids.len());

        for tc_id in ids {
            if !workflows::known_family(tc_id) {
                skipped += 1;
                info!("- {tc_id} (skipped: unknown family)");
                continue;
            }
            let outcome = self.run_case(driver, tc_id).await?;
            if outcome.passed {
                passed += 1;
                info!("✓ {tc_id} ({} ms)", outcome.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {tc_id} - {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
            outcomes.push(outcome);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("");
        info!("Results: {passed} passed, {failed} failed, {skipped} skipped ({duration_ms} ms)");

        Ok(SuiteSummary {
            total: ids.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            outcomes,
        })
    }

    /// Write the run summary to `<reports_dir>/suite-results.json`.
    pub fn write_summary(&self, summary: &SuiteSummary) -> SuiteResult<PathBuf> {
        std::fs::create_dir_all(&self.config.reports_dir)?;
        let path = self.config.reports_dir.join("suite-results.json");
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&path, json)?;
        info!("summary written to {}", path.display());
        Ok(path)
    }
}
