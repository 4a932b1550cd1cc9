//! Scenario runner: executes the steps, captures the outcome screenshot and
//! always releases the browser

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::artifact::ScreenshotArtifact;
use crate::error::{E2eError, E2eResult};
use crate::fixtures::{Fixture, TARGET_URL};
use crate::playwright::{PlaywrightConfig, PlaywrightSession};
use crate::scenario::{self, Step, Timeouts, SCENARIO_NAME};
use crate::session::BrowserSession;

/// Result of executing a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Outcome of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub started_at: DateTime<Utc>,
    pub success: bool,
    pub duration_ms: u64,
    /// Steps in execution order, up to and including the failing one
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    /// The screenshot actually written, success or failure
    pub screenshot: Option<ScreenshotArtifact>,
}

/// Configuration for the runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub url: String,
    pub artifact_dir: PathBuf,
    pub success_screenshot: String,
    pub failure_screenshot: String,
    pub fixture: Fixture,
    pub timeouts: Timeouts,
    pub playwright: PlaywrightConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            url: TARGET_URL.to_string(),
            artifact_dir: PathBuf::from("jules-scratch/verification"),
            success_screenshot: "verification.png".to_string(),
            failure_screenshot: "error.png".to_string(),
            fixture: Fixture::default(),
            timeouts: Timeouts::default(),
            playwright: PlaywrightConfig::default(),
        }
    }
}

pub struct ScenarioRunner {
    config: RunnerConfig,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn success_path(&self) -> PathBuf {
        self.config.artifact_dir.join(&self.config.success_screenshot)
    }

    pub fn failure_path(&self) -> PathBuf {
        self.config.artifact_dir.join(&self.config.failure_screenshot)
    }

    pub fn steps(&self) -> Vec<Step> {
        scenario::record_sale(
            &self.config.url,
            &self.config.fixture,
            &self.config.timeouts,
            &self.success_path(),
        )
    }

    /// Launch Playwright and run the scenario in it.
    ///
    /// Only a launch failure is returned as an error; anything that goes wrong
    /// once the browser is up ends up in the report.
    pub async fn launch_and_run(&self) -> E2eResult<RunReport> {
        let session = PlaywrightSession::launch(&self.config.playwright).await?;
        Ok(self.run(session).await)
    }

    /// Run the scenario on an already open session and close it afterwards
    pub async fn run<S: BrowserSession>(&self, mut session: S) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let steps = self.steps();

        // Only this run's outcome screenshot may be left in the artifact dir
        for stale in [self.success_path(), self.failure_path()] {
            remove_stale(&stale);
        }

        debug!(
            "Running {} ({} steps, budget {:?})",
            SCENARIO_NAME,
            steps.len(),
            scenario::total_budget(&steps)
        );

        let mut results = Vec::with_capacity(steps.len());
        let mut failure: Option<E2eError> = None;

        for step in &steps {
            let step_start = Instant::now();
            let outcome = step
                .execute(&mut session, self.config.timeouts.poll_interval)
                .await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => results.push(StepResult {
                    success: true,
                    step_name: step.name(),
                    duration_ms,
                    error: None,
                }),
                Err(e) => {
                    results.push(StepResult {
                        success: false,
                        step_name: step.name(),
                        duration_ms,
                        error: Some(e.to_string()),
                    });
                    failure = Some(E2eError::StepFailed {
                        step: step.name(),
                        reason: e.to_string(),
                    });
                    break; // Stop on first failure
                }
            }
        }

        let screenshot = match &failure {
            None => {
                info!("Verification script completed successfully.");
                inspect(&self.success_path())
            }
            Some(e) => {
                error!("An error occurred: {}", e);
                let path = self.failure_path();
                match session.screenshot(&path, false).await {
                    Ok(()) => inspect(&path),
                    Err(shot) => {
                        warn!("Failed to capture {}: {}", path.display(), shot);
                        None
                    }
                }
            }
        };

        if let Err(e) = session.close().await {
            warn!("Failed to close browser: {}", e);
        }

        RunReport {
            scenario: SCENARIO_NAME.to_string(),
            started_at,
            success: failure.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps: results,
            error: failure.map(|e| e.to_string()),
            screenshot,
        }
    }

    /// Write the report as pretty JSON
    pub fn write_report(&self, report: &RunReport, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(path, json)?;

        info!("Report written to: {}", path.display());
        Ok(())
    }
}

fn remove_stale(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed previous screenshot {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot remove previous screenshot {}: {}", path.display(), e),
    }
}

fn inspect(path: &Path) -> Option<ScreenshotArtifact> {
    match ScreenshotArtifact::inspect(path) {
        Ok(artifact) => {
            info!(
                "Screenshot {} ({}x{}, sha256 {})",
                artifact.path.display(),
                artifact.width,
                artifact.height,
                &artifact.sha256[..12]
            );
            Some(artifact)
        }
        Err(e) => {
            warn!("Cannot inspect screenshot {}: {}", path.display(), e);
            None
        }
    }
}
