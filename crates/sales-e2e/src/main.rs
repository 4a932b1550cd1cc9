//! Sales module verification entry point
//!
//! Runs the record-sale scenario against a locally served app.
//! Run with: cargo run --package sales-e2e --bin verify-sales-module

use std::path::PathBuf;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sales_e2e::fixtures::TARGET_URL;
use sales_e2e::playwright::{Browser, PlaywrightConfig};
use sales_e2e::{E2eResult, RunnerConfig, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "verify-sales-module")]
#[command(about = "Verify the record-sale workflow in a headless browser")]
struct Args {
    /// Page to open, including the test bypass flag
    #[arg(long, default_value = TARGET_URL)]
    url: String,

    /// Directory receiving verification.png / error.png
    #[arg(long, default_value = "jules-scratch/verification")]
    artifact_dir: PathBuf,

    /// Browser engine
    #[arg(long, value_enum, default_value = "chromium")]
    browser: Browser,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    viewport_height: u32,

    /// Node.js executable used for the Playwright bridge
    #[arg(long, default_value = "node")]
    node: PathBuf,

    /// Also write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    // A finished run exits 0 whether it passed or failed; the screenshot and
    // the log carry the verdict.
    if let Err(e) = rt.block_on(async_main(args)) {
        error!("Could not start the browser: {}", e);
        std::process::exit(1);
    }
}

async fn async_main(args: Args) -> E2eResult<()> {
    let config = RunnerConfig {
        url: args.url,
        artifact_dir: args.artifact_dir,
        playwright: PlaywrightConfig {
            node: args.node,
            browser: args.browser,
            headless: !args.headed,
            viewport_width: args.viewport_width,
            viewport_height: args.viewport_height,
            ..Default::default()
        },
        ..Default::default()
    };

    let runner = ScenarioRunner::with_config(config);
    let report = runner.launch_and_run().await?;

    if let Some(path) = args.report {
        if let Err(e) = runner.write_report(&report, &path) {
            error!("Failed to write report: {}", e);
        }
    }

    Ok(())
}
