//! Error types for the verification runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Bridge error: {0}")]
    Bridge(String),

    #[error("Bridge process exited unexpectedly")]
    BridgeClosed,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Timeout {timeout_ms}ms exceeded waiting for {what} (last observed: {last})")]
    Timeout {
        what: String,
        timeout_ms: u64,
        last: String,
    },

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type E2eResult<T> = Result<T, E2eError>;
