//! Sales module verification
//!
//! Drives a headless browser through the "record sale" workflow of the
//! inventory web app and checks the resulting page state:
//! - Playwright is controlled through a Node.js bridge speaking JSON lines
//! - Elements are addressed through one selector table
//! - Every wait is bounded and polled from Rust
//! - A screenshot is left behind on success and on failure
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ScenarioRunner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  scenario::record_sale() -> Vec<Step>                       │
//! │    ├── navigate { url }                                     │
//! │    ├── expect { element, condition, timeout }               │
//! │    ├── evaluate { script }                                  │
//! │    ├── click / select / fill { element }                    │
//! │    └── screenshot { path }                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BrowserSession (trait)                                     │
//! │    └── PlaywrightSession ── stdin/stdout ── node bridge.js  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Running the scenario creates a new sale in the application's store every
//! time; it is not idempotent.

pub mod artifact;
pub mod error;
pub mod expect;
pub mod fixtures;
pub mod playwright;
pub mod protocol;
pub mod runner;
pub mod scenario;
pub mod selectors;
pub mod session;

pub use error::{E2eError, E2eResult};
pub use runner::{RunReport, RunnerConfig, ScenarioRunner};
pub use session::BrowserSession;
