//! Wire format between the runner and the Node.js Playwright bridge
//!
//! Newline-delimited JSON in both directions. Each request carries an `id`
//! which the bridge echoes in its reply; requests are handled strictly in
//! order, one at a time.

use serde::{Deserialize, Serialize};

use crate::session::{Probe, SelectBy};

#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Launch {
        browser: String,
        headless: bool,
        width: u32,
        height: u32,
    },
    Goto {
        url: String,
        wait_until: String,
        timeout_ms: u64,
    },
    Evaluate {
        expression: String,
    },
    Click {
        selector: String,
        timeout_ms: u64,
    },
    Select {
        selector: String,
        choice: SelectBy,
        timeout_ms: u64,
    },
    Fill {
        selector: String,
        value: String,
        timeout_ms: u64,
    },
    Probe {
        selector: String,
        probe: Probe,
    },
    Screenshot {
        path: String,
        full_page: bool,
    },
    Close,
}

impl Command {
    pub fn op(&self) -> &'static str {
        match self {
            Command::Launch { .. } => "launch",
            Command::Goto { .. } => "goto",
            Command::Evaluate { .. } => "evaluate",
            Command::Click { .. } => "click",
            Command::Select { .. } => "select",
            Command::Fill { .. } => "fill",
            Command::Probe { .. } => "probe",
            Command::Screenshot { .. } => "screenshot",
            Command::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reply {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}
