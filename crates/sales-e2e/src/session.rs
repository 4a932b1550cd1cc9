//! Browser session abstraction
//!
//! The runner only needs a handful of primitives from a browser: navigate,
//! act on an element, observe an element, take a screenshot and close.
//! Waiting semantics live in [`crate::expect`], on top of [`BrowserSession::probe`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::E2eResult;
use crate::selectors::Locator;

/// What to read from an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Probe {
    Attribute(String),
    Count,
    Visible,
    Enabled,
    /// Current value of an input or select
    Value,
    /// Raw text content (`textContent`), whitespace untouched
    Text,
}

/// Result of a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    /// No element matched, or the attribute is absent
    Missing,
    Text(String),
    Count(usize),
    Flag(bool),
}

impl Observed {
    /// Decode a bridge reply value
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Observed::Missing,
            serde_json::Value::Bool(b) => Observed::Flag(*b),
            serde_json::Value::Number(n) => Observed::Count(n.as_u64().unwrap_or(0) as usize),
            serde_json::Value::String(s) => Observed::Text(s.clone()),
            other => Observed::Text(other.to_string()),
        }
    }
}

impl std::fmt::Display for Observed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Observed::Missing => f.write_str("<missing>"),
            Observed::Text(s) => write!(f, "{:?}", s),
            Observed::Count(n) => write!(f, "{} element(s)", n),
            Observed::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// How to pick an `<option>` in a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectBy {
    Value(String),
    Label(String),
}

/// One exclusively owned browser page
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate and wait for the network to go idle
    async fn goto(&mut self, url: &str, timeout: Duration) -> E2eResult<()>;

    /// Evaluate a JavaScript expression in the page
    async fn evaluate(&mut self, expression: &str) -> E2eResult<serde_json::Value>;

    async fn click(&mut self, locator: &Locator, timeout: Duration) -> E2eResult<()>;

    async fn select_option(
        &mut self,
        locator: &Locator,
        choice: &SelectBy,
        timeout: Duration,
    ) -> E2eResult<()>;

    async fn fill(&mut self, locator: &Locator, value: &str, timeout: Duration) -> E2eResult<()>;

    /// Read the current state of an element without waiting
    async fn probe(&mut self, locator: &Locator, probe: &Probe) -> E2eResult<Observed>;

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> E2eResult<()>;

    /// Release the browser. Consumes the session so it can only happen once.
    async fn close(self) -> E2eResult<()>;
}
