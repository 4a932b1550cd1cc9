//! Auto-waiting assertions
//!
//! An [`Expectation`] is polled against a [`BrowserSession`] until it holds or
//! its timeout runs out. All string comparisons are exact: no trimming, no
//! whitespace folding.

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use crate::error::{E2eError, E2eResult};
use crate::selectors::Element;
use crate::session::{BrowserSession, Observed, Probe};

/// Default interval between probes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Attribute { name: String, value: String },
    Visible,
    /// Satisfied by an invisible element or by no element at all
    Hidden,
    Text(String),
    Count(usize),
    Enabled,
    Value(String),
}

impl Condition {
    pub fn probe(&self) -> Probe {
        match self {
            Condition::Attribute { name, .. } => Probe::Attribute(name.clone()),
            Condition::Visible | Condition::Hidden => Probe::Visible,
            Condition::Text(_) => Probe::Text,
            Condition::Count(_) => Probe::Count,
            Condition::Enabled => Probe::Enabled,
            Condition::Value(_) => Probe::Value,
        }
    }

    pub fn is_met(&self, observed: &Observed) -> bool {
        match (self, observed) {
            (Condition::Attribute { value, .. }, Observed::Text(actual)) => actual == value,
            (Condition::Visible, Observed::Flag(visible)) => *visible,
            (Condition::Hidden, Observed::Flag(visible)) => !*visible,
            (Condition::Hidden, Observed::Missing) => true,
            (Condition::Text(expected), Observed::Text(actual)) => actual == expected,
            (Condition::Count(expected), Observed::Count(actual)) => actual == expected,
            (Condition::Enabled, Observed::Flag(enabled)) => *enabled,
            (Condition::Value(expected), Observed::Text(actual)) => actual == expected,
            _ => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Attribute { name, value } => write!(f, "attribute {}={:?}", name, value),
            Condition::Visible => f.write_str("visible"),
            Condition::Hidden => f.write_str("hidden"),
            Condition::Text(text) => write!(f, "text {:?}", text),
            Condition::Count(n) => write!(f, "count {}", n),
            Condition::Enabled => f.write_str("enabled"),
            Condition::Value(value) => write!(f, "value {:?}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub element: Element,
    pub condition: Condition,
}

impl Expectation {
    pub fn new(element: Element, condition: Condition) -> Self {
        Self { element, condition }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to be {}", self.element.name(), self.condition)
    }
}

/// Poll until `expectation` holds. The element is probed at least once even
/// with a zero timeout.
pub async fn wait_for<S: BrowserSession>(
    session: &mut S,
    expectation: &Expectation,
    timeout: Duration,
    poll_interval: Duration,
) -> E2eResult<()> {
    let locator = expectation.element.locator();
    let probe = expectation.condition.probe();
    let deadline = Instant::now() + timeout;
    let mut polls = 0u32;

    loop {
        let observed = session.probe(&locator, &probe).await?;
        polls += 1;
        trace!("Probe {} -> {}", expectation, observed);

        if expectation.condition.is_met(&observed) {
            debug!("Expectation met after {} probe(s): {}", polls, expectation);
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(E2eError::Timeout {
                what: expectation.to_string(),
                timeout_ms: timeout.as_millis() as u64,
                last: observed.to_string(),
            });
        }

        sleep(poll_interval.min(deadline - now)).await;
    }
}
