//! The record-sale scenario as an ordered list of steps

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::E2eResult;
use crate::expect::{self, Condition, Expectation, DEFAULT_POLL_INTERVAL};
use crate::fixtures::{Fixture, READY_ATTRIBUTE};
use crate::selectors::Element;
use crate::session::{BrowserSession, SelectBy};

pub const SCENARIO_NAME: &str = "record-sale";

/// Bounds for every suspension point of the scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Page load until network idle
    pub navigation: Duration,
    /// Application readiness marker
    pub readiness: Duration,
    /// Sales table after the tab switch, warehouse options
    pub long_wait: Duration,
    /// Every other expectation
    pub short_wait: Duration,
    /// Click, select and fill
    pub action: Duration,
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(15),
            readiness: Duration::from_secs(15),
            long_wait: Duration::from_secs(10),
            short_wait: Duration::from_secs(5),
            action: Duration::from_secs(10),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Timeouts {
    /// Same bound everywhere; handy for fast fakes
    pub fn uniform(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            navigation: timeout,
            readiness: timeout,
            long_wait: timeout,
            short_wait: timeout,
            action: timeout,
            poll_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Navigate {
        url: String,
        timeout: Duration,
    },
    Expect {
        expectation: Expectation,
        timeout: Duration,
    },
    Evaluate {
        script: String,
    },
    Click {
        element: Element,
        timeout: Duration,
    },
    Select {
        element: Element,
        choice: SelectBy,
        timeout: Duration,
    },
    Fill {
        element: Element,
        value: String,
        timeout: Duration,
    },
    Screenshot {
        path: PathBuf,
        full_page: bool,
    },
}

impl Step {
    fn expect(element: Element, condition: Condition, timeout: Duration) -> Self {
        Step::Expect {
            expectation: Expectation::new(element, condition),
            timeout,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Step::Navigate { url, .. } => format!("navigate:{}", url),
            Step::Expect { expectation, .. } => format!("expect:{}", expectation),
            Step::Evaluate { script } => format!("evaluate:{}", script),
            Step::Click { element, .. } => format!("click:{}", element.name()),
            Step::Select { element, .. } => format!("select:{}", element.name()),
            Step::Fill { element, .. } => format!("fill:{}", element.name()),
            Step::Screenshot { path, .. } => format!("screenshot:{}", path.display()),
        }
    }

    /// Longest this step may suspend; zero for steps without their own bound
    pub fn timeout(&self) -> Duration {
        match self {
            Step::Navigate { timeout, .. }
            | Step::Expect { timeout, .. }
            | Step::Click { timeout, .. }
            | Step::Select { timeout, .. }
            | Step::Fill { timeout, .. } => *timeout,
            Step::Evaluate { .. } | Step::Screenshot { .. } => Duration::ZERO,
        }
    }

    pub async fn execute<S: BrowserSession>(
        &self,
        session: &mut S,
        poll_interval: Duration,
    ) -> E2eResult<()> {
        debug!("Executing step: {}", self.name());

        match self {
            Step::Navigate { url, timeout } => session.goto(url, *timeout).await,
            Step::Expect {
                expectation,
                timeout,
            } => expect::wait_for(session, expectation, *timeout, poll_interval).await,
            Step::Evaluate { script } => session.evaluate(script).await.map(|_| ()),
            Step::Click { element, timeout } => session.click(&element.locator(), *timeout).await,
            Step::Select {
                element,
                choice,
                timeout,
            } => {
                session
                    .select_option(&element.locator(), choice, *timeout)
                    .await
            }
            Step::Fill {
                element,
                value,
                timeout,
            } => session.fill(&element.locator(), value, *timeout).await,
            Step::Screenshot { path, full_page } => session.screenshot(path, *full_page).await,
        }
    }
}

/// Build the record-sale scenario.
///
/// Each dependent select is preceded by an expectation on its options, so a
/// select is never touched before the previous selection has populated it.
pub fn record_sale(
    url: &str,
    fixture: &Fixture,
    timeouts: &Timeouts,
    success_screenshot: &Path,
) -> Vec<Step> {
    let row = &fixture.row;

    vec![
        Step::Navigate {
            url: url.to_string(),
            timeout: timeouts.navigation,
        },
        Step::expect(
            Element::Root,
            Condition::Attribute {
                name: READY_ATTRIBUTE.to_string(),
                value: fixture.ready_value.clone(),
            },
            timeouts.readiness,
        ),
        // Sales tab
        Step::Evaluate {
            script: fixture.switch_tab_script.clone(),
        },
        Step::expect(Element::SalesTable, Condition::Visible, timeouts.long_wait),
        // Add-sale modal
        Step::Click {
            element: Element::AddSaleButton,
            timeout: timeouts.action,
        },
        Step::expect(
            Element::FormModalTitle,
            Condition::Text(fixture.modal_title.clone()),
            timeouts.short_wait,
        ),
        // Cascading selects
        Step::Select {
            element: Element::SaleType,
            choice: SelectBy::Value(fixture.sale_type.clone()),
            timeout: timeouts.action,
        },
        Step::expect(
            Element::WarehouseOptions,
            Condition::Count(fixture.warehouse_option_count),
            timeouts.long_wait,
        ),
        Step::Select {
            element: Element::Warehouse,
            choice: SelectBy::Label(fixture.warehouse_label.clone()),
            timeout: timeouts.action,
        },
        Step::expect(
            Element::CategoryOptions,
            Condition::Count(fixture.category_option_count),
            timeouts.short_wait,
        ),
        Step::Select {
            element: Element::Category,
            choice: SelectBy::Label(fixture.category_label.clone()),
            timeout: timeouts.action,
        },
        Step::expect(
            Element::ProductFirstChoice,
            Condition::Enabled,
            timeouts.short_wait,
        ),
        Step::Select {
            element: Element::Product,
            choice: SelectBy::Label(fixture.product_label.clone()),
            timeout: timeouts.action,
        },
        Step::expect(
            Element::UnitCost,
            Condition::Value(fixture.unit_cost.clone()),
            timeouts.short_wait,
        ),
        Step::Fill {
            element: Element::Quantity,
            value: fixture.quantity.clone(),
            timeout: timeouts.action,
        },
        Step::Fill {
            element: Element::Price,
            value: fixture.price.clone(),
            timeout: timeouts.action,
        },
        Step::Click {
            element: Element::SubmitButton,
            timeout: timeouts.action,
        },
        // Confirmation
        Step::expect(Element::Alert, Condition::Visible, timeouts.short_wait),
        Step::expect(
            Element::AlertMessage,
            Condition::Text(fixture.success_message.clone()),
            timeouts.short_wait,
        ),
        Step::Click {
            element: Element::AlertOk,
            timeout: timeouts.action,
        },
        Step::expect(Element::FormModal, Condition::Hidden, timeouts.short_wait),
        // New row on top of the table
        Step::expect(
            Element::SalesCell(row.product_cell),
            Condition::Text(row.product.clone()),
            timeouts.short_wait,
        ),
        Step::expect(
            Element::SalesCell(row.quantity_cell),
            Condition::Text(row.quantity.clone()),
            timeouts.short_wait,
        ),
        Step::expect(
            Element::SalesCell(row.amount_cell),
            Condition::Text(row.amount.clone()),
            timeouts.short_wait,
        ),
        Step::Screenshot {
            path: success_screenshot.to_path_buf(),
            full_page: true,
        },
    ]
}

/// Sum of all step bounds
pub fn total_budget(steps: &[Step]) -> Duration {
    steps.iter().map(Step::timeout).sum()
}
