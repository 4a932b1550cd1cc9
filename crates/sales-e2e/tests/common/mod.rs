//! In-process stand-in for the sales page
//!
//! `FakeApp` keeps the persistent part (recorded sales) and the observable
//! call trace; every `FakeApp::session()` is a fresh page on top of it. Option
//! lists fill in only after a few probes, like the real app's async loading.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use sales_e2e::fixtures::{Fixture, READY_ATTRIBUTE};
use sales_e2e::scenario::Timeouts;
use sales_e2e::selectors::{Element, Locator};
use sales_e2e::session::{BrowserSession, Observed, Probe, SelectBy};
use sales_e2e::{E2eError, E2eResult, RunnerConfig};

/// Probes an option list answers "not yet" before it is populated
const LOAD_DELAY_PROBES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Goto(String),
    Evaluate(String),
    Click(Element),
    Select(Element, SelectBy),
    Fill(Element, String),
    Probe(Element, Probe),
    Screenshot(PathBuf),
    Close,
}

impl Call {
    pub fn element(&self) -> Option<Element> {
        match self {
            Call::Click(e) | Call::Select(e, _) | Call::Fill(e, _) | Call::Probe(e, _) => Some(*e),
            _ => None,
        }
    }
}

/// Ways to make the page misbehave
#[derive(Debug, Clone)]
pub struct Faults {
    pub unreachable: bool,
    pub never_ready: bool,
    pub warehouse_options: usize,
    pub success_message: String,
}

impl Default for Faults {
    fn default() -> Self {
        Self {
            unreachable: false,
            never_ready: false,
            warehouse_options: 2,
            success_message: Fixture::default().success_message,
        }
    }
}

#[derive(Debug, Default)]
struct Page {
    ready_in: u32,
    ready: bool,
    sales_tab: bool,
    modal_open: bool,
    sale_type: Option<String>,
    warehouse_in: u32,
    warehouse: Option<String>,
    category_in: u32,
    category: Option<String>,
    product_in: u32,
    product: Option<String>,
    quantity: String,
    price: String,
    alert_open: bool,
}

#[derive(Debug, Default)]
pub struct AppState {
    /// Recorded sales, newest first
    pub rows: Vec<Vec<String>>,
    pub trace: Vec<Call>,
    pub closes: usize,
    pub faults: Faults,
    page: Page,
}

#[derive(Clone, Default)]
pub struct FakeApp {
    pub state: Arc<Mutex<AppState>>,
}

impl FakeApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        let app = Self::default();
        app.state.lock().faults = faults;
        app
    }

    pub fn session(&self) -> FakeSession {
        FakeSession {
            state: self.state.clone(),
        }
    }

    pub fn trace(&self) -> Vec<Call> {
        self.state.lock().trace.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.state.lock().rows.clone()
    }
}

/// Runner config writing into `dir` with short bounds
pub fn fast_config(dir: &Path) -> RunnerConfig {
    RunnerConfig {
        artifact_dir: dir.to_path_buf(),
        timeouts: Timeouts::uniform(Duration::from_millis(300), Duration::from_millis(5)),
        ..Default::default()
    }
}

fn element_of(locator: &Locator) -> Option<Element> {
    Element::FIXED
        .iter()
        .copied()
        .chain((0..8).map(Element::SalesCell))
        .find(|e| &e.locator() == locator)
}

fn not_found(locator: &Locator) -> E2eError {
    E2eError::Playwright(format!("waiting for locator('{}')", locator))
}

/// Counts down once per probe, true when the list is loaded
fn loaded(counter: &mut u32) -> bool {
    if *counter == 0 {
        true
    } else {
        *counter -= 1;
        false
    }
}

pub struct FakeSession {
    state: Arc<Mutex<AppState>>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.trace.push(Call::Goto(url.to_string()));
        if state.faults.unreachable {
            return Err(E2eError::Playwright(format!(
                "net::ERR_CONNECTION_REFUSED at {}",
                url
            )));
        }
        state.page = Page {
            ready_in: 2,
            ..Default::default()
        };
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> E2eResult<serde_json::Value> {
        let mut state = self.state.lock();
        state.trace.push(Call::Evaluate(expression.to_string()));
        if expression == "switchTab('sales')" && state.page.ready {
            state.page.sales_tab = true;
            Ok(serde_json::Value::Null)
        } else {
            Err(E2eError::Playwright("ReferenceError: switchTab is not defined".into()))
        }
    }

    async fn click(&mut self, locator: &Locator, _timeout: Duration) -> E2eResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let element = element_of(locator).ok_or_else(|| not_found(locator))?;
        state.trace.push(Call::Click(element));

        let page = &mut state.page;
        match element {
            Element::AddSaleButton if page.sales_tab => {
                page.modal_open = true;
                Ok(())
            }
            Element::SubmitButton if page.modal_open && page.product.is_some() => {
                let price = page.price.clone();
                let quantity = page.quantity.clone();
                page.alert_open = true;
                state.rows.insert(
                    0,
                    vec![
                        format!("{}", state.rows.len() + 1),
                        "2026-10-16".to_string(),
                        "لابتوب".to_string(),
                        "المستودع الرئيسي".to_string(),
                        quantity,
                        "700.00 د.أ".to_string(),
                        format!("{}.00 د.أ", price),
                    ],
                );
                Ok(())
            }
            Element::AlertOk if page.alert_open => {
                page.alert_open = false;
                page.modal_open = false;
                Ok(())
            }
            _ => Err(not_found(locator)),
        }
    }

    async fn select_option(
        &mut self,
        locator: &Locator,
        choice: &SelectBy,
        _timeout: Duration,
    ) -> E2eResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let element = element_of(locator).ok_or_else(|| not_found(locator))?;
        state.trace.push(Call::Select(element, choice.clone()));

        let fixture = Fixture::default();
        let page = &mut state.page;
        let label = |expected: &str| matches!(choice, SelectBy::Label(l) if l == expected);

        match element {
            Element::SaleType
                if page.modal_open && *choice == SelectBy::Value(fixture.sale_type.clone()) =>
            {
                page.sale_type = Some("product".into());
                page.warehouse_in = LOAD_DELAY_PROBES;
            }
            Element::Warehouse
                if page.sale_type.is_some()
                    && page.warehouse_in == 0
                    && label(&fixture.warehouse_label) =>
            {
                page.warehouse = Some(fixture.warehouse_label.clone());
                page.category_in = LOAD_DELAY_PROBES;
            }
            Element::Category
                if page.warehouse.is_some()
                    && page.category_in == 0
                    && label(&fixture.category_label) =>
            {
                page.category = Some(fixture.category_label.clone());
                page.product_in = LOAD_DELAY_PROBES;
            }
            Element::Product
                if page.category.is_some()
                    && page.product_in == 0
                    && label(&fixture.product_label) =>
            {
                page.product = Some(fixture.product_label.clone());
            }
            _ => {
                return Err(E2eError::Playwright(format!(
                    "did not find some options for locator('{}')",
                    locator
                )))
            }
        }
        Ok(())
    }

    async fn fill(&mut self, locator: &Locator, value: &str, _timeout: Duration) -> E2eResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let element = element_of(locator).ok_or_else(|| not_found(locator))?;
        state.trace.push(Call::Fill(element, value.to_string()));

        let page = &mut state.page;
        match element {
            Element::Quantity if page.modal_open => page.quantity = value.to_string(),
            Element::Price if page.modal_open => page.price = value.to_string(),
            _ => return Err(not_found(locator)),
        }
        Ok(())
    }

    async fn probe(&mut self, locator: &Locator, probe: &Probe) -> E2eResult<Observed> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let element = element_of(locator).ok_or_else(|| not_found(locator))?;
        state.trace.push(Call::Probe(element, probe.clone()));

        let faults = state.faults.clone();
        let fixture = Fixture::default();
        let first_row = state.rows.first().cloned();
        let page = &mut state.page;

        let observed = match (element, probe) {
            (Element::Root, Probe::Attribute(name)) if name == READY_ATTRIBUTE => {
                if !faults.never_ready && loaded(&mut page.ready_in) {
                    page.ready = true;
                }
                if page.ready {
                    Observed::Text("true".into())
                } else {
                    Observed::Missing
                }
            }
            (Element::SalesTable, Probe::Visible) => Observed::Flag(page.sales_tab),
            (Element::FormModal, Probe::Visible) => Observed::Flag(page.modal_open),
            (Element::FormModalTitle, Probe::Text) if page.modal_open => {
                Observed::Text(fixture.modal_title)
            }
            (Element::WarehouseOptions, Probe::Count) => {
                if page.sale_type.is_some() && loaded(&mut page.warehouse_in) {
                    Observed::Count(faults.warehouse_options)
                } else {
                    Observed::Count(0)
                }
            }
            (Element::CategoryOptions, Probe::Count) => {
                if page.warehouse.is_some() && loaded(&mut page.category_in) {
                    Observed::Count(2)
                } else {
                    Observed::Count(0)
                }
            }
            (Element::ProductFirstChoice, Probe::Enabled) => {
                Observed::Flag(page.category.is_some() && loaded(&mut page.product_in))
            }
            (Element::UnitCost, Probe::Value) => {
                if page.product.is_some() {
                    Observed::Text(fixture.unit_cost)
                } else {
                    Observed::Text(String::new())
                }
            }
            (Element::Alert, Probe::Visible) => Observed::Flag(page.alert_open),
            (Element::AlertMessage, Probe::Text) if page.alert_open => {
                Observed::Text(faults.success_message)
            }
            (Element::SalesCell(n), Probe::Text) => first_row
                .and_then(|row| row.get(n).cloned())
                .map(Observed::Text)
                .unwrap_or(Observed::Missing),
            _ => Observed::Missing,
        };
        Ok(observed)
    }

    async fn screenshot(&mut self, path: &Path, _full_page: bool) -> E2eResult<()> {
        self.state.lock().trace.push(Call::Screenshot(path.to_path_buf()));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        RgbaImage::from_pixel(8, 6, Rgba([255, 255, 255, 255])).save(path)?;
        Ok(())
    }

    async fn close(self) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.trace.push(Call::Close);
        state.closes += 1;
        Ok(())
    }
}
