//! Selector table for the sales module
//!
//! Every element the scenario touches is named here once. Steps and
//! expectations refer to [`Element`] values, never to raw selector strings,
//! so the whole DOM contract consumed by the runner can be read off this file.

use std::fmt;

/// A locator expression understood by the Playwright selector engine.
///
/// Chained parts are joined with `>>`, so `#sales-table tr >> nth=0 >> td >> nth=2`
/// resolves the third cell of the first row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
}

impl Locator {
    /// Plain CSS selector
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// ARIA role with an accessible name, e.g. a button by its visible label
    pub fn role(role: &str, name: &str) -> Self {
        Self {
            selector: format!(r#"role={}[name="{}"]"#, role, name.replace('"', "\\\"")),
        }
    }

    /// Narrow to the n-th match (zero based)
    pub fn nth(self, index: usize) -> Self {
        Self {
            selector: format!("{} >> nth={}", self.selector, index),
        }
    }

    /// Narrow to the first match
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Descend into matches of `css` inside this locator
    pub fn descendant(self, css: &str) -> Self {
        Self {
            selector: format!("{} >> {}", self.selector, css),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}

/// Logical UI elements of the sales page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Carries the `data-app-initialized` readiness marker
    Root,
    SalesTable,
    AddSaleButton,
    FormModal,
    FormModalTitle,
    SaleType,
    Warehouse,
    /// Valued `<option>` children of the warehouse select
    WarehouseOptions,
    Category,
    CategoryOptions,
    Product,
    /// First real product option, after the placeholder
    ProductFirstChoice,
    UnitCost,
    Quantity,
    Price,
    SubmitButton,
    Alert,
    AlertMessage,
    AlertOk,
    /// Cell `n` of the first row of the sales table
    SalesCell(usize),
}

/// Visible label of the button that opens the sale form
pub const ADD_SALE_LABEL: &str = "إضافة عملية بيع";

impl Element {
    /// Elements with a fixed selector, in the order the scenario meets them
    pub const FIXED: [Element; 19] = [
        Element::Root,
        Element::SalesTable,
        Element::AddSaleButton,
        Element::FormModal,
        Element::FormModalTitle,
        Element::SaleType,
        Element::Warehouse,
        Element::WarehouseOptions,
        Element::Category,
        Element::CategoryOptions,
        Element::Product,
        Element::ProductFirstChoice,
        Element::UnitCost,
        Element::Quantity,
        Element::Price,
        Element::SubmitButton,
        Element::Alert,
        Element::AlertMessage,
        Element::AlertOk,
    ];

    pub fn locator(self) -> Locator {
        match self {
            Element::Root => Locator::css("body"),
            Element::SalesTable => Locator::css("#sales-table"),
            Element::AddSaleButton => Locator::role("button", ADD_SALE_LABEL),
            Element::FormModal => Locator::css("#form-modal"),
            Element::FormModalTitle => Locator::css("#form-modal-title"),
            Element::SaleType => Locator::css("#modal-s-type"),
            Element::Warehouse => Locator::css("#modal-s-warehouse"),
            Element::WarehouseOptions => Locator::css("#modal-s-warehouse > option[value]"),
            Element::Category => Locator::css("#modal-s-category"),
            Element::CategoryOptions => Locator::css("#modal-s-category > option[value]"),
            Element::Product => Locator::css("#modal-s-product"),
            Element::ProductFirstChoice => Locator::css("#modal-s-product > option:nth-child(2)"),
            Element::UnitCost => Locator::css("#modal-s-cost"),
            Element::Quantity => Locator::css("#modal-s-qty"),
            Element::Price => Locator::css("#modal-s-price"),
            Element::SubmitButton => Locator::css("#form-modal-submit-btn"),
            Element::Alert => Locator::css("#custom-alert"),
            Element::AlertMessage => Locator::css("#alert-message"),
            Element::AlertOk => Locator::css("#alert-ok-btn"),
            Element::SalesCell(n) => Locator::css("#sales-table tr")
                .first()
                .descendant("td")
                .nth(n),
        }
    }

    /// Short name used in step names and log lines
    pub fn name(self) -> String {
        match self {
            Element::Root => "root".into(),
            Element::SalesTable => "sales-table".into(),
            Element::AddSaleButton => "add-sale-button".into(),
            Element::FormModal => "form-modal".into(),
            Element::FormModalTitle => "form-modal-title".into(),
            Element::SaleType => "sale-type".into(),
            Element::Warehouse => "warehouse".into(),
            Element::WarehouseOptions => "warehouse-options".into(),
            Element::Category => "category".into(),
            Element::CategoryOptions => "category-options".into(),
            Element::Product => "product".into(),
            Element::ProductFirstChoice => "product-first-choice".into(),
            Element::UnitCost => "unit-cost".into(),
            Element::Quantity => "quantity".into(),
            Element::Price => "price".into(),
            Element::SubmitButton => "submit-button".into(),
            Element::Alert => "alert".into(),
            Element::AlertMessage => "alert-message".into(),
            Element::AlertOk => "alert-ok".into(),
            Element::SalesCell(n) => format!("sales-cell[{}]", n),
        }
    }
}
