//! Expected values for the record-sale scenario
//!
//! These are literal fixtures of the application build under test. The
//! Arabic labels and the `850.00 د.أ` currency rendering are compared
//! byte for byte and are not meant to be localized or derived.

use serde::{Deserialize, Serialize};

/// Application entry point; `testing=true` makes the app skip its login screen
pub const TARGET_URL: &str = "http://localhost:8000/index.html?testing=true";

/// Attribute the app sets on `<body>` once its own startup has finished
pub const READY_ATTRIBUTE: &str = "data-app-initialized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub ready_value: String,
    pub switch_tab_script: String,
    pub modal_title: String,
    pub sale_type: String,
    pub warehouse_option_count: usize,
    pub warehouse_label: String,
    pub category_option_count: usize,
    pub category_label: String,
    pub product_label: String,
    pub unit_cost: String,
    pub quantity: String,
    pub price: String,
    pub success_message: String,
    pub row: ExpectedRow,
}

/// The new sale as rendered in the first row of the sales table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRow {
    pub product_cell: usize,
    pub product: String,
    pub quantity_cell: usize,
    pub quantity: String,
    pub amount_cell: usize,
    pub amount: String,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            ready_value: "true".to_string(),
            switch_tab_script: "switchTab('sales')".to_string(),
            modal_title: "تسجيل عملية بيع".to_string(),
            sale_type: "product".to_string(),
            warehouse_option_count: 2,
            warehouse_label: "المستودع الرئيسي".to_string(),
            category_option_count: 2,
            category_label: "الكترونيات".to_string(),
            product_label: "لابتوب (المتاح: 5)".to_string(),
            unit_cost: "700".to_string(),
            quantity: "1".to_string(),
            price: "850".to_string(),
            success_message: "تم تسجيل عملية البيع بنجاح!".to_string(),
            row: ExpectedRow {
                product_cell: 2,
                product: "لابتوب".to_string(),
                quantity_cell: 4,
                quantity: "1".to_string(),
                amount_cell: 6,
                amount: "850.00 د.أ".to_string(),
            },
        }
    }
}
