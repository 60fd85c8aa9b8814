//! Blank import template generation

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use super::types::headers;

/// Canonical column order for the import template
const TEMPLATE_COLUMNS: &[&str] = &[
    headers::PRODUCT_NAME,
    headers::PART_ID,
    headers::HSN_CODE,
    headers::USE_APPLICATION,
    headers::MODEL_SPEC,
    headers::MANUFACTURING_UNIT,
    headers::TECHNICAL_SHEET,
    headers::BASE_PRICE,
];

/// Example values shown under the header so operators see the expected
/// shapes (Base Price is written as a number separately)
const EXAMPLE_ROW: &[&str] = &[
    "Hydraulic Seal Kit",
    "SP-1001",
    "8484",
    "Boom cylinder resealing",
    "JCB 3DX",
    "Pune",
    "NBR 90 Shore A",
];

/// Build the downloadable template workbook: canonical headers plus one
/// example row.
pub fn template_workbook() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Spare Parts")?;

    for (col, name) in TEMPLATE_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (col, value) in EXAMPLE_ROW.iter().enumerate() {
        worksheet.write_string(1, col as u16, *value)?;
    }
    worksheet.write_number(1, (TEMPLATE_COLUMNS.len() - 1) as u16, 450.0)?;

    workbook
        .save_to_buffer()
        .context("Failed to serialize template workbook")
}
