//! Per-row validation
//!
//! Validation never aborts the batch: a failing row is flagged and reported
//! alongside the rest of the preview.

use super::types::{ImportRow, RowError, headers};

/// Enforce required fields on a row, setting `is_valid` and the ordered
/// error list in place.
pub fn validate_row(row: &mut ImportRow) {
    let mut errors = Vec::new();

    if row.product_name.trim().is_empty() {
        errors.push(RowError {
            field: headers::PRODUCT_NAME.to_string(),
            message: "Product Name is required".to_string(),
        });
    }
    if row.part_id.trim().is_empty() {
        errors.push(RowError {
            field: headers::PART_ID.to_string(),
            message: "Part ID is required".to_string(),
        });
    }

    row.is_valid = errors.is_empty();
    row.errors = errors;
}

/// Parse a price cell. An unparseable price falls back to 0.0 rather than
/// blocking the row; price is not a required field.
// TODO: surface zero-defaulted prices in the preview so operators can catch typos
pub fn parse_base_price(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(product_name: &str, part_id: &str) -> ImportRow {
        ImportRow {
            row_number: 2,
            product_name: product_name.to_string(),
            part_id: part_id.to_string(),
            hsn_code: String::new(),
            use_application: String::new(),
            model_spec: String::new(),
            manufacturing_unit: String::new(),
            technical_sheet: String::new(),
            base_price: 0.0,
            image: None,
            is_valid: false,
            errors: Vec::new(),
            is_update: None,
        }
    }

    #[test]
    fn test_valid_when_both_required_fields_present() {
        let mut r = row("Seal Kit", "SP-1");
        validate_row(&mut r);
        assert!(r.is_valid);
        assert!(r.errors.is_empty());
    }

    #[test]
    fn test_missing_product_name() {
        let mut r = row("   ", "SP-1");
        validate_row(&mut r);
        assert!(!r.is_valid);
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].field, headers::PRODUCT_NAME);
        assert_eq!(r.errors[0].message, "Product Name is required");
    }

    #[test]
    fn test_missing_part_id() {
        let mut r = row("Seal Kit", "");
        validate_row(&mut r);
        assert!(!r.is_valid);
        assert_eq!(r.errors[0].field, headers::PART_ID);
    }

    #[test]
    fn test_both_missing_reports_both_in_order() {
        let mut r = row("", "");
        validate_row(&mut r);
        assert_eq!(r.errors.len(), 2);
        assert_eq!(r.errors[0].field, headers::PRODUCT_NAME);
        assert_eq!(r.errors[1].field, headers::PART_ID);
    }

    #[test]
    fn test_validity_is_independent_of_image() {
        let mut r = row("Seal Kit", "SP-1");
        r.image = None;
        validate_row(&mut r);
        assert!(r.is_valid);
    }

    #[test]
    fn test_price_parse_defaults_to_zero() {
        assert_eq!(parse_base_price("450"), 450.0);
        assert_eq!(parse_base_price(" 99.5 "), 99.5);
        assert_eq!(parse_base_price(""), 0.0);
        assert_eq!(parse_base_price("call us"), 0.0);
    }
}
