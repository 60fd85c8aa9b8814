//! Row and result types for the workbook import engine

use serde::{Deserialize, Serialize};

/// Canonical column headers for the spare part workbook
pub mod headers {
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const PART_ID: &str = "Part ID";
    pub const HSN_CODE: &str = "HSN Code";
    pub const USE_APPLICATION: &str = "Use/Application";
    pub const MODEL_SPEC: &str = "Model Spec";
    pub const MANUFACTURING_UNIT: &str = "Manufacturing Unit";
    pub const TECHNICAL_SHEET: &str = "Technical Sheet";
    pub const BASE_PRICE: &str = "Base Price";
}

/// Fatal error from opening or interpreting a workbook. Nothing partial can
/// be produced when one of these occurs.
#[derive(Debug)]
pub enum ImportError {
    /// The uploaded bytes are not a readable workbook container
    InvalidContainer(String),
    /// No row within the scan window carries a "Product Name" header cell
    HeaderNotFound,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::InvalidContainer(detail) => {
                write!(f, "File is not a readable workbook: {}", detail)
            }
            ImportError::HeaderNotFound => {
                write!(f, "No header row found (expected a \"Product Name\" column)")
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// Validation error for a single field of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// An image extracted from the workbook's drawing layer.
///
/// Serialized with a base64 payload so preview JSON stays self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetImage {
    pub mime: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

/// One extracted catalog row.
///
/// `row_number` is 1-based and spreadsheet-style: the first data row under
/// the header is row 2 regardless of where the header was found, and the
/// same bytes always yield the same numbering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRow {
    pub row_number: u32,
    pub product_name: String,
    pub part_id: String,
    pub hsn_code: String,
    pub use_application: String,
    pub model_spec: String,
    pub manufacturing_unit: String,
    pub technical_sheet: String,
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<SheetImage>,
    pub is_valid: bool,
    pub errors: Vec<RowError>,
    /// Set during reconciliation; invalid rows are never classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_update: Option<bool>,
}

/// Dry-run result returned to the caller; nothing here is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResult {
    pub rows: Vec<ImportRow>,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub images_found: usize,
    pub update_count: usize,
    pub new_count: usize,
}

/// A row that failed during commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    pub row_number: u32,
    pub error: String,
}

/// Aggregate outcome of one commit call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<RowFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display() {
        let error = RowError {
            field: headers::PART_ID.to_string(),
            message: "Part ID is required".to_string(),
        };
        assert_eq!(error.to_string(), "Part ID: Part ID is required");
    }

    #[test]
    fn test_sheet_image_roundtrips_as_base64() {
        let image = SheetImage {
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3, 255],
        };

        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["bytes"], "AQID/w==");

        let back: SheetImage = serde_json::from_value(json).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_import_error_display() {
        assert!(ImportError::HeaderNotFound.to_string().contains("Product Name"));
        assert!(
            ImportError::InvalidContainer("bad magic".into())
                .to_string()
                .contains("bad magic")
        );
    }
}
