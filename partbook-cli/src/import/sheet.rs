//! Tabular extraction from the worksheet grid
//!
//! Locates the header row by content, builds a flexible column lookup and
//! materializes typed row records. Only the first sheet is read.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use super::types::{ImportError, ImportRow, SheetImage, headers};
use super::validate::parse_base_price;

/// How many leading grid rows are scanned for the header
const HEADER_SCAN_LIMIT: usize = 10;

/// Extract catalog rows from workbook bytes, attaching images from the
/// drawing layer by grid position.
///
/// `images` is keyed by 0-based grid row; a data row at offset `i` below
/// the header picks up the image anchored at grid row `header + 1 + i`.
pub fn extract_rows(
    bytes: &[u8],
    images: &HashMap<u32, SheetImage>,
) -> Result<Vec<ImportRow>, ImportError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ImportError::InvalidContainer(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::InvalidContainer("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::InvalidContainer(e.to_string()))?;

    // Range coordinates are relative to the first non-empty cell, while
    // anchor rows from the drawing layer are absolute grid rows
    let base = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    let header_row = find_header_row(&rows, base).ok_or(ImportError::HeaderNotFound)?;
    let columns = ColumnMap::from_header(&rows[header_row]);

    let mut records = Vec::new();
    for (offset, row) in rows.iter().skip(header_row + 1).enumerate() {
        let product_name = columns.text(row, headers::PRODUCT_NAME);
        let part_id = columns.text(row, headers::PART_ID);

        // Rows with neither identifying field are padding, not data
        if product_name.is_empty() && part_id.is_empty() {
            continue;
        }

        let grid_row = (base + header_row + 1 + offset) as u32;
        records.push(ImportRow {
            row_number: (offset + 2) as u32,
            product_name,
            part_id,
            hsn_code: columns.text(row, headers::HSN_CODE),
            use_application: columns.text(row, headers::USE_APPLICATION),
            model_spec: columns.text(row, headers::MODEL_SPEC),
            manufacturing_unit: columns.text(row, headers::MANUFACTURING_UNIT),
            technical_sheet: columns.text(row, headers::TECHNICAL_SHEET),
            base_price: parse_base_price(&columns.text(row, headers::BASE_PRICE)),
            image: images.get(&grid_row).cloned(),
            is_valid: false,
            errors: Vec::new(),
            is_update: None,
        });
    }

    Ok(records)
}

/// The header is the first row whose cell text mentions the product name
/// column; position is never assumed. The scan window counts absolute grid
/// rows, so leading blank rows consume part of it.
fn find_header_row(rows: &[Vec<Data>], base: usize) -> Option<usize> {
    rows.iter().take(HEADER_SCAN_LIMIT.saturating_sub(base)).position(|row| {
        row.iter()
            .any(|cell| cell_text(cell).trim().to_lowercase().contains("product name"))
    })
}

/// Column-name lookup built from the header row. Exact header text wins;
/// otherwise a case-insensitive match is accepted. Blank header cells are
/// ignored.
struct ColumnMap {
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Self {
        let mut exact = HashMap::new();
        let mut folded = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            let name = cell_text(cell);
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            exact.entry(name.to_string()).or_insert(idx);
            folded.entry(name.to_lowercase()).or_insert(idx);
        }
        ColumnMap { exact, folded }
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.exact
            .get(name)
            .or_else(|| self.folded.get(&name.to_lowercase()))
            .copied()
    }

    /// Trimmed cell text for the named column; empty when the column is
    /// absent from the sheet
    fn text(&self, row: &[Data], name: &str) -> String {
        self.index(name)
            .and_then(|idx| row.get(idx))
            .map(|cell| cell_text(cell).trim().to_string())
            .unwrap_or_default()
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole floats render without the trailing .0
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// Build workbook bytes with string cells laid out exactly as given
    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    const HEADER: &[&str] = &["Product Name", "Part ID", "HSN Code", "Base Price"];

    #[test]
    fn test_extracts_rows_below_header() {
        let bytes = workbook_bytes(&[
            HEADER,
            &["Seal Kit", "SP-1", "8484", "450"],
            &["Filter", "SP-2", "", "99.5"],
        ]);

        let rows = extract_rows(&bytes, &HashMap::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].product_name, "Seal Kit");
        assert_eq!(rows[0].part_id, "SP-1");
        assert_eq!(rows[0].base_price, 450.0);
        assert_eq!(rows[1].row_number, 3);
        assert_eq!(rows[1].base_price, 99.5);
    }

    #[test]
    fn test_header_found_by_content_not_position() {
        // Header sits at grid row 3 below a title block; numbering restarts
        // below it so the first data row is still row 2
        let bytes = workbook_bytes(&[
            &["Spare Part Upload"],
            &[],
            &["Fill in every column"],
            HEADER,
            &["Seal Kit", "SP-1"],
        ]);

        let rows = extract_rows(&bytes, &HashMap::new()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].product_name, "Seal Kit");
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let bytes = workbook_bytes(&[&["Name", "Code"], &["Seal Kit", "SP-1"]]);
        let result = extract_rows(&bytes, &HashMap::new());
        assert!(matches!(result, Err(ImportError::HeaderNotFound)));
    }

    #[test]
    fn test_blank_rows_are_dropped_entirely() {
        let bytes = workbook_bytes(&[
            HEADER,
            &["Seal Kit", "SP-1"],
            &["", "", "8484", "100"], // no name and no part id: padding
            &["Filter", "SP-2"],
        ]);

        let rows = extract_rows(&bytes, &HashMap::new()).unwrap();
        assert_eq!(rows.len(), 2);
        // Numbering counts the skipped grid row
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 4);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let bytes = workbook_bytes(&[
            &["PRODUCT NAME", "part id", "hsn code"],
            &["Seal Kit", "SP-1", "8484"],
        ]);

        let rows = extract_rows(&bytes, &HashMap::new()).unwrap();
        assert_eq!(rows[0].product_name, "Seal Kit");
        assert_eq!(rows[0].part_id, "SP-1");
        assert_eq!(rows[0].hsn_code, "8484");
        // Columns absent from the sheet resolve to empty
        assert_eq!(rows[0].model_spec, "");
    }

    #[test]
    fn test_unparseable_price_defaults_to_zero() {
        let bytes = workbook_bytes(&[HEADER, &["Seal Kit", "SP-1", "", "call us"]]);
        let rows = extract_rows(&bytes, &HashMap::new()).unwrap();
        assert_eq!(rows[0].base_price, 0.0);
    }

    #[test]
    fn test_image_attached_by_grid_position() {
        // Header at grid row 1; data rows at grid rows 2 and 3
        let bytes = workbook_bytes(&[
            &["Upload"],
            HEADER,
            &["Seal Kit", "SP-1"],
            &["Filter", "SP-2"],
        ]);
        let images = HashMap::from([(
            3u32,
            SheetImage {
                mime: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            },
        )]);

        let rows = extract_rows(&bytes, &images).unwrap();
        assert!(rows[0].image.is_none());
        let image = rows[1].image.as_ref().unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_leading_blank_grid_rows_keep_image_pairing() {
        // Nothing is written above grid row 2, so the sheet range starts
        // there; anchor rows stay absolute
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(2, 0, "Product Name").unwrap();
        worksheet.write_string(2, 1, "Part ID").unwrap();
        worksheet.write_string(3, 0, "Seal Kit").unwrap();
        worksheet.write_string(3, 1, "SP-1").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let images = HashMap::from([(
            3u32,
            SheetImage {
                mime: "image/png".to_string(),
                bytes: vec![7],
            },
        )]);

        let rows = extract_rows(&bytes, &images).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].image.as_ref().unwrap().bytes, vec![7]);
    }

    #[test]
    fn test_non_zip_bytes_are_invalid_container() {
        let result = extract_rows(b"not an xlsx", &HashMap::new());
        assert!(matches!(result, Err(ImportError::InvalidContainer(_))));
    }
}
