//! Dry-run preview: extraction, validation and create-vs-update
//! reconciliation
//!
//! Everything here is side-effect free; the same bytes can be previewed any
//! number of times before a commit.

use std::collections::HashSet;

use super::container::WorkbookContainer;
use super::drawing;
use super::sheet;
use super::types::{ImportError, ImportRow, PreviewResult};
use super::validate;

/// Parse workbook bytes into validated rows plus the resolved image count.
///
/// Fatal outcomes are an unreadable container or a missing header row;
/// everything else degrades per row or per image.
pub fn parse_workbook(bytes: &[u8]) -> Result<(Vec<ImportRow>, usize), ImportError> {
    let mut container = WorkbookContainer::open(bytes)?;
    let images = drawing::extract_row_images(&mut container);
    let images_found = images.len();

    let mut rows = sheet::extract_rows(bytes, &images)?;
    for row in &mut rows {
        validate::validate_row(row);
    }

    Ok((rows, images_found))
}

/// Classify each valid row as new or update against the existing key set
/// (lower-cased part ids) and aggregate the batch counts. Invalid rows are
/// left unclassified and excluded from both counts.
pub fn reconcile(
    mut rows: Vec<ImportRow>,
    existing_keys: &HashSet<String>,
    images_found: usize,
) -> PreviewResult {
    let mut update_count = 0;
    let mut new_count = 0;

    for row in &mut rows {
        if !row.is_valid {
            continue;
        }
        let is_update = existing_keys.contains(&row.part_id.to_lowercase());
        row.is_update = Some(is_update);
        if is_update {
            update_count += 1;
        } else {
            new_count += 1;
        }
    }

    let total_rows = rows.len();
    let valid_rows = rows.iter().filter(|r| r.is_valid).count();

    PreviewResult {
        total_rows,
        valid_rows,
        invalid_rows: total_rows - valid_rows,
        images_found,
        update_count,
        new_count,
        rows,
    }
}

/// Full preview over uploaded bytes
pub fn build_preview(
    bytes: &[u8],
    existing_keys: &HashSet<String>,
) -> Result<PreviewResult, ImportError> {
    let (rows, images_found) = parse_workbook(bytes)?;
    Ok(reconcile(rows, existing_keys, images_found))
}
