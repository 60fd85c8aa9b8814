//! Commit path: persists images and upserts spare parts row by row
//!
//! Rows are processed strictly in input order. A part id created earlier in
//! the batch is made visible to later rows through the call-scoped key map,
//! so an in-batch duplicate updates the just-created part instead of
//! creating a second one. A failing row is recorded and the loop moves on.
//!
//! Concurrent imports over the same part id space are not serialized here;
//! two overlapping commits can interleave their reconcile-then-write steps.

use std::collections::HashMap;

use super::types::{ImportOutcome, ImportRow, RowFailure};
use crate::storage::{ImageStore, NewSparePart, PartId, PartStore, SparePartUpdate};

enum RowAction {
    Created,
    Updated,
}

/// Import every valid row, mutating `existing` (lower-cased part id ->
/// identifier) as new parts are created. Performs real writes; call once
/// per user action.
pub async fn execute_import(
    rows: &[ImportRow],
    existing: &mut HashMap<String, PartId>,
    parts: &dyn PartStore,
    images: &dyn ImageStore,
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for row in rows.iter().filter(|r| r.is_valid) {
        match import_row(row, existing, parts, images).await {
            Ok(RowAction::Created) => outcome.created += 1,
            Ok(RowAction::Updated) => outcome.updated += 1,
            Err(e) => {
                log::warn!("Row {} failed: {:#}", row.row_number, e);
                outcome.failed += 1;
                outcome.errors.push(RowFailure {
                    row_number: row.row_number,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Import finished: {} created, {} updated, {} failed",
        outcome.created,
        outcome.updated,
        outcome.failed
    );
    outcome
}

async fn import_row(
    row: &ImportRow,
    existing: &mut HashMap<String, PartId>,
    parts: &dyn PartStore,
    images: &dyn ImageStore,
) -> anyhow::Result<RowAction> {
    // Image persistence is cosmetic: a failed store never fails the row
    let image_url = match &row.image {
        Some(image) => match images.store(image, &row.part_id).await {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!(
                    "Row {}: failed to store image for {}: {:#}",
                    row.row_number,
                    row.part_id,
                    e
                );
                None
            }
        },
        None => None,
    };

    let description = compose_description(row);
    let specifications = none_if_empty(&row.technical_sheet);
    let key = row.part_id.to_lowercase();

    if let Some(id) = existing.get(&key).copied() {
        parts
            .update(
                id,
                &SparePartUpdate {
                    name: row.product_name.clone(),
                    description,
                    specifications,
                    image_url,
                },
            )
            .await?;
        Ok(RowAction::Updated)
    } else {
        let id = parts
            .create(&NewSparePart {
                part_id: row.part_id.clone(),
                name: row.product_name.clone(),
                description,
                specifications,
                price: row.base_price,
                image_url,
            })
            .await?;
        existing.insert(key, id);
        Ok(RowAction::Created)
    }
}

/// Join the optional descriptive attributes, one per line. All absent =>
/// no description.
fn compose_description(row: &ImportRow) -> Option<String> {
    let lines: Vec<&str> = [
        row.hsn_code.as_str(),
        row.use_application.as_str(),
        row.model_spec.as_str(),
        row.manufacturing_unit.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn none_if_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
