//! Drawing anchor extraction
//!
//! Parses the drawing part for two-corner picture anchors and resolves each
//! to its embedded media blob. Every per-anchor failure is skipped: one bad
//! anchor never blocks the batch.

use std::collections::HashMap;

use serde::Deserialize;

use super::container::{WorkbookContainer, parts};
use super::relationships::parse_media_relationships;
use super::types::SheetImage;

/// Drawing part root (`xdr:wsDr`), limited to the anchor shape we handle.
/// The deserializer sees local element names with namespace prefixes
/// stripped, so the renames carry none.
#[derive(Debug, Deserialize)]
struct DrawingPart {
    #[serde(rename = "twoCellAnchor", default)]
    anchors: Vec<TwoCellAnchor>,
}

#[derive(Debug, Deserialize)]
struct TwoCellAnchor {
    #[serde(rename = "from")]
    from: Option<AnchorCorner>,
    #[serde(rename = "pic")]
    pic: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct AnchorCorner {
    #[serde(rename = "row")]
    row: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    #[serde(rename = "blipFill")]
    blip_fill: Option<BlipFill>,
}

#[derive(Debug, Deserialize)]
struct BlipFill {
    #[serde(rename = "blip")]
    blip: Option<Blip>,
}

#[derive(Debug, Deserialize)]
struct Blip {
    #[serde(rename = "@embed")]
    embed: Option<String>,
}

/// A detected picture anchor: 0-based origin grid row plus relationship id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRef {
    pub row: u32,
    pub relationship_id: String,
}

/// Extract anchor references from the drawing part text.
///
/// An absent or malformed part yields no anchors; individual anchors with a
/// missing or non-numeric origin row, or without an embedded picture
/// reference, are skipped.
pub fn parse_anchors(xml: Option<&str>) -> Vec<AnchorRef> {
    let Some(xml) = xml else {
        return Vec::new();
    };

    let part: DrawingPart = match quick_xml::de::from_str(xml) {
        Ok(part) => part,
        Err(e) => {
            log::warn!("Malformed drawing part, ignoring images: {}", e);
            return Vec::new();
        }
    };

    let mut anchors = Vec::new();
    for anchor in part.anchors {
        let Some(row_text) = anchor.from.as_ref().and_then(|f| f.row.as_deref()) else {
            log::debug!("Anchor without origin row, skipping");
            continue;
        };
        let Ok(row) = row_text.trim().parse::<u32>() else {
            log::debug!("Anchor with non-numeric origin row {:?}, skipping", row_text);
            continue;
        };
        let Some(embed) = anchor
            .pic
            .and_then(|p| p.blip_fill)
            .and_then(|b| b.blip)
            .and_then(|b| b.embed)
        else {
            log::debug!("Anchor at row {} without picture reference, skipping", row);
            continue;
        };

        anchors.push(AnchorRef {
            row,
            relationship_id: embed,
        });
    }
    anchors
}

fn mime_for(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Resolve anchors to image blobs keyed by 0-based origin grid row.
///
/// Unresolvable anchors are skipped; when two anchors target the same row
/// the last one wins.
pub fn resolve_row_images(
    anchors: &[AnchorRef],
    relationships: &HashMap<String, String>,
    media: &HashMap<String, Vec<u8>>,
) -> HashMap<u32, SheetImage> {
    let mut images = HashMap::new();
    for anchor in anchors {
        let Some(file_name) = relationships.get(&anchor.relationship_id) else {
            log::debug!(
                "Relationship {} not found for anchor at row {}, skipping",
                anchor.relationship_id,
                anchor.row
            );
            continue;
        };
        let Some(bytes) = media.get(file_name) else {
            log::debug!("Media file {} not present in container, skipping", file_name);
            continue;
        };

        images.insert(
            anchor.row,
            SheetImage {
                mime: mime_for(file_name).to_string(),
                bytes: bytes.clone(),
            },
        );
    }
    images
}

/// Full drawing-layer extraction over an open container: relationship map,
/// anchors, media blobs, then the grid-row -> image map.
pub fn extract_row_images(container: &mut WorkbookContainer) -> HashMap<u32, SheetImage> {
    let rels_xml = container.read_text(parts::DRAWING_RELS);
    let relationships = parse_media_relationships(rels_xml.as_deref());

    let drawing_xml = container.read_text(parts::DRAWING);
    let anchors = parse_anchors(drawing_xml.as_deref());
    if anchors.is_empty() {
        return HashMap::new();
    }

    let media = container.media_files();
    resolve_row_images(&anchors, &relationships, &media)
}
