//! Drawing relationship resolution
//!
//! The drawing part references its media through indirection ids; the
//! matching `.rels` part maps each id to a target path. Only media targets
//! are kept.

use std::collections::HashMap;

use serde::Deserialize;

/// Flat relationship list as stored in `drawing1.xml.rels`
#[derive(Debug, Deserialize)]
struct RelationshipList {
    #[serde(rename = "Relationship", default)]
    entries: Vec<Relationship>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(rename = "@Id")]
    id: String,
    #[serde(rename = "@Target")]
    target: String,
}

/// Parse the drawing relationship part into an id -> media file name map.
///
/// An absent part yields an empty map. A present but malformed part is
/// logged and also yields an empty map: images are a convenience and must
/// not block the row import.
pub fn parse_media_relationships(xml: Option<&str>) -> HashMap<String, String> {
    let Some(xml) = xml else {
        return HashMap::new();
    };

    let list: RelationshipList = match quick_xml::de::from_str(xml) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("Malformed drawing relationships, ignoring images: {}", e);
            return HashMap::new();
        }
    };

    let mut map = HashMap::new();
    for entry in list.entries {
        if !entry.target.contains("media/") {
            continue;
        }
        let file_name = entry
            .target
            .rsplit('/')
            .next()
            .unwrap_or(&entry.target)
            .to_string();
        map.insert(entry.id, file_name);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image2.jpeg"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml"/>
</Relationships>"#;

    #[test]
    fn test_keeps_only_media_targets() {
        let map = parse_media_relationships(Some(RELS));

        assert_eq!(map.len(), 2);
        assert_eq!(map["rId1"], "image1.png");
        assert_eq!(map["rId2"], "image2.jpeg");
        assert!(!map.contains_key("rId3"));
    }

    #[test]
    fn test_absent_part_is_empty_map() {
        assert!(parse_media_relationships(None).is_empty());
    }

    #[test]
    fn test_malformed_part_is_empty_map() {
        assert!(parse_media_relationships(Some("<Relationships><unclosed")).is_empty());
        assert!(parse_media_relationships(Some("not xml at all")).is_empty());
    }

    #[test]
    fn test_empty_relationship_list() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;
        assert!(parse_media_relationships(Some(xml)).is_empty());
    }
}
