//! Zip container access for workbook parts

use std::collections::HashMap;
use std::io::{Cursor, Read};

use zip::ZipArchive;
use zip::result::ZipError;

use super::types::ImportError;

/// Well-known part paths inside a workbook container
pub mod parts {
    pub const DRAWING: &str = "xl/drawings/drawing1.xml";
    pub const DRAWING_RELS: &str = "xl/drawings/_rels/drawing1.xml.rels";
    pub const MEDIA_DIR: &str = "xl/media/";
}

/// A workbook file opened as an archive of named parts.
///
/// Missing parts are a normal outcome (`None`), since a workbook without a
/// drawing layer is legal. Only bytes that are not a zip archive at all are
/// a hard failure.
pub struct WorkbookContainer<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> WorkbookContainer<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self, ImportError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ImportError::InvalidContainer(e.to_string()))?;
        Ok(WorkbookContainer { archive })
    }

    /// All entry paths in the container
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    /// Read a part as UTF-8 text
    pub fn read_text(&mut self, path: &str) -> Option<String> {
        let bytes = self.read_binary(path)?;
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(_) => {
                log::warn!("Part {} is not valid UTF-8, skipping", path);
                None
            }
        }
    }

    /// Read a part as raw bytes
    pub fn read_binary(&mut self, path: &str) -> Option<Vec<u8>> {
        let mut entry = match self.archive.by_name(path) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return None,
            Err(e) => {
                log::warn!("Failed to open part {}: {}", path, e);
                return None;
            }
        };

        let mut bytes = Vec::new();
        if let Err(e) = entry.read_to_end(&mut bytes) {
            log::warn!("Failed to read part {}: {}", path, e);
            return None;
        }
        Some(bytes)
    }

    /// Gather every media blob under `xl/media/`, keyed by bare file name
    pub fn media_files(&mut self) -> HashMap<String, Vec<u8>> {
        let names: Vec<String> = self
            .entry_names()
            .into_iter()
            .filter(|n| n.starts_with(parts::MEDIA_DIR) && !n.ends_with('/'))
            .collect();

        let mut media = HashMap::new();
        for name in names {
            if let Some(bytes) = self.read_binary(&name) {
                let file_name = name.rsplit('/').next().unwrap_or(&name).to_string();
                media.insert(file_name, bytes);
            }
        }
        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn fixture_container(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            for (name, bytes) in entries {
                writer.start_file(name.to_string(), options).unwrap();
                writer.write_all(bytes).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_open_rejects_non_zip_bytes() {
        let result = WorkbookContainer::open(b"definitely not a zip archive");
        assert!(matches!(result, Err(ImportError::InvalidContainer(_))));
    }

    #[test]
    fn test_read_text_and_missing_part() {
        let bytes = fixture_container(&[("xl/drawings/drawing1.xml", b"<xdr:wsDr/>")]);
        let mut container = WorkbookContainer::open(&bytes).unwrap();

        assert_eq!(
            container.read_text(parts::DRAWING),
            Some("<xdr:wsDr/>".to_string())
        );
        assert_eq!(container.read_text(parts::DRAWING_RELS), None);
        assert_eq!(container.read_binary("xl/media/image1.png"), None);
    }

    #[test]
    fn test_media_files_collects_blobs_by_file_name() {
        let bytes = fixture_container(&[
            ("xl/media/image1.png", &[0x89u8, 0x50][..]),
            ("xl/media/image2.jpeg", &[0xFFu8, 0xD8][..]),
            ("xl/worksheets/sheet1.xml", b"<worksheet/>"),
        ]);
        let mut container = WorkbookContainer::open(&bytes).unwrap();

        let media = container.media_files();
        assert_eq!(media.len(), 2);
        assert_eq!(media["image1.png"], vec![0x89, 0x50]);
        assert_eq!(media["image2.jpeg"], vec![0xFF, 0xD8]);
    }

    #[test]
    fn test_entry_names_lists_all_parts() {
        let bytes = fixture_container(&[("a.xml", b"1"), ("b/c.xml", b"2")]);
        let container = WorkbookContainer::open(&bytes).unwrap();

        let mut names = container.entry_names();
        names.sort();
        assert_eq!(names, vec!["a.xml".to_string(), "b/c.xml".to_string()]);
    }
}
