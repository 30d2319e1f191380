//! Hyperlink detection inside xlsx workbooks.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use regex::bytes::Regex as BytesRegex;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use filesweep_core::{InspectError, LinkInspector};

/// Bytes read from a worksheet part per step.
const CHUNK_SIZE: usize = 64 * 1024;

/// Tail of the previous chunk kept so a tag split across two reads is found.
const CHUNK_OVERLAP: usize = 256;

/// Worksheet parts inside the package, e.g. `xl/worksheets/sheet3.xml`.
static WORKSHEET_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^xl/worksheets/sheet(\d+)\.xml$").expect("worksheet part pattern is valid")
});

/// A `<hyperlink>` element under any namespace prefix. `<hyperlinks>`, the
/// container, does not match on its own.
static HYPERLINK_TAG: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(r"<(?:[A-Za-z_][\w.-]*:)?hyperlink[\s/>]")
        .expect("hyperlink tag pattern is valid")
});

/// Reads xlsx packages and reports whether any worksheet has a hyperlink.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxLinkInspector;

impl XlsxLinkInspector {
    /// Create a new inspector.
    pub fn new() -> Self {
        Self
    }
}

impl LinkInspector for XlsxLinkInspector {
    fn contains_links(&self, path: &Path) -> Result<bool, InspectError> {
        let file = File::open(path).map_err(|source| InspectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(path, e))?;

        let sheets = worksheet_parts(archive.file_names());
        if sheets.is_empty() {
            return Err(InspectError::Archive {
                path: path.to_path_buf(),
                message: "package has no worksheets".to_string(),
            });
        }

        for sheet in &sheets {
            let part = archive.by_name(sheet).map_err(|e| archive_error(path, e))?;
            let found = has_hyperlink(part).map_err(|source| InspectError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if found {
                debug!(path = %path.display(), sheet = %sheet, "hyperlink found");
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Worksheet part names ordered by sheet number.
fn worksheet_parts<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut sheets: Vec<(u32, String)> = names
        .filter_map(|name| {
            let number = WORKSHEET_PART.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    sheets.sort_unstable();
    sheets.into_iter().map(|(_, name)| name).collect()
}

/// Stream a part looking for a hyperlink element, stopping at the first one.
fn has_hyperlink(mut reader: impl Read) -> std::io::Result<bool> {
    let mut buf = vec![0u8; CHUNK_SIZE + CHUNK_OVERLAP];
    let mut carry = 0;

    loop {
        let read = reader.read(&mut buf[carry..])?;
        if read == 0 {
            return Ok(false);
        }
        let filled = carry + read;
        if HYPERLINK_TAG.is_match(&buf[..filled]) {
            return Ok(true);
        }
        let keep = filled.min(CHUNK_OVERLAP);
        buf.copy_within(filled - keep..filled, 0);
        carry = keep;
    }
}

// Once the file is open, any zip-level failure means it is not a usable
// package, whatever the underlying cause.
fn archive_error(path: &Path, err: ZipError) -> InspectError {
    InspectError::Archive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const LINKED_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData/><hyperlinks><hyperlink ref="A1" r:id="rId1"/></hyperlinks></worksheet>"#;

    const PLAIN_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>hyperlink goes here</t></is></c></row></sheetData></worksheet>"#;

    fn workbook(dir: &Path, name: &str, sheets: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        for (i, sheet) in sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(sheet.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_detects_hyperlink() {
        let temp = TempDir::new().unwrap();
        let path = workbook(temp.path(), "linked.xlsx", &[PLAIN_SHEET, LINKED_SHEET]);
        assert!(XlsxLinkInspector::new().contains_links(&path).unwrap());
    }

    #[test]
    fn test_plain_workbook() {
        let temp = TempDir::new().unwrap();
        let path = workbook(temp.path(), "plain.xlsx", &[PLAIN_SHEET, PLAIN_SHEET]);
        assert!(!XlsxLinkInspector::new().contains_links(&path).unwrap());
    }

    #[test]
    fn test_not_a_zip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.xlsx");
        std::fs::write(&path, "definitely not a workbook").unwrap();

        let err = XlsxLinkInspector::new().contains_links(&path).unwrap_err();
        assert!(matches!(err, InspectError::Archive { .. }));
    }

    #[test]
    fn test_zip_without_worksheets() {
        let temp = TempDir::new().unwrap();
        let path = workbook(temp.path(), "empty.xlsx", &[]);

        let err = XlsxLinkInspector::new().contains_links(&path).unwrap_err();
        assert!(matches!(err, InspectError::Archive { .. }));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = XlsxLinkInspector::new()
            .contains_links(&temp.path().join("nope.xlsx"))
            .unwrap_err();
        assert!(matches!(err, InspectError::Io { .. }));
    }

    #[test]
    fn test_worksheet_order() {
        let names = [
            "xl/worksheets/sheet10.xml",
            "xl/workbook.xml",
            "xl/worksheets/sheet2.xml",
            "xl/worksheets/_rels/sheet1.xml.rels",
            "xl/worksheets/sheet1.xml",
        ];
        assert_eq!(
            worksheet_parts(names.into_iter()),
            [
                "xl/worksheets/sheet1.xml",
                "xl/worksheets/sheet2.xml",
                "xl/worksheets/sheet10.xml",
            ]
        );
    }

    #[test]
    fn test_tag_matching() {
        let hit = |xml: &str| has_hyperlink(Cursor::new(xml.as_bytes().to_vec())).unwrap();

        assert!(hit(r#"<hyperlink ref="A1"/>"#));
        assert!(hit(r#"<x:hyperlink ref="A1" r:id="rId1"/>"#));
        assert!(hit("<hyperlink>"));
        assert!(!hit("<hyperlinks></hyperlinks>"));
        assert!(!hit("<t>hyperlink</t>"));
    }

    #[test]
    fn test_tag_split_across_chunks() {
        let mut xml = vec![b' '; CHUNK_SIZE + CHUNK_OVERLAP - 4];
        xml.extend_from_slice(br#"<hyperlink ref="A1"/>"#);
        assert!(has_hyperlink(Cursor::new(xml)).unwrap());
    }
}
