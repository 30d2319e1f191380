use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use filesweep_report::{
    Deduplicator, ExportError, ExportFormat, Exporter, FileRecord, ScanSummary,
};
use tempfile::TempDir;

fn record(path: &str, owner: &str, size_mb: f64, active: bool) -> FileRecord {
    let full_path = PathBuf::from(path);
    let name = full_path.file_name().unwrap().to_string_lossy().into_owned();
    let extension = full_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    FileRecord {
        full_path,
        name: name.into(),
        size_mb,
        owner: owner.into(),
        last_access_time: FileRecord::timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
            .unwrap(),
        unwanted: extension == ".tmp",
        extension: extension.into(),
        active,
        contains_links: false,
    }
}

#[test]
fn test_dedup_then_export() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("inventory.csv");
    let records = vec![
        record("/srv/a/budget.xlsx", "alice", 0.25, true),
        record("/srv/b/budget.xlsx", "alice", 0.25, false),
        record("/srv/a/scratch.tmp", "bob", 0.0, true),
    ];

    let deduped = Deduplicator::new().dedup(records);
    Exporter::new(ExportFormat::Csv)
        .write(&deduped.records, &dest)
        .unwrap();

    let text = fs::read_to_string(&dest).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("/srv/a/budget.xlsx,budget.xlsx,0.25,alice,2023-11-14T22:13:20Z,.xlsx,True,False,False"));
    assert!(lines[2].starts_with("/srv/a/scratch.tmp,scratch.tmp,0.00,bob,"));
    assert!(lines[2].ends_with(",.tmp,True,True,False"));

    let summary = ScanSummary::from_records(&deduped.records, deduped.removed);
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.duplicates_removed, 1);
    assert_eq!(summary.unwanted, 1);
}

#[test]
fn test_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("inventory.csv");
    fs::write(&dest, "stale contents that are much longer than the new export\n".repeat(50)).unwrap();

    Exporter::new(ExportFormat::Csv).write(&[], &dest).unwrap();

    let text = fs::read_to_string(&dest).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("FullPath,"));
}

#[test]
fn test_missing_directory_is_not_created() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");
    let dest = missing.join("inventory.csv");

    let err = Exporter::new(ExportFormat::Csv).write(&[], &dest).unwrap_err();
    assert!(matches!(err, ExportError::DirectoryMissing { .. }));
    assert!(!missing.exists());
}

#[test]
fn test_no_temp_files_left_behind() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("inventory.json");
    let records = [record("/srv/a/budget.xlsx", "alice", 0.25, true)];

    Exporter::new(ExportFormat::Json).write(&records, &dest).unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_json_export() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("inventory.json");
    let records = [record("/srv/a/budget.xlsx", "alice", 0.25, true)];

    Exporter::new(ExportFormat::Json).write(&records, &dest).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["FullPath"], "/srv/a/budget.xlsx");
    assert_eq!(rows[0]["SizeMB"], 0.25);
    assert_eq!(rows[0]["Active"], true);
    assert_eq!(rows[0]["LastAccessTime"], "2023-11-14T22:13:20Z");
}
