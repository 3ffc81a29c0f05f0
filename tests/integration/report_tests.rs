//! Report phase tests: snapshot in, rendered document out

use check_ratings::output::{write_report, ReportFormat};
use check_ratings::storage::{read_snapshot, write_snapshot, SnapshotError};
use check_ratings::{build_report, AppRecord, Developer, Rating, Report};
use std::collections::HashSet;
use tempfile::TempDir;

fn rated(name: &str, rating: Option<&str>) -> AppRecord {
    let mut record = AppRecord::new(
        name,
        &format!("https://store.example.test/details?id=com.example.{}", name),
    )
    .unwrap();
    record.content_rating = rating.map(String::from);
    record
}

fn sample_records() -> Vec<AppRecord> {
    let mut shooter = rated("Shooter", Some("Mature"));
    shooter.developer = Some(Developer {
        name: "Loud Studio".to_string(),
        url: "https://store.example.test/store/apps/dev?id=42".to_string(),
    });
    shooter.star_rating = Some(4.5);

    vec![
        rated("Puzzle", Some("General")),
        shooter,
        rated("Mystery", None),
        rated("Racer", Some("Rated for 12+")),
        rated("Blocks", Some("Rated for 3+")),
    ]
}

#[test]
fn test_ignore_unknown_and_general() {
    let ignore: HashSet<Rating> = [Rating::Unknown, Rating::General].into_iter().collect();
    let sorted = build_report(sample_records(), &ignore);

    let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Shooter", "Racer", "Blocks"]);
}

#[test]
fn test_ignore_names_from_command_line() {
    // Values given to `-x` go through the canonicalizer
    let ignore: HashSet<Rating> = ["Unknown", "General"]
        .iter()
        .map(|name| name.parse::<Rating>().unwrap())
        .collect();
    let sorted = build_report(sample_records(), &ignore);

    assert_eq!(sorted.len(), 3);
    assert!(sorted.iter().all(|r| r.rating() != Rating::General));
    assert!(sorted.iter().all(|r| r.content_rating.is_some()));
}

#[test]
fn test_snapshot_to_asciidoc_report() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("apps.snapshot");
    let report_path = dir.path().join("ratings.adoc");

    write_snapshot(&snapshot_path, "deadbeef", &sample_records()).unwrap();
    let snapshot = read_snapshot(&snapshot_path).unwrap();
    assert_eq!(snapshot.records, sample_records());

    let ignore: HashSet<Rating> = [Rating::Unknown].into_iter().collect();
    let report = Report::from_snapshot("Family Apps", snapshot, &ignore);
    let renderer = ReportFormat::AsciiDoc.renderer();
    write_report(&report, renderer.as_ref(), &report_path).unwrap();

    let doc = std::fs::read_to_string(&report_path).unwrap();
    assert!(doc.starts_with("= Family Apps\n"));
    assert!(doc.contains("Input hash:: `deadbeef`"));
    assert!(doc.contains("Ignored ratings:: Unknown"));
    assert!(doc.contains("Loud Studio"));
    assert!(!doc.contains("Mystery"));

    let mature = doc.find("== Mature (1)").unwrap();
    let teen = doc.find("== Rated for 12+ (1)").unwrap();
    let kids = doc.find("== Rated for 3+ (1)").unwrap();
    let general = doc.find("== General (1)").unwrap();
    assert!(mature < teen && teen < kids && kids < general);
}

#[test]
fn test_snapshot_to_markdown_report() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("apps.snapshot");
    let report_path = dir.path().join("ratings.md");

    write_snapshot(&snapshot_path, "deadbeef", &sample_records()).unwrap();
    let snapshot = read_snapshot(&snapshot_path).unwrap();

    let report = Report::from_snapshot("Family Apps", snapshot, &HashSet::new());
    let renderer = ReportFormat::Markdown.renderer();
    write_report(&report, renderer.as_ref(), &report_path).unwrap();

    let doc = std::fs::read_to_string(&report_path).unwrap();
    assert!(doc.starts_with("# Family Apps\n"));
    assert!(doc.contains("- **Apps listed**: 5"));
    assert!(doc.contains("- **Ignored ratings**: none"));
    assert!(doc.contains("## Unknown (1)"));
    assert!(doc.contains("| 4.5 |"));
}

#[test]
fn test_report_from_unsupported_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("apps.snapshot");
    write_snapshot(&snapshot_path, "deadbeef", &sample_records()).unwrap();

    let conn = rusqlite::Connection::open(&snapshot_path).unwrap();
    conn.execute("UPDATE snapshot_meta SET schema_version = 7", [])
        .unwrap();
    drop(conn);

    assert!(matches!(
        read_snapshot(&snapshot_path),
        Err(SnapshotError::UnsupportedVersion { found: 7, .. })
    ));
}

#[test]
fn test_write_report_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let report = Report::new("Empty", Vec::new(), &HashSet::new());
    let renderer = ReportFormat::Markdown.renderer();

    let result = write_report(
        &report,
        renderer.as_ref(),
        &dir.path().join("missing").join("ratings.md"),
    );
    assert!(result.is_err());
}
