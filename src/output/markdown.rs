//! Markdown report rendering
//!
//! Produces a summary table followed by one table per rating, most
//! restrictive rating first.

use crate::model::AppRecord;
use crate::output::traits::ReportRenderer;
use crate::output::Report;

/// Renders reports as GitHub-flavoured Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        format_markdown_report(report)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

/// Formats a report as markdown
pub fn format_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", escape(&report.title)));

    if let Some(meta) = &report.meta {
        md.push_str("## Snapshot\n\n");
        md.push_str(&format!("- **Gathered**: {}\n", meta.created_at));
        md.push_str(&format!("- **Apps in snapshot**: {}\n", meta.record_count));
        md.push_str(&format!("- **Input hash**: {}\n\n", meta.source_hash));
    }

    md.push_str(&format!(
        "- **Apps listed**: {}\n",
        report.apps.len()
    ));
    md.push_str(&format!(
        "- **Ignored ratings**: {}\n\n",
        report.ignored_labels()
    ));

    let stats = report.statistics();
    if !stats.by_rating.is_empty() {
        md.push_str("## Summary\n\n");
        md.push_str("| Rating | Apps |\n");
        md.push_str("|--------|------|\n");
        for (rating, count) in &stats.by_rating {
            md.push_str(&format!("| {} | {} |\n", rating.label(), count));
        }
        md.push('\n');
    }

    for (rating, apps) in report.groups() {
        md.push_str(&format!("## {} ({})\n\n", rating.label(), apps.len()));
        md.push_str("| App | Store title | Developer | Stars | Store id |\n");
        md.push_str("|-----|-------------|-----------|-------|----------|\n");
        for app in apps {
            md.push_str(&format_row(app));
        }
        md.push('\n');
    }

    md
}

fn format_row(app: &AppRecord) -> String {
    let developer = app
        .developer
        .as_ref()
        .map(|dev| format!("[{}]({})", escape(&dev.name), dev.url))
        .unwrap_or_default();

    format!(
        "| [{}]({}) | {} | {} | {} | {} |\n",
        escape(&app.name),
        app.url,
        app.original_name.as_deref().map(escape).unwrap_or_default(),
        developer,
        app.star_rating
            .map(|stars| format!("{:.1}", stars))
            .unwrap_or_default(),
        app.store_id().unwrap_or_default(),
    )
}

// Table cells and link text
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Developer, Rating};
    use crate::storage::SnapshotMeta;
    use std::collections::HashSet;

    fn create_test_report() -> Report {
        let mut mature = AppRecord::new(
            "Shooter",
            "https://store.example.test/details?id=com.example.Shooter",
        )
        .unwrap();
        mature.content_rating = Some("Mature".to_string());
        mature.original_name = Some("Shooter | Deluxe".to_string());
        mature.star_rating = Some(4.5);
        mature.developer = Some(Developer {
            name: "Studio".to_string(),
            url: "https://store.example.test/dev?id=1".to_string(),
        });

        let mut general = AppRecord::new("Puzzle", "https://store.example.test/puzzle").unwrap();
        general.content_rating = Some("General".to_string());

        let unrated = AppRecord::new("Mystery", "https://store.example.test/mystery").unwrap();

        let ignore: HashSet<Rating> = [Rating::Unknown].into_iter().collect();
        Report::new("Family Apps", vec![general, unrated, mature], &ignore)
    }

    #[test]
    fn test_format_markdown_report() {
        let markdown = format_markdown_report(&create_test_report());

        assert!(markdown.starts_with("# Family Apps\n"));
        assert!(markdown.contains("- **Apps listed**: 2"));
        assert!(markdown.contains("- **Ignored ratings**: Unknown"));
        assert!(markdown.contains("| Mature | 1 |"));
        assert!(markdown.contains("| General | 1 |"));
        assert!(!markdown.contains("Mystery"));
    }

    #[test]
    fn test_groups_in_rating_order() {
        let markdown = format_markdown_report(&create_test_report());

        let mature = markdown.find("## Mature (1)").unwrap();
        let general = markdown.find("## General (1)").unwrap();
        assert!(mature < general);
    }

    #[test]
    fn test_row_fields() {
        let markdown = format_markdown_report(&create_test_report());

        assert!(markdown.contains(
            "| [Shooter](https://store.example.test/details?id=com.example.Shooter) \
             | Shooter \\| Deluxe | [Studio](https://store.example.test/dev?id=1) | 4.5 \
             | com.example.shooter |"
        ));
        assert!(markdown.contains("Shooter \\| Deluxe"));
        assert!(markdown.contains("com.example.shooter"));
        assert!(markdown.contains("| [Puzzle](https://store.example.test/puzzle) |  |  |  |  |"));
    }

    #[test]
    fn test_snapshot_metadata_section() {
        let mut report = create_test_report();
        report.meta = Some(SnapshotMeta {
            schema_version: 1,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            source_hash: "abc123".to_string(),
            record_count: 3,
        });

        let markdown = format_markdown_report(&report);
        assert!(markdown.contains("## Snapshot"));
        assert!(markdown.contains("2024-01-01T00:00:00+00:00"));
        assert!(markdown.contains("- **Apps in snapshot**: 3"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a|b"), "a\\|b");
        assert_eq!(escape("[x]"), "\\[x\\]");
    }
}
