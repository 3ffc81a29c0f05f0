//! AsciiDoc report rendering

use crate::model::AppRecord;
use crate::output::traits::ReportRenderer;
use crate::output::Report;

/// Renders reports as AsciiDoc
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiDocRenderer;

impl ReportRenderer for AsciiDocRenderer {
    fn render(&self, report: &Report) -> String {
        format_asciidoc_report(report)
    }

    fn extension(&self) -> &'static str {
        "adoc"
    }
}

/// Formats a report as an AsciiDoc document
///
/// One section per rating in report order; inside a section apps are listed
/// by name.
pub fn format_asciidoc_report(report: &Report) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("= {}\n", report.title.trim()));
    if let Some(meta) = &report.meta {
        doc.push_str(&format!(":revdate: {}\n", meta.created_at));
    }
    doc.push_str(":toc:\n\n");

    doc.push_str(&format!("Apps listed:: {}\n", report.apps.len()));
    doc.push_str(&format!("Ignored ratings:: {}\n", report.ignored_labels()));
    if let Some(meta) = &report.meta {
        doc.push_str(&format!("Apps in snapshot:: {}\n", meta.record_count));
        doc.push_str(&format!("Input hash:: `{}`\n", meta.source_hash));
    }
    doc.push('\n');

    let stats = report.statistics();
    if !stats.by_rating.is_empty() {
        doc.push_str("== Summary\n\n");
        doc.push_str("[cols=\"3,1\",options=\"header\"]\n|===\n");
        doc.push_str("|Rating |Apps\n\n");
        for (rating, count) in &stats.by_rating {
            doc.push_str(&format!("|{} |{}\n", rating.label(), count));
        }
        doc.push_str("|===\n\n");
    }

    for (rating, apps) in report.groups() {
        doc.push_str(&format!("== {} ({})\n\n", rating.label(), apps.len()));
        doc.push_str("[cols=\"3,3,2,1,2\",options=\"header\"]\n|===\n");
        doc.push_str("|App |Store title |Developer |Stars |Store id\n\n");
        for app in apps {
            doc.push_str(&format_row(app));
        }
        doc.push_str("|===\n\n");
    }

    doc
}

fn format_row(app: &AppRecord) -> String {
    let developer = app
        .developer
        .as_ref()
        .map(|dev| link(&dev.url, &dev.name))
        .unwrap_or_default();
    let stars = app
        .star_rating
        .map(|stars| format!("{:.1}", stars))
        .unwrap_or_default();

    format!(
        "|{}\n|{}\n|{}\n|{}\n|{}\n\n",
        link(&app.url, &app.name),
        app.original_name.as_deref().map(escape_cell).unwrap_or_default(),
        developer,
        stars,
        app.store_id().map(|id| format!("`{}`", id)).unwrap_or_default(),
    )
}

fn link(url: &str, text: &str) -> String {
    format!("link:++{}++[{}]", url, escape_cell(text).replace(']', "\\]"))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
