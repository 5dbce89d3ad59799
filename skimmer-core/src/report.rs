// Report rendering for pages and page statistics

use serde::Serialize;
use skimmer_scanner::{Page, PageStats};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEAVY_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const LIGHT_RULE: &str = "────────────────────────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Serializes a value as indented JSON.
pub fn generate_json_report<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn generate_page_report(page: &Page) -> String {
    let mut report = header("SKIMMER PAGE REPORT");

    report.push_str(&format!("URI:          {}\n", page.uri));
    report.push_str(&format!("Exists:       {}\n", yes_no(page.exists)));
    report.push_str(&format!("Cached:       {}\n", yes_no(page.cached)));
    report.push_str(&format!("Generated:    {}\n", generated_at()));

    if !page.exists {
        report.push_str("\nThe page could not be fetched.\n\n");
        report.push_str(HEAVY_RULE);
        return report;
    }

    report.push_str(&format!("Title:        {}\n", page.title.trim()));
    report.push_str(&format!("Articles:     {}\n", page.articles.len()));
    report.push_str(&format!("Links:        {}\n\n", page.links.len()));

    if !page.articles.is_empty() {
        report.push_str(HEAVY_RULE);
        report.push_str("ARTICLES\n");
        report.push_str(HEAVY_RULE);
        report.push('\n');

        for (index, article) in page.articles.iter().enumerate() {
            report.push_str(&format!("[{}] {}\n", index + 1, article.title.trim()));
            report.push_str(&format!("    {}\n", article.uri));
            report.push_str(&format!("    {} link(s)\n\n", article.links.len()));
        }
    }

    if !page.links.is_empty() {
        report.push_str(HEAVY_RULE);
        report.push_str("LINKS\n");
        report.push_str(HEAVY_RULE);
        report.push('\n');

        for link in &page.links {
            let title = link.title.trim();
            if title.is_empty() {
                report.push_str(&format!("  {}\n", link.uri));
            } else {
                report.push_str(&format!("  {}  ({})\n", link.uri, title));
            }
        }
        report.push('\n');
    }

    report.push_str(HEAVY_RULE);
    report
}

pub fn generate_stats_report(stats: &PageStats) -> String {
    let mut report = header("SKIMMER PAGE STATISTICS");

    report.push_str(&format!("URI:          {}\n", stats.uri));
    report.push_str(&format!("Exists:       {}\n", yes_no(stats.exists)));
    report.push_str(&format!("Generated:    {}\n\n", generated_at()));

    if stats.counts.is_empty() {
        report.push_str("No statistics collected.\n\n");
        report.push_str(HEAVY_RULE);
        return report;
    }

    let width = stats
        .counts
        .iter()
        .map(|item| item.key.chars().count())
        .max()
        .unwrap_or(0);

    report.push_str(LIGHT_RULE);
    for item in &stats.counts {
        report.push_str(&format!("  {:<width$}  {:>8}\n", item.key, item.value, width = width));
    }
    report.push_str(LIGHT_RULE);
    report.push('\n');
    report.push_str(HEAVY_RULE);
    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn header(title: &str) -> String {
    let mut report = String::new();
    report.push_str(HEAVY_RULE);
    report.push_str(&format!("{:^80}\n", title));
    report.push_str(HEAVY_RULE);
    report.push('\n');
    report
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn generated_at() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
