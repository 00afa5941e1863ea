use colored::Colorize;

use crate::cache::CacheData;
use crate::scan::ContributionRecord;

const HEADER: &str = "# STATUS private commits stars issue prs repository";

/// `. ` marks a good cell, `!!` a bad one (so a private repository shows
/// `!!` in the "private" column).
fn cell(ok: bool) -> &'static str {
    if ok {
        ". "
    } else {
        "!!"
    }
}

fn render_cells(record: &ContributionRecord) -> String {
    format!(
        "    {}      {}      {}    {}    {}  {}",
        cell(!record.is_private),
        cell(record.has_commits),
        cell(record.is_starred),
        cell(record.is_issue_author),
        cell(record.is_pr_author),
        record.full_name,
    )
}

/// One plain-text report line; the WARN marker is colorized separately at
/// print time.
pub fn render_line(record: &ContributionRecord) -> String {
    let status = if record.is_compliant() { "    " } else { "WARN" };
    format!(" {status}{}", render_cells(record))
}

/// Print the compliance report for every cached repository. The cache map is
/// ordered by full name, which gives the report its sort.
pub fn print_report(cache: &CacheData) {
    println!("{HEADER}");
    for record in cache.repositories.values() {
        if record.is_compliant() {
            println!("{}", render_line(record));
        } else {
            println!(" {}{}", "WARN".red().bold(), render_cells(record));
        }
    }
}
