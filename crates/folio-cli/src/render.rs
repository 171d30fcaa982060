// Terminal output for artefacts and units.

use colored::{ColoredString, Colorize};
use folio_core::{Artefact, ReviewStatus, UnitBucket};

/// Width of the status column in listings.
const STATUS_WIDTH: usize = 8;

/// Short form of an artefact id, enough to recognise it in a listing.
pub fn short_id(artefact: &Artefact) -> String {
    artefact.id().simple().to_string()[..8].to_string()
}

fn paint(status: ReviewStatus, text: &str) -> ColoredString {
    match status {
        ReviewStatus::New => text.yellow(),
        ReviewStatus::Reviewed => text.green(),
    }
}

fn status_text(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::New => "new",
        ReviewStatus::Reviewed => "reviewed",
    }
}

/// Colored status badge.
pub fn status_badge(status: ReviewStatus) -> String {
    paint(status, status_text(status)).to_string()
}

/// Status badge padded to the listing column. Padding is applied before the
/// colour codes so they do not count towards the width.
fn status_cell(status: ReviewStatus) -> ColoredString {
    let padded = format!("{:<width$}", status_text(status), width = STATUS_WIDTH);
    paint(status, &padded)
}

/// One listing line: id, unit, status, title and blurb.
pub fn artefact_line(artefact: &Artefact) -> String {
    format!(
        "{}  U{:<2}  {}  {}  {}",
        short_id(artefact).dimmed(),
        artefact.unit().number(),
        status_cell(artefact.status()),
        artefact.title().bold(),
        artefact.blurb().dimmed()
    )
}

/// Summary line of one unit in the overview.
pub fn unit_line(bucket: &UnitBucket) -> String {
    let counts = format!("{} reviewed / {} total", bucket.reviewed_count(), bucket.total());
    let counts = if bucket.is_empty() {
        counts.dimmed().to_string()
    } else if bucket.reviewed_count() == bucket.total() {
        counts.green().to_string()
    } else {
        counts
    };
    format!("Unit {:>2}  {}", bucket.unit.number(), counts)
}

/// Full detail view of one artefact.
pub fn artefact_detail(artefact: &Artefact) -> String {
    let mut lines = vec![
        format!("{}", artefact.title().bold()),
        format!("  Id:       {}", artefact.id()),
        format!("  Unit:     {}", artefact.unit()),
        format!("  Type:     {}", artefact.kind()),
        format!("  Created:  {}", artefact.created_at().to_rfc3339()),
        format!("  Status:   {}", status_badge(artefact.status())),
    ];
    if let Some(at) = artefact.reviewed_at() {
        lines.push(format!("  Reviewed: {}", at.to_rfc3339()));
    }
    if let Some(link) = artefact.link() {
        lines.push(format!("  Link:     {}", link.cyan()));
    }
    if !artefact.summary().is_empty() {
        lines.push(format!("  Summary:  {}", artefact.summary()));
    }
    if !artefact.review_notes().is_empty() {
        lines.push(String::new());
        lines.push("  Notes:".to_string());
        for line in artefact.review_notes().lines() {
            lines.push(format!("    {}", line));
        }
    }
    lines.join("\n")
}
