//! History export — CSV rows for the session audit download.
//!
//! DESIGN
//! ======
//! Export is a pure read over `history` + `students`: one row per resolution
//! event, in append order. History entries whose student id has left the
//! roster snapshot still export (raw id, `Unknown` name) so the audit trail
//! never silently drops events. Quoting follows RFC 4180: every field is
//! quoted, embedded quotes doubled.

use time::UtcOffset;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::queue::{HistoryEntry, PresentationStatus, Student};

/// Column headers for the exported history.
pub const CSV_HEADER: [&str; 5] = ["No", "ID", "Name", "Status", "Local time"];

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Fixed display label for a resolution.
#[must_use]
pub fn status_label(status: PresentationStatus) -> &'static str {
    match status {
        PresentationStatus::Done => "Presented",
        PresentationStatus::AbsentSkipped => "Absent / skipped",
        PresentationStatus::NotYet => "Not yet",
    }
}

/// One exported row: `No, ID, Name, Status, Local time`.
#[must_use]
pub fn history_rows(students: &[Student], history: &[HistoryEntry], offset: UtcOffset) -> Vec<[String; 5]> {
    history
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let student = students.iter().find(|s| s.id == entry.student_id);
            [
                (index + 1).to_string(),
                student.map_or_else(|| entry.student_id.clone(), |s| s.id.clone()),
                student.map_or_else(|| "Unknown".to_owned(), |s| s.name.clone()),
                status_label(entry.status).to_owned(),
                format_timestamp(entry.timestamp, offset),
            ]
        })
        .collect()
}

/// The full CSV document (header plus rows), `\n`-separated.
#[must_use]
pub fn history_csv(students: &[Student], history: &[HistoryEntry], offset: UtcOffset) -> String {
    let header = CSV_HEADER.iter().map(|c| quote(c)).collect::<Vec<_>>().join(",");
    let mut lines = vec![header];
    for row in history_rows(students, history, offset) {
        lines.push(row.iter().map(|c| quote(c)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

/// Epoch milliseconds rendered in the given offset, falling back to the raw
/// value when out of the representable range.
fn format_timestamp(timestamp_ms: i64, offset: UtcOffset) -> String {
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.to_offset(offset).format(TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
