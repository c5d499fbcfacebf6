use time::UtcOffset;

use super::*;

fn student(id: &str, name: &str, order: u32) -> Student {
    Student { id: id.into(), name: name.into(), order, observer1_name: None, observer2_name: None }
}

fn entry(id: &str, status: PresentationStatus, timestamp: i64) -> HistoryEntry {
    HistoryEntry { student_id: id.into(), status, timestamp }
}

#[test]
fn status_labels_are_fixed() {
    assert_eq!(status_label(PresentationStatus::Done), "Presented");
    assert_eq!(status_label(PresentationStatus::AbsentSkipped), "Absent / skipped");
    assert_eq!(status_label(PresentationStatus::NotYet), "Not yet");
}

#[test]
fn rows_follow_history_order_with_running_number() {
    let students = vec![student("s1", "Alpha", 1), student("s2", "Beta", 2)];
    let history = vec![
        entry("s1", PresentationStatus::Done, 0),
        entry("s2", PresentationStatus::AbsentSkipped, 60_000),
    ];
    let rows = history_rows(&students, &history, UtcOffset::UTC);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "1");
    assert_eq!(rows[0][1], "s1");
    assert_eq!(rows[0][2], "Alpha");
    assert_eq!(rows[0][3], "Presented");
    assert_eq!(rows[0][4], "1970-01-01 00:00:00");
    assert_eq!(rows[1][0], "2");
    assert_eq!(rows[1][3], "Absent / skipped");
    assert_eq!(rows[1][4], "1970-01-01 00:01:00");
}

#[test]
fn unknown_student_id_exports_raw_id() {
    let students = vec![student("s1", "Alpha", 1)];
    let history = vec![entry("departed-99", PresentationStatus::Done, 0)];
    let rows = history_rows(&students, &history, UtcOffset::UTC);
    assert_eq!(rows[0][1], "departed-99");
    assert_eq!(rows[0][2], "Unknown");
}

#[test]
fn timestamps_respect_the_given_offset() {
    let students = vec![student("s1", "Alpha", 1)];
    let history = vec![entry("s1", PresentationStatus::Done, 0)];
    let offset = UtcOffset::from_hms(7, 0, 0).unwrap();
    let rows = history_rows(&students, &history, offset);
    assert_eq!(rows[0][4], "1970-01-01 07:00:00");
}

#[test]
fn csv_quotes_every_field_and_doubles_embedded_quotes() {
    let students = vec![student("s1", "Alpha \"Al\" Prime, Jr.", 1)];
    let history = vec![entry("s1", PresentationStatus::Done, 0)];
    let csv = history_csv(&students, &history, UtcOffset::UTC);

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(r#""No","ID","Name","Status","Local time""#));
    let row = lines.next().unwrap();
    assert!(row.contains(r#""Alpha ""Al"" Prime, Jr.""#));
    assert!(row.starts_with(r#""1","s1""#));
    assert!(lines.next().is_none());
}

#[test]
fn empty_history_exports_header_only() {
    let csv = history_csv(&[], &[], UtcOffset::UTC);
    assert_eq!(csv.lines().count(), 1);
}
