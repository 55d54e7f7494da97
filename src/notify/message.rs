use std::fmt::Write;

use crate::records::{RecordKind, Student, StudentRecord};
use crate::scoring::calculate_score;

/// How many records the summary report lists
pub const RECENT_LIMIT: usize = 5;

/// Procedure shown when a violation record carries none
const FALLBACK_PROCEDURE: &str = "Warning";

/// Compose the parent notice for a single record.
pub fn record_notice(student: &Student, record: &StudentRecord, school_name: &str) -> String {
    let date = record.date.format("%Y-%m-%d");
    let mut message = format!("Dear parent of {},\n\n", student.name);

    match record.kind {
        RecordKind::Negative => {
            let procedure = record
                .procedure_applied
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(FALLBACK_PROCEDURE);
            let _ = write!(
                message,
                "A behavior violation was recorded on {}.\n\
                 Violation: {}\n\
                 Action taken: {}\n\
                 Points deducted: {}\n\n\
                 We ask for your guidance and follow-up.",
                date, record.details, procedure, record.points
            );
        }
        RecordKind::Positive => {
            let _ = write!(
                message,
                "We are pleased to share your child's excellent conduct on {}.\n\
                 Reason: {}\n\
                 Points awarded: +{}\n\n\
                 Thank you for your continued support.",
                date, record.details, record.points
            );
        }
    }

    let _ = write!(message, "\n\n{}", school_name);
    message
}

/// Compose the behavior summary for a student.
///
/// `records` must belong to `student`. The most recent entries are listed
/// newest first.
pub fn summary_report(student: &Student, records: &[StudentRecord], school_name: &str) -> String {
    let result = calculate_score(records);
    let mut message = String::new();

    let _ = writeln!(message, "*Behavior report*");
    let _ = writeln!(message, "Student: {}", student.name);
    let _ = writeln!(message, "Current score: *{}* / 100", result.score);
    let _ = writeln!(message, "Total commendation points: {}", result.breakdown.total_positive);
    let _ = writeln!(message, "Total violation points: {}", result.breakdown.total_negative);
    let _ = writeln!(message);
    let _ = writeln!(message, "*Recent notes:*");

    let recent = recent_records(records, RECENT_LIMIT);
    if recent.is_empty() {
        message.push_str("No recent notes recorded.\n");
    } else {
        for record in recent {
            let marker = if record.is_positive() { "✅" } else { "❌" };
            let _ = writeln!(
                message,
                "{} {} ({}{})",
                marker,
                record.details,
                record.kind.sign(),
                record.points
            );
        }
    }

    let _ = write!(message, "\n{}", school_name);
    message
}

/// The last `limit` records by date, newest first. On equal dates the later insert counts as newer.
fn recent_records(records: &[StudentRecord], limit: usize) -> Vec<&StudentRecord> {
    let mut ordered: Vec<&StudentRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date);
    ordered.into_iter().rev().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::BASE_SCORE;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn student() -> Student {
        Student {
            id: Uuid::new_v4(),
            name: "Omar Khalid".to_string(),
            phone: "0551234567".to_string(),
            base_score: BASE_SCORE,
        }
    }

    fn record(student: &Student, kind: RecordKind, details: &str, points: u32, day: i64) -> StudentRecord {
        StudentRecord {
            id: Uuid::new_v4(),
            student_id: student.id,
            kind,
            date: Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap() + Duration::days(day),
            details: details.to_string(),
            points,
            observer: "Counselor".to_string(),
            procedure_applied: None,
            violation_id: None,
        }
    }

    #[test]
    fn test_violation_notice_falls_back_to_warning() {
        let student = student();
        let record = record(&student, RecordKind::Negative, "Late for assembly", 1, 0);
        let notice = record_notice(&student, &record, "Al Noor School");
        assert!(notice.contains("Omar Khalid"));
        assert!(notice.contains("2024-09-01"));
        assert!(notice.contains("Action taken: Warning"));
        assert!(notice.contains("Points deducted: 1"));
        assert!(notice.ends_with("Al Noor School"));
    }

    #[test]
    fn test_violation_notice_uses_applied_procedure() {
        let student = student();
        let mut record = record(&student, RecordKind::Negative, "Fighting", 10, 0);
        record.procedure_applied = Some("Parent meeting".to_string());
        let notice = record_notice(&student, &record, "Al Noor School");
        assert!(notice.contains("Action taken: Parent meeting"));
    }

    #[test]
    fn test_commendation_notice() {
        let student = student();
        let record = record(&student, RecordKind::Positive, "Helping classmates", 3, 0);
        let notice = record_notice(&student, &record, "Al Noor School");
        assert!(notice.contains("Reason: Helping classmates"));
        assert!(notice.contains("Points awarded: +3"));
    }

    #[test]
    fn test_summary_without_records() {
        let report = summary_report(&student(), &[], "Al Noor School");
        assert!(report.contains("Current score: *80* / 100"));
        assert!(report.contains("No recent notes recorded."));
    }

    #[test]
    fn test_summary_lists_last_five_newest_first() {
        let student = student();
        let records: Vec<StudentRecord> = (0..7)
            .map(|day| {
                let kind = if day % 2 == 0 { RecordKind::Positive } else { RecordKind::Negative };
                record(&student, kind, &format!("note {}", day), 1, day)
            })
            .collect();
        let report = summary_report(&student, &records, "Al Noor School");

        let lines: Vec<&str> = report
            .lines()
            .filter(|l| l.starts_with('✅') || l.starts_with('❌'))
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "✅ note 6 (+1)");
        assert_eq!(lines[1], "❌ note 5 (-1)");
        assert_eq!(lines[4], "✅ note 2 (+1)");
        assert!(report.contains("Total commendation points: 4"));
        assert!(report.contains("Total violation points: 3"));
    }
}
