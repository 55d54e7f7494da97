use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use super::types::{RecordKind, Student, StudentRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no student matches '{0}'")]
    NotFound(String),

    #[error("'{query}' matches {count} students; use the student id")]
    Ambiguous { query: String, count: usize },
}

/// Students whose name or phone contains `term`. An empty term matches everyone.
pub fn search_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    let term = term.trim();
    students
        .iter()
        .filter(|s| s.name.contains(term) || s.phone.contains(term))
        .collect()
}

/// Resolve a student from an id, a unique exact name, or a unique partial match.
///
/// Exact name matches win over partial ones, but two students sharing a name
/// are ambiguous rather than resolved to either.
pub fn resolve_student<'a>(students: &'a [Student], query: &str) -> Result<&'a Student, LookupError> {
    let query = query.trim();

    if let Ok(id) = Uuid::parse_str(query) {
        if let Some(student) = students.iter().find(|s| s.id == id) {
            return Ok(student);
        }
    }

    let exact: Vec<&Student> = students
        .iter()
        .filter(|s| s.name.eq_ignore_ascii_case(query))
        .collect();

    let matches = if !exact.is_empty() {
        exact
    } else if query.is_empty() {
        Vec::new()
    } else {
        search_students(students, query)
    };
    match matches.len() {
        0 => Err(LookupError::NotFound(query.to_string())),
        1 => Ok(matches[0]),
        count => Err(LookupError::Ambiguous {
            query: query.to_string(),
            count,
        }),
    }
}

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub students: usize,
    pub with_violations: usize,
    pub with_commendations: usize,
}

pub fn dashboard_counts(students: &[Student], records: &[StudentRecord]) -> DashboardCounts {
    let distinct = |kind: RecordKind| {
        records
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.student_id)
            .collect::<HashSet<_>>()
            .len()
    };

    DashboardCounts {
        students: students.len(),
        with_violations: distinct(RecordKind::Negative),
        with_commendations: distinct(RecordKind::Positive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::BASE_SCORE;
    use chrono::Utc;

    fn student(name: &str, phone: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            base_score: BASE_SCORE,
        }
    }

    fn record(student_id: Uuid, kind: RecordKind) -> StudentRecord {
        StudentRecord {
            id: Uuid::new_v4(),
            student_id,
            kind,
            date: Utc::now(),
            details: "test".to_string(),
            points: 1,
            observer: "Counselor".to_string(),
            procedure_applied: None,
            violation_id: None,
        }
    }

    #[test]
    fn test_search_by_name_or_phone() {
        let students = vec![
            student("Omar Khalid", "0551112222"),
            student("Sara Ahmed", "0553334444"),
        ];
        assert_eq!(search_students(&students, "Sara").len(), 1);
        assert_eq!(search_students(&students, "3334").len(), 1);
        assert_eq!(search_students(&students, "055").len(), 2);
        assert_eq!(search_students(&students, "").len(), 2);
    }

    #[test]
    fn test_resolve_by_id() {
        let students = vec![student("Omar Khalid", "0551112222")];
        let id = students[0].id.to_string();
        assert_eq!(resolve_student(&students, &id).unwrap().name, "Omar Khalid");
    }

    #[test]
    fn test_resolve_exact_name_beats_partial() {
        let students = vec![
            student("Omar", "0551112222"),
            student("Omar Khalid", "0553334444"),
        ];
        assert_eq!(resolve_student(&students, "omar").unwrap().phone, "0551112222");
    }

    #[test]
    fn test_resolve_duplicate_exact_name_is_ambiguous() {
        let students = vec![
            student("Omar Khalid", "0551112222"),
            student("Omar Khalid", "0553334444"),
        ];
        assert_eq!(
            resolve_student(&students, "Omar Khalid"),
            Err(LookupError::Ambiguous {
                query: "Omar Khalid".to_string(),
                count: 2
            })
        );
        // The id still picks exactly one of them
        let id = students[1].id.to_string();
        assert_eq!(resolve_student(&students, &id).unwrap().phone, "0553334444");
    }

    #[test]
    fn test_resolve_ambiguous_partial() {
        let students = vec![
            student("Omar Khalid", "0551112222"),
            student("Omar Saleh", "0553334444"),
        ];
        assert_eq!(
            resolve_student(&students, "Omar"),
            Err(LookupError::Ambiguous {
                query: "Omar".to_string(),
                count: 2
            })
        );
        assert_eq!(resolve_student(&students, "Saleh").unwrap().name, "Omar Saleh");
    }

    #[test]
    fn test_resolve_not_found() {
        let students = vec![student("Omar Khalid", "0551112222")];
        assert!(matches!(
            resolve_student(&students, "Huda"),
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            resolve_student(&students, ""),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_dashboard_counts_distinct_students() {
        let a = student("Omar Khalid", "0551112222");
        let b = student("Sara Ahmed", "0553334444");
        let records = vec![
            record(a.id, RecordKind::Negative),
            record(a.id, RecordKind::Negative),
            record(b.id, RecordKind::Negative),
            record(b.id, RecordKind::Positive),
        ];
        let counts = dashboard_counts(&[a, b], &records);
        assert_eq!(counts.students, 2);
        assert_eq!(counts.with_violations, 2);
        assert_eq!(counts.with_commendations, 1);
    }
}
