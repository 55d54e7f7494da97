use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::catalog::{Catalog, Category};
use crate::records::{DashboardCounts, RecordKind, Student, StudentRecord};
use crate::scoring::{ScoreResult, Status};

/// A student with their computed score, for table display
pub struct StudentRow<'a> {
    pub student: &'a Student,
    pub result: ScoreResult,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Score as "NN/100", colored by status band
pub fn format_score(result: &ScoreResult, use_colors: bool) -> String {
    let text = format!("{:>3}/100", result.score);
    if !use_colors {
        return text;
    }
    match result.status {
        Status::Ideal => text.green().bold().to_string(),
        Status::Distinguished => text.cyan().to_string(),
        Status::NeedsImprovement => text.yellow().to_string(),
        Status::NeedsCloseFollowUp => text.red().bold().to_string(),
    }
}

/// Students as a table with columns: Index, Score, Name, Phone, Status
pub fn format_student_table(rows: &[StudentRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No students found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 7;
    let separator = "  ";

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(&row.result, use_colors);
            let status = row.result.status.label();

            let fixed_width = index_width
                + 1
                + score_width
                + separator.len() * 3
                + row.student.phone.len()
                + status.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&row.student.name, width - fixed_width)
                }
                Some(_) => truncate_name(&row.student.name, 20),
                None => row.student.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str,
                    separator,
                    name.bold(),
                    separator,
                    row.student.phone.dimmed(),
                    separator,
                    status
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    name,
                    separator,
                    row.student.phone,
                    separator,
                    status
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per record: date, signed points, details, procedure, observer
pub fn format_record_line(record: &StudentRecord, use_colors: bool) -> String {
    let date = record.date.format("%Y-%m-%d");
    let points = format!("{}{}", record.kind.sign(), record.points);
    let procedure = record
        .procedure_applied
        .as_deref()
        .map(|p| format!(" [{}]", p))
        .unwrap_or_default();

    if use_colors {
        let points = match record.kind {
            RecordKind::Positive => points.green().to_string(),
            RecordKind::Negative => points.red().to_string(),
        };
        format!(
            "  {}  {:>4}  {}{}  ({})",
            date.dimmed(),
            points,
            record.details,
            procedure.yellow(),
            record.observer.dimmed()
        )
    } else {
        format!(
            "  {}  {:>4}  {}{}  ({})",
            date, points, record.details, procedure, record.observer
        )
    }
}

/// Multi-line detail view for one student, newest records first
pub fn format_student_detail(
    student: &Student,
    records: &[StudentRecord],
    result: &ScoreResult,
    use_colors: bool,
) -> String {
    let name = if use_colors {
        student.name.bold().to_string()
    } else {
        student.name.clone()
    };

    let mut lines = vec![
        name,
        format!("  Phone: {}", student.phone),
        format!(
            "  Score: {} ({})",
            format_score(result, use_colors).trim_start(),
            result.status
        ),
        format!(
            "  Commendations: +{} (counted {})  Violations: -{}",
            result.breakdown.total_positive,
            result.breakdown.effective_positive,
            result.breakdown.total_negative
        ),
    ];

    if records.is_empty() {
        lines.push("  No records.".to_string());
    } else {
        let mut ordered: Vec<&StudentRecord> = records.iter().collect();
        ordered.sort_by(|a, b| b.date.cmp(&a.date));
        lines.push(String::new());
        lines.extend(ordered.into_iter().map(|r| format_record_line(r, use_colors)));
    }

    lines.join("\n")
}

/// Violations grouped by category and level, then positive rules
pub fn format_catalog(catalog: &Catalog, use_colors: bool) -> String {
    let heading = |text: &str| {
        if use_colors {
            text.bold().underline().to_string()
        } else {
            text.to_string()
        }
    };

    let mut lines = vec![heading("Violations")];
    let mut levels: Vec<u8> = catalog
        .violations()
        .filter(|v| v.category == Category::General)
        .map(|v| v.level)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    for level in levels {
        lines.push(format!("  Level {}", level));
        for v in catalog.general_at_level(level) {
            lines.push(format!(
                "    {:<18} -{:<3} {} ({} steps)",
                v.id,
                v.deduction,
                v.description,
                v.procedures.len()
            ));
        }
    }

    let staff: Vec<_> = catalog.staff_violations().collect();
    if !staff.is_empty() {
        lines.push("  Staff".to_string());
        for v in staff {
            lines.push(format!(
                "    {:<18} -{:<3} {} (level {})",
                v.id, v.deduction, v.description, v.level
            ));
        }
    }

    lines.push(String::new());
    lines.push(heading("Commendations"));
    for p in catalog.positives() {
        let points = if p.is_variable {
            format!("1-{}", p.points)
        } else {
            format!("+{}", p.points)
        };
        lines.push(format!("    {:<18} {:<4} {}", p.id, points, p.description));
    }

    lines.join("\n")
}

pub fn format_dashboard(counts: &DashboardCounts) -> String {
    format!(
        "Students: {}  With violations: {}  With commendations: {}",
        counts.students, counts.with_violations, counts.with_commendations
    )
}
