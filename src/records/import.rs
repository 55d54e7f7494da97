use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::types::NewStudent;

const NAME_KEYWORDS: &[&str] = &["name", "student", "recipient", "اسم", "طالب", "مستلم"];
const PHONE_KEYWORDS: &[&str] = &["phone", "mobile", "number", "جوال", "هاتف", "رقم"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is empty or has no data rows")]
    NoData,

    #[error("failed to read import file: {0}")]
    Csv(#[from] csv::Error),
}

/// Students accepted from an import, plus how many rows were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub students: Vec<NewStudent>,
    pub skipped: usize,
}

/// Normalize one candidate row.
///
/// Accepted only when the trimmed name is longer than two characters and the
/// phone keeps more than five digits after stripping everything else.
pub fn normalize_row(raw_name: &str, raw_phone: &str) -> Option<NewStudent> {
    let name = raw_name.trim();
    let phone: String = raw_phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if name.chars().count() > 2 && phone.len() > 5 {
        Some(NewStudent {
            name: name.to_string(),
            phone,
        })
    } else {
        None
    }
}

/// Find the name and phone columns from header keywords, defaulting to 0 and 1.
/// When several headers match, the last one wins.
pub fn detect_columns(header: &[&str]) -> (usize, usize) {
    let mut name_idx = 0;
    let mut phone_idx = 1;

    for (idx, cell) in header.iter().enumerate() {
        let cell = cell.to_lowercase();
        if NAME_KEYWORDS.iter().any(|k| cell.contains(k)) {
            name_idx = idx;
        }
        if PHONE_KEYWORDS.iter().any(|k| cell.contains(k)) {
            phone_idx = idx;
        }
    }

    (name_idx, phone_idx)
}

/// Parse CSV rows (first row is the header) into new students.
pub fn parse_rows<R: Read>(reader: R) -> Result<ImportOutcome, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let rows = csv_reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

    if rows.len() < 2 {
        return Err(ImportError::NoData);
    }

    let header: Vec<&str> = rows[0].iter().collect();
    let (name_idx, phone_idx) = detect_columns(&header);

    let mut outcome = ImportOutcome::default();
    for row in &rows[1..] {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let name = row.get(name_idx).unwrap_or_default();
        let phone = row.get(phone_idx).unwrap_or_default();
        match normalize_row(name, phone) {
            Some(student) => outcome.students.push(student),
            None => outcome.skipped += 1,
        }
    }

    tracing::debug!(
        accepted = outcome.students.len(),
        skipped = outcome.skipped,
        name_column = name_idx,
        phone_column = phone_idx,
        "parsed import rows"
    );

    Ok(outcome)
}

pub fn import_file(path: &Path) -> Result<ImportOutcome, ImportError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    parse_rows(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_skipped() {
        assert!(normalize_row("Al", "0551234567").is_none());
    }

    #[test]
    fn test_five_digit_phone_skipped() {
        assert!(normalize_row("Ali Hassan", "12345").is_none());
    }

    #[test]
    fn test_six_digit_phone_accepted() {
        let student = normalize_row("Ali Hassan", "123456").unwrap();
        assert_eq!(student.name, "Ali Hassan");
        assert_eq!(student.phone, "123456");
    }

    #[test]
    fn test_phone_stripped_to_digits() {
        let student = normalize_row("  Sara Ahmed ", "+966 (55) 123-4567").unwrap();
        assert_eq!(student.name, "Sara Ahmed");
        assert_eq!(student.phone, "966551234567");
    }

    #[test]
    fn test_name_length_counts_characters() {
        // Three Arabic letters are more than two characters even though they take six bytes
        assert!(normalize_row("علي", "0551234567").is_some());
    }

    #[test]
    fn test_detect_columns_default() {
        assert_eq!(detect_columns(&["a", "b", "c"]), (0, 1));
    }

    #[test]
    fn test_detect_columns_from_keywords() {
        assert_eq!(detect_columns(&["#", "Mobile", "Student Name"]), (2, 1));
        assert_eq!(detect_columns(&["رقم الجوال", "اسم الطالب"]), (1, 0));
        assert_eq!(detect_columns(&["Recipient", "Notes", "Number"]), (0, 2));
    }

    #[test]
    fn test_parse_rows_counts_skipped() {
        let csv = "\
name,phone
Al,0551234567
Ali Hassan,12345
Ali Hassan,123456
,,
Sara Ahmed,055-123-4567
";
        let outcome = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(outcome.students.len(), 2);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.students[1].phone, "0551234567");
    }

    #[test]
    fn test_parse_rows_missing_phone_cell_skipped() {
        let csv = "name,phone\nOmar Khalid\n";
        let outcome = parse_rows(csv.as_bytes()).unwrap();
        assert!(outcome.students.is_empty());
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_header_only_is_no_data() {
        let result = parse_rows("name,phone\n".as_bytes());
        assert!(matches!(result, Err(ImportError::NoData)));
    }
}
