use std::collections::HashSet;

use super::types::CatalogFile;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Largest award a variable positive rule may grant.
pub const VARIABLE_POINTS_CAP: u32 = 6;

/// Largest award any positive rule may grant, matching the score's positive cap.
pub const FIXED_POINTS_CAP: u32 = 20;

/// Validate the rule catalog at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &CatalogFile) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (i, rule) in catalog.violations.iter().enumerate() {
        if rule.id.trim().is_empty() {
            errors.push(format!("violations[{}].id: must not be empty", i));
        } else if !seen.insert(rule.id.as_str()) {
            errors.push(format!("violations[{}].id: duplicate id '{}'", i, rule.id));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&rule.level) {
            errors.push(format!(
                "violations[{}].level: {} is outside {}-{}",
                i, rule.level, MIN_LEVEL, MAX_LEVEL
            ));
        }
        if rule.description.trim().is_empty() {
            errors.push(format!("violations[{}].description: must not be empty", i));
        }
        if rule.deduction == 0 {
            errors.push(format!("violations[{}].deduction: must be positive", i));
        }
        if rule.procedures.is_empty() {
            errors.push(format!(
                "violations[{}].procedures: at least one procedure is required",
                i
            ));
        }
        for (j, procedure) in rule.procedures.iter().enumerate() {
            if procedure.trim().is_empty() {
                errors.push(format!(
                    "violations[{}].procedures[{}]: must not be empty",
                    i, j
                ));
            }
        }
    }

    let mut seen = HashSet::new();
    for (i, rule) in catalog.positives.iter().enumerate() {
        if rule.id.trim().is_empty() {
            errors.push(format!("positives[{}].id: must not be empty", i));
        } else if !seen.insert(rule.id.as_str()) {
            errors.push(format!("positives[{}].id: duplicate id '{}'", i, rule.id));
        }
        if rule.description.trim().is_empty() {
            errors.push(format!("positives[{}].description: must not be empty", i));
        }
        let cap = if rule.is_variable {
            VARIABLE_POINTS_CAP
        } else {
            FIXED_POINTS_CAP
        };
        if rule.points == 0 || rule.points > cap {
            errors.push(format!(
                "positives[{}].points: {} is outside 1-{}",
                i, rule.points, cap
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, PositiveRule, ViolationRule};

    fn violation(id: &str) -> ViolationRule {
        ViolationRule {
            id: id.to_string(),
            level: 1,
            description: "Late to class".to_string(),
            deduction: 1,
            procedures: vec!["Warning".to_string()],
            category: Category::General,
        }
    }

    fn positive(id: &str, points: u32, is_variable: bool) -> PositiveRule {
        PositiveRule {
            id: id.to_string(),
            description: "Helping classmates".to_string(),
            points,
            is_variable,
        }
    }

    #[test]
    fn test_valid_catalog() {
        let catalog = CatalogFile {
            violations: vec![violation("v1"), violation("v2")],
            positives: vec![positive("p1", 5, false), positive("p2", 6, true)],
        };
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(validate_catalog(&CatalogFile::default()).is_ok());
    }

    #[test]
    fn test_empty_procedures_rejected() {
        let mut rule = violation("v1");
        rule.procedures.clear();
        let catalog = CatalogFile {
            violations: vec![rule],
            positives: vec![],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("violations[0].procedures"));
    }

    #[test]
    fn test_level_out_of_range() {
        let mut rule = violation("v1");
        rule.level = 6;
        let catalog = CatalogFile {
            violations: vec![rule],
            positives: vec![],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("violations[0].level"));
    }

    #[test]
    fn test_duplicate_violation_id() {
        let catalog = CatalogFile {
            violations: vec![violation("v1"), violation("v1")],
            positives: vec![],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("duplicate id 'v1'"));
    }

    #[test]
    fn test_variable_rule_over_cap() {
        let catalog = CatalogFile {
            violations: vec![],
            positives: vec![positive("p1", 7, true)],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("positives[0].points"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_violation = violation("v1");
        bad_violation.deduction = 0; // Error 1
        bad_violation.level = 0; // Error 2
        let catalog = CatalogFile {
            violations: vec![bad_violation],
            positives: vec![positive("p1", 0, false)], // Error 3
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
