pub mod defaults;
pub mod types;
pub mod validation;

pub use defaults::builtin_catalog;
pub use types::{CatalogFile, Category, PositiveRule, ViolationRule};
pub use validation::{validate_catalog, FIXED_POINTS_CAP, VARIABLE_POINTS_CAP};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Rule catalog indexed by id.
///
/// Built once at startup and never mutated afterwards. Declaration order is
/// kept alongside the maps so listings read the same way as the source file.
#[derive(Debug, Clone)]
pub struct Catalog {
    violations: HashMap<String, ViolationRule>,
    violation_order: Vec<String>,
    positives: HashMap<String, PositiveRule>,
    positive_order: Vec<String>,
}

impl Catalog {
    /// Index a catalog file. Duplicate ids keep the first definition; run
    /// `validate_catalog` beforehand to reject them.
    pub fn from_file(file: CatalogFile) -> Self {
        let mut violations = HashMap::new();
        let mut violation_order = Vec::new();
        for rule in file.violations {
            if !violations.contains_key(&rule.id) {
                violation_order.push(rule.id.clone());
                violations.insert(rule.id.clone(), rule);
            }
        }

        let mut positives = HashMap::new();
        let mut positive_order = Vec::new();
        for rule in file.positives {
            if !positives.contains_key(&rule.id) {
                positive_order.push(rule.id.clone());
                positives.insert(rule.id.clone(), rule);
            }
        }

        Self {
            violations,
            violation_order,
            positives,
            positive_order,
        }
    }

    pub fn violation(&self, id: &str) -> Option<&ViolationRule> {
        self.violations.get(id)
    }

    pub fn positive(&self, id: &str) -> Option<&PositiveRule> {
        self.positives.get(id)
    }

    /// All violations in declaration order
    pub fn violations(&self) -> impl Iterator<Item = &ViolationRule> {
        self.violation_order
            .iter()
            .filter_map(|id| self.violations.get(id))
    }

    /// All positive rules in declaration order
    pub fn positives(&self) -> impl Iterator<Item = &PositiveRule> {
        self.positive_order
            .iter()
            .filter_map(|id| self.positives.get(id))
    }

    /// General violations at one level, as offered by the level picker
    pub fn general_at_level(&self, level: u8) -> impl Iterator<Item = &ViolationRule> {
        self.violations()
            .filter(move |v| v.level == level && v.category == Category::General)
    }

    /// Offenses against staff, regardless of level
    pub fn staff_violations(&self) -> impl Iterator<Item = &ViolationRule> {
        self.violations().filter(|v| v.category == Category::Staff)
    }
}

/// Load and validate a catalog from a YAML file.
///
/// Validation errors are joined into a single error so the caller can report
/// every problem at once.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;

    let file: CatalogFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: invalid YAML in {}", path.display()))?;

    if let Err(errors) = validate_catalog(&file) {
        anyhow::bail!(
            "Invalid catalog {}:\n  - {}",
            path.display(),
            errors.join("\n  - ")
        );
    }

    tracing::debug!(
        violations = file.violations.len(),
        positives = file.positives.len(),
        "loaded catalog from {}",
        path.display()
    );

    Ok(Catalog::from_file(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::default();
        let rule = catalog.violation("fighting").unwrap();
        assert_eq!(rule.level, 3);
        assert!(catalog.violation("does-not-exist").is_none());
        assert!(catalog.positive("volunteer").unwrap().is_variable);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let catalog = Catalog::default();
        let ids: Vec<&str> = catalog.violations().map(|v| v.id.as_str()).collect();
        assert_eq!(ids[0], "late-assembly");
        assert_eq!(ids[1], "uniform");
    }

    #[test]
    fn test_general_at_level_excludes_staff() {
        let catalog = Catalog::default();
        let level_four: Vec<&str> = catalog.general_at_level(4).map(|v| v.id.as_str()).collect();
        assert_eq!(level_four, vec!["vandalism"]);
        assert!(catalog
            .staff_violations()
            .all(|v| v.category == Category::Staff));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut file = builtin_catalog();
        let mut dup = file.violations[0].clone();
        dup.deduction = 99;
        file.violations.push(dup);
        let catalog = Catalog::from_file(file);
        assert_eq!(catalog.violation("late-assembly").unwrap().deduction, 1);
    }

    #[test]
    fn test_load_catalog_from_yaml() {
        let path = env::temp_dir().join("conduct_board_test_catalog.yaml");
        let yaml = r#"
violations:
  - id: v1
    level: 1
    description: Late to class
    deduction: 1
    procedures: ["Warning", "Pledge"]
positives:
  - id: p1
    description: Helping classmates
    points: 3
"#;
        std::fs::write(&path, yaml).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.violation("v1").unwrap().procedures.len(), 2);
        assert_eq!(catalog.positive("p1").unwrap().points, 3);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_catalog_rejects_invalid_rules() {
        let path = env::temp_dir().join("conduct_board_test_bad_catalog.yaml");
        let yaml = r#"
violations:
  - id: v1
    level: 9
    description: Late to class
    deduction: 0
    procedures: []
"#;
        std::fs::write(&path, yaml).unwrap();
        let err = load_catalog(&path).unwrap_err().to_string();
        assert!(err.contains("violations[0].level"));
        assert!(err.contains("violations[0].deduction"));
        assert!(err.contains("violations[0].procedures"));
        let _ = std::fs::remove_file(&path);
    }
}
