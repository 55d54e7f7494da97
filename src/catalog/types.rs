use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    /// Offenses committed against school staff, listed separately from the level ladder.
    Staff,
}

/// A catalogued negative behavior with its escalating response ladder.
///
/// Example YAML:
/// ```yaml
/// - id: late-assembly
///   level: 1
///   description: Late to morning assembly
///   deduction: 1
///   procedures:
///     - Verbal warning
///     - Written pledge
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ViolationRule {
    pub id: String,

    /// Severity level, 1 (minor) through 5 (most serious)
    pub level: u8,

    pub description: String,

    /// Points deducted from the score for each occurrence
    pub deduction: u32,

    /// Responses in escalation order; the last entry repeats once exhausted
    pub procedures: Vec<String>,

    #[serde(default)]
    pub category: Category,
}

/// A catalogued commendable behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PositiveRule {
    pub id: String,
    pub description: String,
    pub points: u32,

    /// Variable rules let the recorder choose the award, up to a small cap
    #[serde(default)]
    pub is_variable: bool,
}

/// On-disk shape of the rule catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub violations: Vec<ViolationRule>,

    #[serde(default)]
    pub positives: Vec<PositiveRule>,
}
