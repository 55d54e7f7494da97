use super::types::{CatalogFile, Category, PositiveRule, ViolationRule};

fn violation(
    id: &str,
    level: u8,
    description: &str,
    deduction: u32,
    procedures: &[&str],
    category: Category,
) -> ViolationRule {
    ViolationRule {
        id: id.to_string(),
        level,
        description: description.to_string(),
        deduction,
        procedures: procedures.iter().map(|p| p.to_string()).collect(),
        category,
    }
}

fn positive(id: &str, description: &str, points: u32, is_variable: bool) -> PositiveRule {
    PositiveRule {
        id: id.to_string(),
        description: description.to_string(),
        points,
        is_variable,
    }
}

/// Built-in catalog used when no `catalog_path` is configured.
impl Default for super::Catalog {
    fn default() -> Self {
        super::Catalog::from_file(builtin_catalog())
    }
}

pub fn builtin_catalog() -> CatalogFile {
    use Category::{General, Staff};

    CatalogFile {
        violations: vec![
            violation(
                "late-assembly",
                1,
                "Late to morning assembly without excuse",
                1,
                &[
                    "Verbal warning from the class teacher",
                    "Written pledge signed by the student",
                    "Parent notified by phone",
                ],
                General,
            ),
            violation(
                "uniform",
                1,
                "Not wearing the school uniform",
                1,
                &[
                    "Verbal warning from the class teacher",
                    "Parent notified by phone",
                ],
                General,
            ),
            violation(
                "leave-class",
                2,
                "Leaving class without permission",
                2,
                &[
                    "Written pledge signed by the student",
                    "Parent notified and summoned",
                    "Referral to the student counselor",
                ],
                General,
            ),
            violation(
                "phone-use",
                2,
                "Using a mobile phone during class",
                2,
                &[
                    "Device confiscated until end of day",
                    "Device returned to parent only",
                ],
                General,
            ),
            violation(
                "fighting",
                3,
                "Fighting with a classmate",
                5,
                &[
                    "Parent summoned and written pledge",
                    "Transfer to another class",
                    "Referral to the discipline committee",
                ],
                General,
            ),
            violation(
                "vandalism",
                4,
                "Damaging school property",
                10,
                &[
                    "Repair or replacement at parent cost and written warning",
                    "Suspension for up to three days",
                ],
                General,
            ),
            violation(
                "weapon",
                5,
                "Bringing a weapon to school",
                15,
                &["Immediate referral to the education office"],
                General,
            ),
            violation(
                "staff-disrespect",
                4,
                "Disrespecting a staff member",
                10,
                &[
                    "Written apology and parent summoned",
                    "Suspension for up to five days",
                ],
                Staff,
            ),
            violation(
                "staff-assault",
                5,
                "Assaulting a staff member",
                20,
                &["Immediate referral to the education office"],
                Staff,
            ),
        ],
        positives: vec![
            positive("attendance", "Full attendance for the term", 5, false),
            positive("helping", "Helping classmates with their studies", 3, false),
            positive("initiative", "Taking part in a school initiative", 4, false),
            positive("volunteer", "Volunteering in school activities", 6, true),
            positive("mentor", "Mentoring a peer through a difficult period", 6, true),
            positive("award", "Winning a regional competition", 20, false),
        ],
    }
}
