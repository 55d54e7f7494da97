use std::fmt;

/// Standing band derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ideal,
    Distinguished,
    NeedsImprovement,
    NeedsCloseFollowUp,
}

impl Status {
    /// Bands are checked from the top down; each lower bound is inclusive.
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Status::Ideal
        } else if score >= 80 {
            Status::Distinguished
        } else if score >= 60 {
            Status::NeedsImprovement
        } else {
            Status::NeedsCloseFollowUp
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Ideal => "ideal",
            Status::Distinguished => "distinguished",
            Status::NeedsImprovement => "needs improvement",
            Status::NeedsCloseFollowUp => "needs close follow-up",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
