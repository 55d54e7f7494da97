pub mod engine;
pub mod procedure;
pub mod status;

pub use engine::{calculate_score, score_for_student, ScoreBreakdown, ScoreResult, POSITIVE_CAP};
pub use procedure::{next_procedure, prior_occurrences, ProcedureError, ProcedureStep};
pub use status::Status;
