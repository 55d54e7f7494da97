pub mod message;
pub mod phone;

pub use message::{record_notice, summary_report, RECENT_LIMIT};
pub use phone::normalize_phone;
