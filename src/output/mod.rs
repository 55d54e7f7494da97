pub mod formatter;

pub use formatter::{
    format_catalog, format_dashboard, format_record_line, format_score, format_student_detail,
    format_student_table, should_use_colors, StudentRow,
};
