pub mod formatter;

pub use formatter::{
    format_balance, format_column_descriptions, format_detail_table, format_number,
    format_project_list, format_summary_table, format_tsv, format_weak_criteria,
    should_use_colors, COLUMN_DESCRIPTIONS,
};
