pub mod color;
pub mod detail;
pub mod engine;
pub mod risk;

pub use color::{score_color, Rgb};
pub use detail::{cross_tab, Cell, DetailRow, DetailTable, NO_DATA};
pub use engine::{
    balance, category_mean, category_means, evaluate, marker_size, round2, sort_summaries,
    summarize, CategoryMeans, Evaluation, SolutionSummary, SortOrder,
};
pub use risk::{weak_criteria, WeakCriterion, DEFAULT_WEAK_THRESHOLD};
