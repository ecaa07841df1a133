pub mod error;
pub mod storage;
pub mod types;
pub mod validation;

pub use error::StoreError;
pub use storage::{ProjectStore, PROJECT_FILE};
pub use types::{Category, Criteria, Project, ScoreEntry, Solution};
pub use validation::{validate_name, validate_score, validate_solution_name, validate_scores};
