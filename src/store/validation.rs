use super::error::StoreError;
use super::storage::PROJECT_FILE;
use super::types::ScoreEntry;

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 10;

/// Check that a project or solution name can be used as a file-system entry
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("reserved path component")
    } else if name.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if name.starts_with('.') {
        Some("must not start with a dot")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Solution names additionally must not shadow the project descriptor
pub fn validate_solution_name(name: &str) -> Result<(), StoreError> {
    validate_name(name)?;
    if PROJECT_FILE.strip_suffix(".json") == Some(name) {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "reserved for the project descriptor",
        });
    }
    Ok(())
}

/// Check a raw score value typed by the user
pub fn validate_score(criterion: &str, score: i64) -> Result<u8, StoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score as u8)
    } else {
        Err(StoreError::InvalidScore {
            criterion: criterion.to_string(),
            score,
        })
    }
}

/// Validate every entry of a score set.
/// Returns all validation errors at once (not just the first).
pub fn validate_scores(scores: &[ScoreEntry]) -> Result<(), Vec<StoreError>> {
    let errors: Vec<StoreError> = scores
        .iter()
        .filter_map(|e| validate_score(&e.criterion, i64::from(e.score)).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
