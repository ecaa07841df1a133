use serde::Serialize;
use std::cmp::Ordering;

use crate::store::{Category, Solution};

/// Score threshold under which a criterion is considered at risk
pub const DEFAULT_WEAK_THRESHOLD: u8 = 5;

/// A criterion that at least one solution scored below the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakCriterion {
    pub category: Category,
    pub criterion: String,
    /// Mean over every solution that scored the criterion
    pub mean: f64,
    /// (solution, score) in solution order
    pub scores: Vec<(String, u8)>,
}

impl WeakCriterion {
    pub fn lowest(&self) -> Option<u8> {
        self.scores.iter().map(|(_, s)| *s).min()
    }
}

/// Criteria where some solution scored below `threshold`, weakest mean first.
///
/// Works from what the solutions recorded, so criteria dropped from the
/// project definition are still reported.
pub fn weak_criteria(solutions: &[Solution], threshold: u8) -> Vec<WeakCriterion> {
    let mut all: Vec<WeakCriterion> = Vec::new();

    for solution in solutions {
        for entry in &solution.scores {
            let existing = all
                .iter_mut()
                .find(|w| w.category == entry.category && w.criterion == entry.criterion);
            match existing {
                Some(w) => {
                    if !w.scores.iter().any(|(name, _)| name == &solution.name) {
                        w.scores.push((solution.name.clone(), entry.score));
                    }
                }
                None => all.push(WeakCriterion {
                    category: entry.category,
                    criterion: entry.criterion.clone(),
                    mean: 0.0,
                    scores: vec![(solution.name.clone(), entry.score)],
                }),
            }
        }
    }

    let mut weak: Vec<WeakCriterion> = all
        .into_iter()
        .filter(|w| w.scores.iter().any(|(_, s)| *s < threshold))
        .map(|mut w| {
            let sum: u32 = w.scores.iter().map(|(_, s)| u32::from(*s)).sum();
            w.mean = f64::from(sum) / w.scores.len() as f64;
            w
        })
        .collect();

    weak.sort_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap_or(Ordering::Equal));
    weak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ScoreEntry;

    fn solution(name: &str, scores: &[(Category, &str, u8)]) -> Solution {
        Solution {
            name: name.to_string(),
            scores: scores
                .iter()
                .map(|(c, n, s)| ScoreEntry::new(*c, n, *s))
                .collect(),
        }
    }

    #[test]
    fn test_weak_criteria_filter_and_order() {
        let solutions = vec![
            solution(
                "Alpha",
                &[
                    (Category::Useful, "Speed", 9),
                    (Category::Usable, "Setup", 4),
                    (Category::Used, "Adoption", 2),
                ],
            ),
            solution(
                "Beta",
                &[
                    (Category::Useful, "Speed", 8),
                    (Category::Usable, "Setup", 8),
                    (Category::Used, "Adoption", 3),
                ],
            ),
        ];

        let weak = weak_criteria(&solutions, DEFAULT_WEAK_THRESHOLD);
        assert_eq!(weak.len(), 2);
        assert_eq!(weak[0].criterion, "Adoption");
        assert_eq!(weak[0].mean, 2.5);
        assert_eq!(weak[0].lowest(), Some(2));
        assert_eq!(weak[1].criterion, "Setup");
        assert_eq!(weak[1].mean, 6.0);
        assert_eq!(
            weak[1].scores,
            vec![("Alpha".to_string(), 4), ("Beta".to_string(), 8)]
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let solutions = vec![solution("Alpha", &[(Category::Useful, "Speed", 5)])];
        assert!(weak_criteria(&solutions, 5).is_empty());
        assert_eq!(weak_criteria(&solutions, 6).len(), 1);
    }

    #[test]
    fn test_same_name_in_two_categories_kept_apart() {
        let solutions = vec![solution(
            "Alpha",
            &[(Category::Useful, "Docs", 1), (Category::Usable, "Docs", 9)],
        )];
        let weak = weak_criteria(&solutions, 5);
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].category, Category::Useful);
    }

    #[test]
    fn test_no_solutions() {
        assert!(weak_criteria(&[], 5).is_empty());
    }
}
