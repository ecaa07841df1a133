use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::detail::{cross_tab, DetailTable};
use crate::store::{Category, Project, Solution};

/// Mean score of each category for one solution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryMeans {
    pub useful: f64,
    pub usable: f64,
    pub used: f64,
}

impl CategoryMeans {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Useful => self.useful,
            Category::Usable => self.usable,
            Category::Used => self.used,
        }
    }

    pub fn total(&self) -> f64 {
        self.useful + self.usable + self.used
    }
}

/// Aggregates computed for one solution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionSummary {
    pub solution: String,
    pub means: CategoryMeans,
    /// Sum of the three category means
    pub total: f64,
    /// Mean of the three category means
    pub performance: f64,
    /// 10 = perfectly even, lower = skewed; `None` when every mean is zero
    pub balance: Option<f64>,
    /// Marker size for the ternary chart
    pub size: f64,
}

/// Everything a view needs for one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub project: String,
    pub description: String,
    pub summaries: Vec<SolutionSummary>,
    pub detail: DetailTable,
}

impl Evaluation {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Mean of the scores a solution recorded under `category`, or 0 when it
/// recorded none. Criteria the project no longer defines still count.
pub fn category_mean(solution: &Solution, category: Category) -> f64 {
    let (sum, count) = solution
        .scores_in(category)
        .fold((0u32, 0u32), |(sum, count), s| (sum + u32::from(s), count + 1));

    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

pub fn category_means(solution: &Solution) -> CategoryMeans {
    CategoryMeans {
        useful: category_mean(solution, Category::Useful),
        usable: category_mean(solution, Category::Usable),
        used: category_mean(solution, Category::Used),
    }
}

/// Balance between the three category means, rounded to 2 decimals.
///
/// The means are a point in 3-space; its distance `d` to the equal-split
/// point `(t/3, t/3, t/3)` is normalised by `2t/sqrt(3)` and inverted onto
/// a 0..=10 scale. Undefined (`None`) when the total is zero.
pub fn balance(means: &CategoryMeans) -> Option<f64> {
    let total = means.total();
    if total <= 0.0 {
        return None;
    }

    let center = total / 3.0;
    let distance = ((means.useful - center).powi(2)
        + (means.usable - center).powi(2)
        + (means.used - center).powi(2))
    .sqrt();
    let max_distance = 2.0 * total / 3f64.sqrt();

    let balance = 10.0 * (1.0 - distance / max_distance);
    Some(round2(balance.clamp(0.0, 10.0)))
}

/// Size of a solution's marker. The fifth power exaggerates differences
/// between close performers.
pub fn marker_size(performance: f64) -> f64 {
    performance.powi(5)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn summarize(solution: &Solution) -> SolutionSummary {
    let means = category_means(solution);
    let total = means.total();
    let performance = total / 3.0;

    SolutionSummary {
        solution: solution.name.clone(),
        means,
        total,
        performance,
        balance: balance(&means),
        size: marker_size(performance),
    }
}

/// Score every solution of a project and build its cross-tab.
/// Pure: the same inputs always give the same evaluation.
pub fn evaluate(project: &Project, solutions: &[Solution]) -> Evaluation {
    let summaries: Vec<SolutionSummary> = solutions.iter().map(summarize).collect();
    tracing::debug!(
        project = %project.name,
        solutions = summaries.len(),
        "evaluated project"
    );

    Evaluation {
        project: project.name.clone(),
        description: project.description.clone(),
        summaries,
        detail: cross_tab(&project.criteria, solutions),
    }
}

/// Row order of the summary table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Store listing order (solution file name)
    #[default]
    Name,
    Performance,
    Balance,
}

impl SortOrder {
    /// Next order in the cycle used by the viewer's `s` key
    pub fn next(self) -> Self {
        match self {
            SortOrder::Name => SortOrder::Performance,
            SortOrder::Performance => SortOrder::Balance,
            SortOrder::Balance => SortOrder::Name,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Name => "name",
            SortOrder::Performance => "performance",
            SortOrder::Balance => "balance",
        })
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "performance" | "perf" | "perfo" => Ok(SortOrder::Performance),
            "balance" => Ok(SortOrder::Balance),
            other => Err(format!(
                "unknown sort order '{}' (expected name, performance or balance)",
                other
            )),
        }
    }
}

/// Sort summaries in place. Performance and balance sort descending;
/// missing balances go last; ties keep their current order.
pub fn sort_summaries(summaries: &mut [SolutionSummary], order: SortOrder) {
    match order {
        SortOrder::Name => {}
        SortOrder::Performance => summaries.sort_by(|a, b| {
            b.performance
                .partial_cmp(&a.performance)
                .unwrap_or(Ordering::Equal)
        }),
        SortOrder::Balance => summaries.sort_by(|a, b| match (a.balance, b.balance) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Criteria, ScoreEntry};

    fn solution(name: &str, useful: &[u8], usable: &[u8], used: &[u8]) -> Solution {
        let mut scores = Vec::new();
        for (i, s) in useful.iter().enumerate() {
            scores.push(ScoreEntry::new(Category::Useful, &format!("u{}", i), *s));
        }
        for (i, s) in usable.iter().enumerate() {
            scores.push(ScoreEntry::new(Category::Usable, &format!("a{}", i), *s));
        }
        for (i, s) in used.iter().enumerate() {
            scores.push(ScoreEntry::new(Category::Used, &format!("d{}", i), *s));
        }
        Solution {
            name: name.to_string(),
            scores,
        }
    }

    fn means(useful: f64, usable: f64, used: f64) -> CategoryMeans {
        CategoryMeans {
            useful,
            usable,
            used,
        }
    }

    #[test]
    fn test_worked_example() {
        let s = solution("A", &[8, 6], &[4], &[10]);
        let summary = summarize(&s);

        assert_eq!(summary.means, means(7.0, 4.0, 10.0));
        assert_eq!(summary.total, 21.0);
        assert_eq!(summary.performance, 7.0);
        assert_eq!(summary.balance, Some(8.25));
        assert_eq!(summary.size, 16807.0);
    }

    #[test]
    fn test_equal_means_balance_is_ten() {
        let s = solution("A", &[5, 5], &[5], &[4, 6]);
        let summary = summarize(&s);
        assert_eq!(summary.total, 15.0);
        assert_eq!(summary.balance, Some(10.0));
    }

    #[test]
    fn test_equal_means_any_positive_total() {
        for v in [0.5, 1.0, 3.3, 7.0, 10.0] {
            assert_eq!(balance(&means(v, v, v)), Some(10.0), "means = {}", v);
        }
    }

    #[test]
    fn test_empty_category_mean_is_zero() {
        let s = solution("A", &[9, 7], &[], &[3]);
        let m = category_means(&s);
        assert_eq!(m.useful, 8.0);
        assert_eq!(m.usable, 0.0);
        assert_eq!(m.used, 3.0);
    }

    #[test]
    fn test_mean_uses_exactly_the_tagged_scores() {
        let s = solution("A", &[1, 2, 3, 4], &[10], &[0, 10]);
        assert_eq!(category_mean(&s, Category::Useful), 2.5);
        assert_eq!(category_mean(&s, Category::Usable), 10.0);
        assert_eq!(category_mean(&s, Category::Used), 5.0);
    }

    #[test]
    fn test_performance_is_mean_of_means() {
        let s = solution("A", &[3], &[8, 9], &[2, 2, 5]);
        let summary = summarize(&s);
        let m = summary.means;
        assert!((summary.performance - (m.useful + m.usable + m.used) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total_has_no_balance() {
        let s = solution("A", &[0], &[0], &[]);
        let summary = summarize(&s);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.performance, 0.0);
        assert_eq!(summary.balance, None);

        let empty = solution("B", &[], &[], &[]);
        assert_eq!(summarize(&empty).balance, None);
    }

    #[test]
    fn test_balance_decreases_as_means_diverge() {
        // Fixed total of 15, moving toward the Useful corner
        let steps = [
            means(5.0, 5.0, 5.0),
            means(6.0, 5.0, 4.0),
            means(8.0, 4.0, 3.0),
            means(10.0, 3.0, 2.0),
            means(13.0, 1.0, 1.0),
            means(15.0, 0.0, 0.0),
        ];
        let balances: Vec<f64> = steps.iter().map(|m| balance(m).unwrap()).collect();
        for pair in balances.windows(2) {
            assert!(pair[0] > pair[1], "balances not decreasing: {:?}", balances);
        }
    }

    #[test]
    fn test_balance_stays_in_range() {
        for m in [means(10.0, 0.0, 0.0), means(0.0, 0.0, 0.1), means(10.0, 10.0, 0.0)] {
            let b = balance(&m).unwrap();
            assert!((0.0..=10.0).contains(&b), "balance {} out of range", b);
        }
        // Corner of the simplex sits well inside the normalising radius
        assert_eq!(balance(&means(10.0, 0.0, 0.0)), Some(2.93));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(8.2504), 8.25);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_evaluate_empty_project() {
        let project = Project::new("demo", "");
        let eval = evaluate(&project, &[]);
        assert!(eval.is_empty());
        assert!(eval.detail.solutions.is_empty());
    }

    #[test]
    fn test_evaluate_aggregates_undefined_criteria() {
        let mut project = Project::new("demo", "desc");
        project.criteria = Criteria {
            useful: vec!["u0".to_string()],
            usable: vec![],
            used: vec![],
        };
        // "d0" is not defined by the project but still counts
        let s = solution("A", &[6], &[], &[9]);
        let eval = evaluate(&project, &[s]);

        assert_eq!(eval.summaries[0].means.used, 9.0);
        assert_eq!(eval.detail.rows.len(), 1);
        assert_eq!(eval.description, "desc");
    }

    #[test]
    fn test_sort_by_performance() {
        let mut summaries = vec![
            summarize(&solution("low", &[2], &[2], &[2])),
            summarize(&solution("high", &[9], &[9], &[9])),
            summarize(&solution("mid", &[5], &[5], &[5])),
        ];
        sort_summaries(&mut summaries, SortOrder::Performance);
        let names: Vec<_> = summaries.iter().map(|s| s.solution.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_sort_by_balance_missing_last() {
        let mut summaries = vec![
            summarize(&solution("zero", &[0], &[0], &[0])),
            summarize(&solution("skewed", &[10], &[0], &[0])),
            summarize(&solution("even", &[6], &[6], &[6])),
        ];
        sort_summaries(&mut summaries, SortOrder::Balance);
        let names: Vec<_> = summaries.iter().map(|s| s.solution.as_str()).collect();
        assert_eq!(names, vec!["even", "skewed", "zero"]);
    }

    #[test]
    fn test_sort_by_name_keeps_listing_order() {
        let mut summaries = vec![
            summarize(&solution("b", &[1], &[1], &[1])),
            summarize(&solution("a", &[9], &[9], &[9])),
        ];
        sort_summaries(&mut summaries, SortOrder::Name);
        assert_eq!(summaries[0].solution, "b");
    }

    #[test]
    fn test_sort_order_parse_and_cycle() {
        assert_eq!("Perfo".parse::<SortOrder>().unwrap(), SortOrder::Performance);
        assert_eq!("balance".parse::<SortOrder>().unwrap(), SortOrder::Balance);
        assert!("random".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Balance.next(), SortOrder::Name);
        assert_eq!(SortOrder::Name.next().to_string(), "performance");
    }
}
