use serde::{Serialize, Serializer};
use std::fmt;

use crate::store::{Category, Criteria, Solution};

/// One cell of the cross-tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Score(u8),
    /// The solution never scored this criterion. Distinct from a score of 0.
    NoData,
}

impl Cell {
    pub fn score(self) -> Option<u8> {
        match self {
            Cell::Score(v) => Some(v),
            Cell::NoData => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Score(v) => write!(f, "{}", v),
            Cell::NoData => f.write_str(NO_DATA),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Score(v) => serializer.serialize_u8(*v),
            Cell::NoData => serializer.serialize_none(),
        }
    }
}

/// Placeholder shown for criteria a solution never scored
pub const NO_DATA: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub category: Category,
    pub criterion: String,
    /// One cell per solution, in the table's solution order
    pub cells: Vec<Cell>,
}

/// Criteria down, solutions across
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailTable {
    pub solutions: Vec<String>,
    pub rows: Vec<DetailRow>,
}

/// Build the cross-tab of every criterion the project defines against every
/// solution. Rows follow category order, then definition order.
pub fn cross_tab(criteria: &Criteria, solutions: &[Solution]) -> DetailTable {
    let rows = criteria
        .iter()
        .map(|(category, criterion)| DetailRow {
            category,
            criterion: criterion.to_string(),
            cells: solutions
                .iter()
                .map(|s| match s.score_for(category, criterion) {
                    Some(v) => Cell::Score(v),
                    None => Cell::NoData,
                })
                .collect(),
        })
        .collect();

    DetailTable {
        solutions: solutions.iter().map(|s| s.name.clone()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ScoreEntry;

    fn criteria() -> Criteria {
        Criteria {
            useful: vec!["Speed".to_string(), "Accuracy".to_string()],
            usable: vec!["Setup".to_string()],
            used: vec!["Adoption".to_string()],
        }
    }

    #[test]
    fn test_cross_tab_layout() {
        let solutions = vec![
            Solution {
                name: "Alpha".to_string(),
                scores: vec![
                    ScoreEntry::new(Category::Used, "Adoption", 0),
                    ScoreEntry::new(Category::Useful, "Speed", 8),
                ],
            },
            Solution {
                name: "Beta".to_string(),
                scores: vec![ScoreEntry::new(Category::Usable, "Setup", 6)],
            },
        ];

        let table = cross_tab(&criteria(), &solutions);
        assert_eq!(table.solutions, vec!["Alpha", "Beta"]);

        let labels: Vec<_> = table
            .rows
            .iter()
            .map(|r| (r.category, r.criterion.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (Category::Useful, "Speed"),
                (Category::Useful, "Accuracy"),
                (Category::Usable, "Setup"),
                (Category::Used, "Adoption"),
            ]
        );

        assert_eq!(table.rows[0].cells, vec![Cell::Score(8), Cell::NoData]);
        assert_eq!(table.rows[1].cells, vec![Cell::NoData, Cell::NoData]);
        assert_eq!(table.rows[2].cells, vec![Cell::NoData, Cell::Score(6)]);
        // A recorded zero is not the sentinel
        assert_eq!(table.rows[3].cells, vec![Cell::Score(0), Cell::NoData]);
    }

    #[test]
    fn test_category_must_match() {
        // Same criterion name under another category is not a match
        let solutions = vec![Solution {
            name: "Alpha".to_string(),
            scores: vec![ScoreEntry::new(Category::Used, "Speed", 9)],
        }];
        let table = cross_tab(&criteria(), &solutions);
        assert_eq!(table.rows[0].cells, vec![Cell::NoData]);
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(Cell::Score(7).to_string(), "7");
        assert_eq!(Cell::NoData.to_string(), "-");
        assert_eq!(serde_json::to_string(&Cell::NoData).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Cell::Score(0)).unwrap(), "0");
    }
}
