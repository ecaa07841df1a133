use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three fixed evaluation dimensions.
///
/// Files on disk carry the French labels (`Utile`, `Utilisable`, `Utilisé`);
/// everything user-facing uses the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Utile")]
    Useful,
    #[serde(rename = "Utilisable")]
    Usable,
    #[serde(rename = "Utilisé")]
    Used,
}

impl Category {
    /// Canonical order used by every table and by the cross-tab
    pub const ALL: [Category; 3] = [Category::Useful, Category::Usable, Category::Used];

    pub fn label(self) -> &'static str {
        match self {
            Category::Useful => "Useful",
            Category::Usable => "Usable",
            Category::Used => "Used",
        }
    }

    /// Label as persisted in `projet.json` and solution files
    pub fn stored_label(self) -> &'static str {
        match self {
            Category::Useful => "Utile",
            Category::Usable => "Utilisable",
            Category::Used => "Utilisé",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the English or the stored label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted || c.stored_label().to_lowercase() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown category '{}' (expected one of: Useful, Usable, Used)",
                    s.trim()
                )
            })
    }
}

/// Criterion names per category, in definition order.
///
/// Always covers the three categories; a descriptor saved with an empty
/// `criteres` object loads as three empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(rename = "Utile", default)]
    pub useful: Vec<String>,
    #[serde(rename = "Utilisable", default)]
    pub usable: Vec<String>,
    #[serde(rename = "Utilisé", default)]
    pub used: Vec<String>,
}

impl Criteria {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Useful => &self.useful,
            Category::Usable => &self.usable,
            Category::Used => &self.used,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Useful => &mut self.useful,
            Category::Usable => &mut self.usable,
            Category::Used => &mut self.used,
        }
    }

    /// Every (category, criterion) pair in category order, then definition order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |cat| self.get(cat).iter().map(move |name| (cat, name.as_str())))
    }

    pub fn len(&self) -> usize {
        self.useful.len() + self.usable.len() + self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Project descriptor (`projet.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "criteres", default)]
    pub criteria: Criteria,
}

impl Project {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            criteria: Criteria::default(),
        }
    }
}

/// A single recorded score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "categorie")]
    pub category: Category,
    #[serde(rename = "critere")]
    pub criterion: String,
    #[serde(rename = "note")]
    pub score: u8,
}

impl ScoreEntry {
    pub fn new(category: Category, criterion: &str, score: u8) -> Self {
        Self {
            category,
            criterion: criterion.to_string(),
            score,
        }
    }
}

/// Evaluation record for one solution (`<solution>.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(rename = "solution")]
    pub name: String,
    #[serde(rename = "criteres", default)]
    pub scores: Vec<ScoreEntry>,
}

impl Solution {
    /// Score recorded for an exact (category, criterion) pair.
    /// The first occurrence wins when a pair was recorded twice.
    pub fn score_for(&self, category: Category, criterion: &str) -> Option<u8> {
        self.scores
            .iter()
            .find(|e| e.category == category && e.criterion == criterion)
            .map(|e| e.score)
    }

    /// All scores tagged with a category, including criteria the project no
    /// longer defines
    pub fn scores_in(&self, category: Category) -> impl Iterator<Item = u8> + '_ {
        self.scores
            .iter()
            .filter(move |e| e.category == category)
            .map(|e| e.score)
    }
}
