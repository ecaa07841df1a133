use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::store::{validate_score, Category, Criteria, Project, ScoreEntry, Solution};

/// Default number of criteria offered per category
const DEFAULT_CRITERIA_COUNT: usize = 3;

/// Score offered when a criterion has no previous score
const DEFAULT_SCORE: u8 = 5;

/// Line-oriented prompts over any reader/writer pair (stdin/stdout in the CLI)
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input ended before the wizard was complete");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write output")
    }

    /// Ask for a count, then a name per slot, for each category.
    /// Blank names are dropped. Existing names are offered as defaults.
    pub fn criteria(&mut self, project: &Project) -> Result<Criteria> {
        self.say(&format!("Criteria for project '{}'", project.name))?;
        let mut criteria = Criteria::default();

        for category in Category::ALL {
            let existing = project.criteria.get(category);
            let default_count = if existing.is_empty() {
                DEFAULT_CRITERIA_COUNT
            } else {
                existing.len()
            };

            self.say("")?;
            let count: usize = loop {
                let input = self.prompt_with_default(
                    &format!("Number of {} criteria", category),
                    &default_count.to_string(),
                )?;
                match input.parse::<usize>() {
                    Ok(n) if n >= 1 => break n,
                    _ => self.say("  Invalid: must be a whole number of at least 1. Try again.")?,
                }
            };

            for i in 0..count {
                let message = format!("  {} criterion {}", category, i + 1);
                let name = match existing.get(i) {
                    Some(previous) => self.prompt_with_default(&message, previous)?,
                    None => self.prompt(&format!("{}: ", message))?,
                };
                if !name.is_empty() {
                    criteria.get_mut(category).push(name);
                }
            }
        }

        Ok(criteria)
    }

    /// Ask for a 0-10 score on every criterion the project defines
    pub fn scores(
        &mut self,
        project: &Project,
        solution: &str,
        previous: Option<&Solution>,
    ) -> Result<Vec<ScoreEntry>> {
        if project.criteria.is_empty() {
            anyhow::bail!(
                "Project '{}' has no criteria yet. Define them with `eval-ia criteria {}`",
                project.name,
                project.name
            );
        }

        self.say(&format!("Scores for '{}' (0-10)", solution))?;
        let mut scores = Vec::with_capacity(project.criteria.len());
        let mut current = None;

        for (category, criterion) in project.criteria.iter() {
            if current != Some(category) {
                self.say(&format!("\n{}", category))?;
                current = Some(category);
            }

            let default = previous
                .and_then(|s| s.score_for(category, criterion))
                .unwrap_or(DEFAULT_SCORE);

            let score = loop {
                let input =
                    self.prompt_with_default(&format!("  {}", criterion), &default.to_string())?;
                match input.parse::<i64>() {
                    Ok(v) => match validate_score(criterion, v) {
                        Ok(score) => break score,
                        Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
                    },
                    Err(_) => self.say("  Invalid: must be a whole number. Try again.")?,
                }
            };
            scores.push(ScoreEntry::new(category, criterion, score));
        }

        Ok(scores)
    }
}

/// Build criteria from repeated command-line flags, dropping blank names
pub fn criteria_from_flags(useful: &[String], usable: &[String], used: &[String]) -> Criteria {
    let clean = |names: &[String]| -> Vec<String> {
        names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect()
    };
    Criteria {
        useful: clean(useful),
        usable: clean(usable),
        used: clean(used),
    }
}

/// Parse `CATEGORY:CRITERION=SCORE` assignments.
/// Returns all parse errors at once (not just the first).
pub fn parse_assignments(assignments: &[String]) -> Result<Vec<ScoreEntry>, Vec<String>> {
    let mut scores = Vec::new();
    let mut errors = Vec::new();

    for (i, raw) in assignments.iter().enumerate() {
        match parse_assignment(raw) {
            Ok(entry) => scores.push(entry),
            Err(e) => errors.push(format!("--set[{}] '{}': {}", i, raw, e)),
        }
    }

    if errors.is_empty() {
        Ok(scores)
    } else {
        Err(errors)
    }
}

fn parse_assignment(raw: &str) -> Result<ScoreEntry, String> {
    let (target, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| "expected CATEGORY:CRITERION=SCORE".to_string())?;
    let (category, criterion) = target
        .split_once(':')
        .ok_or_else(|| "expected CATEGORY:CRITERION before '='".to_string())?;

    let category: Category = category.parse()?;
    let criterion = criterion.trim();
    if criterion.is_empty() {
        return Err("criterion name is empty".to_string());
    }

    let value: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("score '{}' is not a whole number", value.trim()))?;
    let score = validate_score(criterion, value).map_err(|e| e.to_string())?;

    Ok(ScoreEntry::new(category, criterion, score))
}

/// Criteria referenced by a score set that the project does not define.
/// They are kept (means still count them); callers only warn about them.
pub fn undefined_criteria<'a>(project: &Project, scores: &'a [ScoreEntry]) -> Vec<&'a ScoreEntry> {
    scores
        .iter()
        .filter(|e| {
            !project
                .criteria
                .get(e.category)
                .iter()
                .any(|name| name == &e.criterion)
        })
        .collect()
}
