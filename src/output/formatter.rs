use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::color::{self, Rgb};
use crate::scoring::{Cell, DetailTable, SolutionSummary, WeakCriterion};

/// Column help shown by `show --explain`
pub const COLUMN_DESCRIPTIONS: [(&str, &str); 6] = [
    ("Solution", "Name of the evaluated solution"),
    ("Useful", "Mean score out of 10 on the 'Useful' criteria"),
    ("Usable", "Mean score out of 10 on the usability criteria"),
    ("Used", "Mean score out of 10 on the adoption criteria"),
    ("Perfo", "Overall performance (mean of the three scores)"),
    (
        "Balance",
        "Balance between the three dimensions (10 = perfectly even, lower = skewed)",
    ),
];

const SEPARATOR: &str = "  ";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Two decimals, as every aggregate is displayed
pub fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}

/// Balance with the "no data" placeholder when undefined
pub fn format_balance(balance: Option<f64>) -> String {
    match balance {
        Some(b) => format_number(b),
        None => crate::scoring::NO_DATA.to_string(),
    }
}

struct TableCell {
    text: String,
    background: Option<Rgb>,
    right: bool,
}

impl TableCell {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            background: None,
            right: false,
        }
    }

    fn value(text: String, background: Rgb) -> Self {
        Self {
            text,
            background: Some(background),
            right: true,
        }
    }
}

/// Lay out a header plus rows with per-column widths. Padding happens before
/// colouring so escape codes never skew the alignment.
fn render_table(headers: &[&str], rows: &[Vec<TableCell>], use_colors: bool) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.text.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<width$}", h, width = *w))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let padded = if cell.right {
                    format!("{:>width$}", cell.text, width = *w)
                } else {
                    format!("{:<width$}", cell.text, width = *w)
                };
                match (use_colors, cell.background) {
                    (true, Some(bg)) => padded
                        .on_truecolor(bg.r, bg.g, bg.b)
                        .truecolor(color::TEXT.r, color::TEXT.g, color::TEXT.b)
                        .to_string(),
                    _ => padded,
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Summary table: one line per solution with means, performance and balance
pub fn format_summary_table(summaries: &[SolutionSummary], use_colors: bool) -> String {
    if summaries.is_empty() {
        return "No solutions recorded.".to_string();
    }

    let headers = ["Solution", "Useful", "Usable", "Used", "Perfo", "Balance"];
    let rows: Vec<Vec<TableCell>> = summaries
        .iter()
        .map(|s| {
            let balance_bg = s.balance.map(color::score_color).unwrap_or(color::NO_DATA);
            vec![
                TableCell::text(s.solution.clone()),
                TableCell::value(format_number(s.means.useful), color::score_color(s.means.useful)),
                TableCell::value(format_number(s.means.usable), color::score_color(s.means.usable)),
                TableCell::value(format_number(s.means.used), color::score_color(s.means.used)),
                TableCell::value(format_number(s.performance), color::score_color(s.performance)),
                TableCell::value(format_balance(s.balance), balance_bg),
            ]
        })
        .collect();

    render_table(&headers, &rows, use_colors)
}

/// Criteria down, solutions across. Unscored cells show the placeholder.
pub fn format_detail_table(table: &DetailTable, use_colors: bool) -> String {
    if table.rows.is_empty() {
        return "No criteria defined.".to_string();
    }

    // Long criterion names give way first when the terminal is narrow
    let fixed: usize = 10
        + table
            .solutions
            .iter()
            .map(|s| s.chars().count().max(3) + 2 + SEPARATOR.len())
            .sum::<usize>();
    let criterion_width = get_terminal_width()
        .map(|w| w.saturating_sub(fixed).max(20))
        .unwrap_or(usize::MAX);

    let mut headers: Vec<&str> = vec!["Category", "Criterion"];
    headers.extend(table.solutions.iter().map(String::as_str));

    let rows: Vec<Vec<TableCell>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                TableCell::text(row.category.label()),
                TableCell::text(truncate_text(&row.criterion, criterion_width)),
            ];
            cells.extend(row.cells.iter().map(|cell| match cell {
                Cell::Score(v) => TableCell::value(v.to_string(), color::score_color(f64::from(*v))),
                Cell::NoData => TableCell::value(cell.to_string(), color::NO_DATA),
            }));
            cells
        })
        .collect();

    render_table(&headers, &rows, use_colors)
}

/// Format summaries as tab-separated values for scripting
/// Columns: solution, useful, usable, used, performance, balance (no headers, no colors)
pub fn format_tsv(summaries: &[SolutionSummary]) -> String {
    summaries
        .iter()
        .map(|s| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                s.solution,
                format_number(s.means.useful),
                format_number(s.means.usable),
                format_number(s.means.used),
                format_number(s.performance),
                format_balance(s.balance)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Weak criteria, weakest first, with every solution's score
pub fn format_weak_criteria(weak: &[WeakCriterion], threshold: u8, use_colors: bool) -> String {
    if weak.is_empty() {
        return format!("No criterion scored below {}.", threshold);
    }

    weak.iter()
        .map(|w| {
            let scores = w
                .scores
                .iter()
                .map(|(solution, score)| {
                    let text = format!("{}={}", solution, score);
                    if use_colors && *score < threshold {
                        text.red().to_string()
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let label = format!("{} / {}", w.category, w.criterion);
            let label = if use_colors {
                label.bold().to_string()
            } else {
                label
            };
            format!("{}  mean {}  ({})", label, format_number(w.mean), scores)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One project per line
pub fn format_project_list(projects: &[String], use_colors: bool) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    projects
        .iter()
        .map(|p| {
            if use_colors {
                p.cyan().to_string()
            } else {
                p.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_column_descriptions() -> String {
    COLUMN_DESCRIPTIONS
        .iter()
        .map(|(column, description)| format!("{:<8}  {}", column, description))
        .collect::<Vec<_>>()
        .join("\n")
}
