use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap};

use super::app::{App, InputMode, View};
use super::ternary;
use super::theme::series_color;
use crate::output::{format_balance, format_number};
use crate::scoring::Evaluation;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_body(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, app),
        InputMode::ProjectPicker => render_picker_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Eval-IA",
        Style::default().fg(app.theme.title_color).bold(),
    )];

    if let Some(evaluation) = &app.evaluation {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(evaluation.project.clone(), Style::default().bold()));
        if !evaluation.description.is_empty() {
            spans.push(Span::styled(
                format!("  {}", evaluation.description.lines().next().unwrap_or_default()),
                Style::default().fg(app.theme.muted),
            ));
        }
    } else if let Some(project) = &app.project {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(project.clone(), Style::default().bold()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{} {}", i + 1, v.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &mut App) {
    if let Some(error) = &app.load_error {
        let msg = Paragraph::new(vec![
            Line::from(Span::styled(
                "Could not load project",
                Style::default().fg(app.theme.flash_error).bold(),
            )),
            Line::from(""),
            Line::from(error.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Fix the file and press r to reload, or p to pick another project.",
                Style::default().fg(app.theme.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(msg, area);
        return;
    }

    let Some(evaluation) = app.evaluation.as_ref() else {
        let msg = Paragraph::new("No project selected. Press p to pick one.")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    };

    if evaluation.is_empty() && app.current_view != View::Detail {
        let msg = Paragraph::new(format!(
            "No solutions recorded for project '{}'.\nAdd one with `eval-ia score {} <SOLUTION>`.",
            evaluation.project, evaluation.project
        ))
        .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    match app.current_view {
        View::Summary => render_summary(frame, area, app),
        View::Ternary => render_ternary(frame, area, app),
        View::Detail => render_detail(frame, area, app),
    }
}

fn render_summary(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(evaluation) = app.evaluation.as_ref() else {
        return;
    };
    let theme = &app.theme;

    let header = Row::new(["Solution", "Useful", "Usable", "Used", "Perfo", "Balance"])
        .style(theme.header_style);

    let rows: Vec<Row> = evaluation
        .summaries
        .iter()
        .map(|s| {
            let balance_style = match s.balance {
                Some(b) => theme.score_style(b),
                None => theme.no_data_style(),
            };
            Row::new(vec![
                Cell::from(s.solution.clone()),
                score_cell(format_number(s.means.useful), theme.score_style(s.means.useful)),
                score_cell(format_number(s.means.usable), theme.score_style(s.means.usable)),
                score_cell(format_number(s.means.used), theme.score_style(s.means.used)),
                score_cell(format_number(s.performance), theme.score_style(s.performance)),
                score_cell(format_balance(s.balance), balance_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(theme.row_selected)
        .block(Block::bordered().title(format!(" Solutions (sorted by {}) ", app.sort)));

    frame.render_stateful_widget(table, area, &mut app.summary_state);
}

fn score_cell(text: String, style: Style) -> Cell<'static> {
    Cell::from(Line::from(text).alignment(Alignment::Right)).style(style)
}

fn render_detail(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(evaluation) = app.evaluation.as_ref() else {
        return;
    };
    let theme = &app.theme;
    let table_data = &evaluation.detail;

    if table_data.rows.is_empty() {
        let msg = Paragraph::new(format!(
            "No criteria defined.\nDefine them with `eval-ia criteria {}`.",
            evaluation.project
        ))
        .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let mut header_cells = vec![Cell::from("Category"), Cell::from("Criterion")];
    header_cells.extend(table_data.solutions.iter().map(|s| Cell::from(s.clone())));
    let header = Row::new(header_cells).style(theme.header_style);

    let rows: Vec<Row> = table_data
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(row.category.label()),
                Cell::from(row.criterion.clone()),
            ];
            cells.extend(row.cells.iter().map(|cell| {
                let style = match cell.score() {
                    Some(v) => theme.score_style(f64::from(v)),
                    None => theme.no_data_style(),
                };
                Cell::from(Line::from(cell.to_string()).alignment(Alignment::Center)).style(style)
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(8), Constraint::Min(16)];
    widths.extend(
        table_data
            .solutions
            .iter()
            .map(|s| Constraint::Length(s.chars().count().max(3) as u16 + 2)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(theme.row_selected)
        .block(Block::bordered().title(" Criteria detail "));

    frame.render_stateful_widget(table, area, &mut app.detail_state);
}

fn render_ternary(frame: &mut Frame, area: Rect, app: &App) {
    let Some(evaluation) = app.evaluation.as_ref() else {
        return;
    };

    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(30)]).split(area);
    render_ternary_chart(frame, chunks[0], app, evaluation);
    render_ternary_legend(frame, chunks[1], app, evaluation);
}

fn render_ternary_chart(frame: &mut Frame, area: Rect, app: &App, evaluation: &Evaluation) {
    let theme = &app.theme;
    let selected = app.selected_solution();

    let max_size = evaluation
        .summaries
        .iter()
        .map(|s| s.size)
        .fold(0.0_f64, f64::max);

    let markers: Vec<(usize, (f64, f64), f64)> = evaluation
        .summaries
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            ternary::position(&s.means).map(|pos| (i, pos, ternary::marker_radius(s.size, max_size)))
        })
        .collect();

    let guides: Vec<(f64, f64)> = [ternary::TOP, ternary::LEFT, ternary::RIGHT]
        .into_iter()
        .flat_map(|vertex| ternary::dotted(vertex, ternary::CENTROID, 24))
        .collect();

    let edges = [
        (ternary::TOP, ternary::LEFT),
        (ternary::LEFT, ternary::RIGHT),
        (ternary::RIGHT, ternary::TOP),
    ];

    let canvas = Canvas::default()
        .block(Block::bordered().title(" Useful / Usable / Used "))
        .marker(Marker::Braille)
        .x_bounds([-0.15, 1.15])
        .y_bounds([-0.1, 0.95])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &guides,
                color: theme.guide_color,
            });
            for (from, to) in edges {
                ctx.draw(&CanvasLine::new(from.0, from.1, to.0, to.1, theme.axis_color));
            }

            ctx.print(
                ternary::TOP.0 - 0.04,
                ternary::TOP.1 + 0.04,
                Span::styled("Useful", Style::default().bold()),
            );
            ctx.print(
                ternary::LEFT.0 - 0.12,
                ternary::LEFT.1 - 0.06,
                Span::styled("Usable", Style::default().bold()),
            );
            ctx.print(
                ternary::RIGHT.0 - 0.02,
                ternary::RIGHT.1 - 0.06,
                Span::styled("Used", Style::default().bold()),
            );

            ctx.layer();
            for (i, (x, y), radius) in &markers {
                let color = series_color(*i);
                ctx.draw(&Circle {
                    x: *x,
                    y: *y,
                    radius: *radius,
                    color,
                });
                if selected == Some(*i) {
                    ctx.draw(&Circle {
                        x: *x,
                        y: *y,
                        radius: radius * 0.5,
                        color,
                    });
                    ctx.print(
                        *x + radius + 0.01,
                        *y,
                        Span::styled(
                            evaluation.summaries[*i].solution.clone(),
                            Style::default().fg(color).bold(),
                        ),
                    );
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn render_ternary_legend(frame: &mut Frame, area: Rect, app: &App, evaluation: &Evaluation) {
    let selected = app.selected_solution();

    let mut lines: Vec<Line> = Vec::new();
    for (i, s) in evaluation.summaries.iter().enumerate() {
        let marker = if selected == Some(i) { "● " } else { "○ " };
        let name_style = if selected == Some(i) {
            Style::default().bold()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(series_color(i))),
            Span::styled(s.solution.clone(), name_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "  Perfo {}  Balance {}",
                format_number(s.performance),
                format_balance(s.balance)
            ),
            Style::default().fg(app.theme.muted),
        )));
        if ternary::position(&s.means).is_none() {
            lines.push(Line::from(Span::styled(
                "  (all means zero, not plotted)",
                Style::default().fg(app.theme.muted),
            )));
        }
    }

    let legend = Paragraph::new(lines).block(Block::bordered().title(" Solutions "));
    frame.render_widget(legend, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.status_key_color).bold());

    let mut spans = vec![
        key("Tab"),
        Span::raw(" view  "),
        key("j/k"),
        Span::raw(" move  "),
        key("s"),
        Span::raw(" sort  "),
        key("r"),
        Span::raw(" reload  "),
        key("p"),
        Span::raw(" project  "),
        key("?"),
        Span::raw(" help  "),
        key("q"),
        Span::raw(" quit"),
    ];

    if let Some((message, is_error, _)) = &app.flash_message {
        let color = if *is_error {
            theme.flash_error
        } else {
            theme.flash_success
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(message.clone(), Style::default().fg(color)));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bar_bg));
    frame.render_widget(bar, area);
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let entries = [
        ("Tab / Shift-Tab", "next / previous view"),
        ("1 2 3", "Summary, Ternary, Detail"),
        ("j k / arrows", "move selection"),
        ("s", "sort by name, performance, balance"),
        ("r", "reload from disk"),
        ("p", "pick another project"),
        ("q / Esc", "quit"),
    ];

    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(k, desc)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>16}  ", k),
                    Style::default().fg(theme.status_key_color).bold(),
                ),
                Span::raw(*desc),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    for (column, description) in crate::output::COLUMN_DESCRIPTIONS {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>16}  ", column), Style::default().bold()),
            Span::styled(description, Style::default().fg(theme.muted)),
        ]));
    }

    let area = centered_rect(frame.area(), 90, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(theme.popup_bg))
        .block(
            Block::bordered()
                .title(Span::styled(" Help ", theme.popup_title))
                .border_style(Style::default().fg(theme.popup_border)),
        );
    frame.render_widget(popup, area);
}

fn render_picker_popup(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;
    let height = (app.projects.len() as u16).clamp(1, 15) + 2;
    let area = centered_rect(frame.area(), 40, height);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(Span::styled(" Projects ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));

    if app.projects.is_empty() {
        let msg = Paragraph::new("No projects. Create one with `eval-ia create`.")
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .projects
        .iter()
        .map(|p| ListItem::new(p.clone()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.row_selected)
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.picker_state);
}

/// Rectangle of at most `width` x `height` centred in `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Category, Criteria, ProjectStore, ScoreEntry};
    use crate::tui::theme::ThemeColors;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn demo_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        store.create_project("demo", "Demo project").unwrap();
        store
            .save_criteria(
                "demo",
                Criteria {
                    useful: vec!["Speed".to_string()],
                    usable: vec!["Setup".to_string()],
                    used: vec!["Adoption".to_string()],
                },
            )
            .unwrap();
        store
            .save_solution(
                "demo",
                "Alpha",
                vec![
                    ScoreEntry::new(Category::Useful, "Speed", 8),
                    ScoreEntry::new(Category::Usable, "Setup", 4),
                ],
            )
            .unwrap();
        let app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        (dir, app)
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_summary_view_renders() {
        let (_dir, mut app) = demo_app();
        let screen = render(&mut app);
        assert!(screen.contains("Eval-IA"));
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("8.00"));
        assert!(screen.contains("4.00"));
    }

    #[test]
    fn test_detail_view_shows_placeholder() {
        let (_dir, mut app) = demo_app();
        app.set_view(View::Detail);
        let screen = render(&mut app);
        assert!(screen.contains("Adoption"));
        assert!(screen.contains(" - "));
    }

    #[test]
    fn test_ternary_view_renders_legend() {
        let (_dir, mut app) = demo_app();
        app.set_view(View::Ternary);
        let screen = render(&mut app);
        assert!(screen.contains("Useful"));
        assert!(screen.contains("Perfo 4.00"));
    }

    #[test]
    fn test_too_small_terminal() {
        let (_dir, mut app) = demo_app();
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(area, 40, 10);
        assert_eq!(rect, Rect::new(30, 15, 40, 10));
        assert_eq!(centered_rect(Rect::new(0, 0, 10, 5), 40, 10), Rect::new(0, 0, 10, 5));
    }
}
