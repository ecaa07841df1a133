use ratatui::widgets::{ListState, TableState};
use std::time::{Duration, Instant};

use super::theme::ThemeColors;
use crate::scoring::{self, Evaluation, SortOrder};
use crate::store::ProjectStore;

const FLASH_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Summary,
    Ternary,
    Detail,
}

impl View {
    pub const ALL: [View; 3] = [View::Summary, View::Ternary, View::Detail];

    pub fn title(self) -> &'static str {
        match self {
            View::Summary => "Summary",
            View::Ternary => "Ternary",
            View::Detail => "Detail",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Summary => 0,
            View::Ternary => 1,
            View::Detail => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    ProjectPicker,
}

/// Viewer state. Everything the screen shows is derived from `evaluation`,
/// which is rebuilt from disk on every (re)load.
pub struct App {
    pub store: ProjectStore,
    pub projects: Vec<String>,
    pub project: Option<String>,
    pub evaluation: Option<Evaluation>,
    pub load_error: Option<String>,
    pub sort: SortOrder,
    pub current_view: View,
    pub input_mode: InputMode,
    pub summary_state: TableState,
    pub detail_state: TableState,
    pub picker_state: ListState,
    pub flash_message: Option<(String, bool, Instant)>,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(store: ProjectStore, project: Option<String>, theme: ThemeColors) -> Self {
        let mut app = Self {
            store,
            projects: Vec::new(),
            project: None,
            evaluation: None,
            load_error: None,
            sort: SortOrder::default(),
            current_view: View::Summary,
            input_mode: InputMode::Normal,
            summary_state: TableState::default(),
            detail_state: TableState::default(),
            picker_state: ListState::default(),
            flash_message: None,
            should_quit: false,
            theme,
        };

        app.refresh_projects();
        match project {
            Some(name) => app.select_project(name),
            None => app.open_picker(),
        }
        app
    }

    fn refresh_projects(&mut self) {
        match self.store.list_projects() {
            Ok(projects) => self.projects = projects,
            Err(e) => {
                tracing::warn!(error = %e, "could not list projects");
                self.set_flash(format!("Could not list projects: {}", e), true);
            }
        }
    }

    /// Re-read the current project from disk and recompute everything
    pub fn load(&mut self) {
        let Some(name) = self.project.clone() else {
            return;
        };

        let result = self.store.load_project(&name).and_then(|project| {
            let solutions = self.store.list_solutions(&name)?;
            Ok(scoring::evaluate(&project, &solutions))
        });

        match result {
            Ok(mut evaluation) => {
                scoring::sort_summaries(&mut evaluation.summaries, self.sort);
                clamp_selection(&mut self.summary_state, evaluation.summaries.len());
                clamp_selection(&mut self.detail_state, evaluation.detail.rows.len());
                self.evaluation = Some(evaluation);
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!(project = %name, error = %e, "could not load project");
                self.evaluation = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn reload(&mut self) {
        self.refresh_projects();
        self.load();
        if self.load_error.is_none() {
            self.set_flash("Reloaded".to_string(), false);
        }
    }

    pub fn select_project(&mut self, name: String) {
        self.project = Some(name);
        self.summary_state = TableState::default();
        self.detail_state = TableState::default();
        self.input_mode = InputMode::Normal;
        self.load();
    }

    pub fn open_picker(&mut self) {
        self.refresh_projects();
        let current = self
            .project
            .as_ref()
            .and_then(|p| self.projects.iter().position(|name| name == p));
        self.picker_state
            .select(current.or(if self.projects.is_empty() { None } else { Some(0) }));
        self.input_mode = InputMode::ProjectPicker;
    }

    /// Open the project highlighted in the picker
    pub fn confirm_picker(&mut self) {
        let chosen = self
            .picker_state
            .selected()
            .and_then(|i| self.projects.get(i))
            .cloned();
        if let Some(name) = chosen {
            self.select_project(name);
        }
    }

    pub fn close_picker(&mut self) {
        if self.project.is_some() {
            self.input_mode = InputMode::Normal;
        } else {
            self.should_quit = true;
        }
    }

    pub fn picker_next(&mut self) {
        step(&mut self.picker_state, self.projects.len(), 1);
    }

    pub fn picker_previous(&mut self) {
        step(&mut self.picker_state, self.projects.len(), -1);
    }

    pub fn next_view(&mut self) {
        self.current_view = View::ALL[(self.current_view.index() + 1) % View::ALL.len()];
    }

    pub fn previous_view(&mut self) {
        let len = View::ALL.len();
        self.current_view = View::ALL[(self.current_view.index() + len - 1) % len];
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn next_row(&mut self) {
        self.move_row(1);
    }

    pub fn previous_row(&mut self) {
        self.move_row(-1);
    }

    fn move_row(&mut self, delta: isize) {
        let Some(evaluation) = &self.evaluation else {
            return;
        };
        match self.current_view {
            View::Summary | View::Ternary => {
                step(&mut self.summary_state, evaluation.summaries.len(), delta)
            }
            View::Detail => step(&mut self.detail_state, evaluation.detail.rows.len(), delta),
        }
    }

    /// Cycle name -> performance -> balance, keeping the selected solution selected
    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        let Some(evaluation) = &mut self.evaluation else {
            return;
        };

        let selected = self
            .summary_state
            .selected()
            .and_then(|i| evaluation.summaries.get(i))
            .map(|s| s.solution.clone());

        if self.sort == SortOrder::Name {
            // Listing order is the detail table's column order
            let order = &evaluation.detail.solutions;
            evaluation.summaries.sort_by_key(|s| {
                order
                    .iter()
                    .position(|name| name == &s.solution)
                    .unwrap_or(usize::MAX)
            });
        } else {
            scoring::sort_summaries(&mut evaluation.summaries, self.sort);
        }

        if let Some(name) = selected {
            let index = evaluation.summaries.iter().position(|s| s.solution == name);
            self.summary_state.select(index);
        }
        self.set_flash(format!("Sorted by {}", self.sort), false);
    }

    /// Index of the highlighted solution in the summary order
    pub fn selected_solution(&self) -> Option<usize> {
        self.summary_state.selected()
    }

    pub fn set_flash(&mut self, message: String, is_error: bool) {
        self.flash_message = Some((message, is_error, Instant::now()));
    }

    /// Drop the flash message once it has been shown long enough
    pub fn update_flash(&mut self) {
        if let Some((_, _, shown_at)) = &self.flash_message {
            if shown_at.elapsed() >= FLASH_DURATION {
                self.flash_message = None;
            }
        }
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    let selected = match (state.selected(), len) {
        (_, 0) => None,
        (Some(i), len) => Some(i.min(len - 1)),
        (None, _) => Some(0),
    };
    state.select(selected);
}

/// Move a selection by `delta`, wrapping around
fn step<S: Selectable>(state: &mut S, len: usize, delta: isize) {
    if len == 0 {
        state.choose(None);
        return;
    }
    let current = state.chosen().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(len as isize) as usize;
    state.choose(Some(next));
}

trait Selectable {
    fn chosen(&self) -> Option<usize>;
    fn choose(&mut self, index: Option<usize>);
}

impl Selectable for TableState {
    fn chosen(&self) -> Option<usize> {
        self.selected()
    }

    fn choose(&mut self, index: Option<usize>) {
        self.select(index);
    }
}

impl Selectable for ListState {
    fn chosen(&self) -> Option<usize> {
        self.selected()
    }

    fn choose(&mut self, index: Option<usize>) {
        self.select(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Category, Criteria, ScoreEntry};
    use std::fs;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, ProjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        store.create_project("demo", "Demo").unwrap();
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
                    ScoreEntry::new(Category::Useful, "Speed", 2),
                    ScoreEntry::new(Category::Usable, "Setup", 2),
                    ScoreEntry::new(Category::Used, "Adoption", 2),
                ],
            )
            .unwrap();
        store
            .save_solution(
                "demo",
                "Beta",
                vec![
                    ScoreEntry::new(Category::Useful, "Speed", 9),
                    ScoreEntry::new(Category::Usable, "Setup", 1),
                ],
            )
            .unwrap();
        store.create_project("other", "").unwrap();
        (dir, store)
    }

    fn names(app: &App) -> Vec<String> {
        app.evaluation
            .as_ref()
            .unwrap()
            .summaries
            .iter()
            .map(|s| s.solution.clone())
            .collect()
    }

    #[test]
    fn test_new_with_project_loads_it() {
        let (_dir, store) = seeded_store();
        let app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(names(&app), vec!["Alpha", "Beta"]);
        assert_eq!(app.summary_state.selected(), Some(0));
        assert_eq!(app.projects, vec!["demo", "other"]);
    }

    #[test]
    fn test_new_without_project_opens_picker() {
        let (_dir, store) = seeded_store();
        let mut app = App::new(store, None, ThemeColors::dark());
        assert_eq!(app.input_mode, InputMode::ProjectPicker);
        assert_eq!(app.picker_state.selected(), Some(0));

        app.picker_next();
        app.confirm_picker();
        assert_eq!(app.project.as_deref(), Some("other"));
        assert!(app.evaluation.as_ref().unwrap().is_empty());
        assert_eq!(app.summary_state.selected(), None);
    }

    #[test]
    fn test_close_picker_without_project_quits() {
        let (_dir, store) = seeded_store();
        let mut app = App::new(store, None, ThemeColors::dark());
        app.close_picker();
        assert!(app.should_quit);
    }

    #[test]
    fn test_missing_project_reports_error() {
        let (_dir, store) = seeded_store();
        let app = App::new(store, Some("ghost".to_string()), ThemeColors::dark());
        assert!(app.evaluation.is_none());
        assert!(app.load_error.as_ref().unwrap().contains("not found"));
    }

    #[test]
    fn test_malformed_solution_aborts_view() {
        let (_dir, store) = seeded_store();
        fs::write(store.project_dir("demo").join("Gamma.json"), "{").unwrap();
        let app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        assert!(app.evaluation.is_none());
        assert!(app.load_error.as_ref().unwrap().contains("malformed"));
    }

    #[test]
    fn test_cycle_sort_keeps_selection() {
        let (_dir, store) = seeded_store();
        let mut app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        app.next_row(); // Beta
        app.cycle_sort(); // performance: Beta 3.33 > Alpha 2.00
        assert_eq!(app.sort, SortOrder::Performance);
        assert_eq!(names(&app), vec!["Beta", "Alpha"]);
        assert_eq!(app.selected_solution(), Some(0));

        app.cycle_sort(); // balance: Alpha 10 > Beta
        assert_eq!(names(&app), vec!["Alpha", "Beta"]);
        assert_eq!(app.selected_solution(), Some(1));

        app.cycle_sort(); // back to name
        assert_eq!(names(&app), vec!["Alpha", "Beta"]);
        assert_eq!(app.sort, SortOrder::Name);
    }

    #[test]
    fn test_row_navigation_wraps() {
        let (_dir, store) = seeded_store();
        let mut app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        app.previous_row();
        assert_eq!(app.summary_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.summary_state.selected(), Some(0));

        app.set_view(View::Detail);
        app.previous_row();
        assert_eq!(app.detail_state.selected(), Some(2));
    }

    #[test]
    fn test_view_cycle() {
        let (_dir, store) = seeded_store();
        let mut app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        app.next_view();
        assert_eq!(app.current_view, View::Ternary);
        app.next_view();
        app.next_view();
        assert_eq!(app.current_view, View::Summary);
        app.previous_view();
        assert_eq!(app.current_view, View::Detail);
    }

    #[test]
    fn test_reload_picks_up_new_solutions() {
        let (_dir, store) = seeded_store();
        let mut app = App::new(store.clone(), Some("demo".to_string()), ThemeColors::dark());
        store
            .save_solution("demo", "Gamma", vec![ScoreEntry::new(Category::Used, "Adoption", 7)])
            .unwrap();
        app.reload();
        assert_eq!(names(&app), vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(app.flash_message.as_ref().unwrap().0, "Reloaded");
    }
}
