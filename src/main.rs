use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;

use eval_ia::scoring::SortOrder;
use eval_ia::store::{ProjectStore, StoreError};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_STORE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    /// Aligned tables, coloured when stdout is a terminal
    #[default]
    Table,
    /// Tab-separated summary rows, no header
    Tsv,
    /// Summaries and detail table as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List projects (default if no subcommand)
    List,
    /// Create an empty project
    Create {
        name: String,
        /// Free-text description of the project
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Define a project's criteria (interactive unless flags are given)
    Criteria {
        project: String,
        #[arg(long, value_name = "NAME")]
        useful: Vec<String>,
        #[arg(long, value_name = "NAME")]
        usable: Vec<String>,
        #[arg(long, value_name = "NAME")]
        used: Vec<String>,
    },
    /// Record a solution's scores (interactive unless --set is given)
    Score {
        project: String,
        solution: String,
        /// Score assignment, e.g. --set "Useful:Speed=8" (repeatable)
        #[arg(long = "set", value_name = "CAT:CRIT=N")]
        assignments: Vec<String>,
    },
    /// Delete a solution's scores
    Remove { project: String, solution: String },
    /// Print the summary and detail tables of a project
    Show {
        project: String,
        /// Row order: name, performance or balance
        #[arg(long, default_value = "name")]
        sort: SortOrder,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Describe each summary column
        #[arg(long)]
        explain: bool,
    },
    /// List criteria where some solution scored below a threshold
    Risks {
        project: String,
        /// Scores strictly below this are weak (defaults to config weak_threshold)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        threshold: Option<u8>,
    },
    /// Open the full-screen viewer
    View { project: Option<String> },
}

#[derive(Parser, Debug)]
#[command(name = "eval-ia")]
#[command(about = "Score solutions on Useful / Usable / Used criteria", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/eval-ia/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Data directory (overrides data_dir from the config file)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    eval_ia::logging::init(cli.verbose);

    // Load config
    let config_path = cli.config.as_deref().map(PathBuf::from);
    let config = match eval_ia::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = eval_ia::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let store = ProjectStore::new(eval_ia::config::resolve_data_dir(&data_dir));
    tracing::debug!(root = %store.root().display(), "using data directory");

    let use_colors = !cli.no_color && eval_ia::output::should_use_colors();
    let command = cli.command.unwrap_or(Commands::List);

    let result = match command {
        Commands::List => list(&store, use_colors),
        Commands::Create { name, description } => {
            create(&store, &name, description.as_deref().unwrap_or_default())
        }
        Commands::Criteria {
            project,
            useful,
            usable,
            used,
        } => criteria(&store, &project, &useful, &usable, &used),
        Commands::Score {
            project,
            solution,
            assignments,
        } => score(&store, &project, &solution, &assignments),
        Commands::Remove { project, solution } => remove(&store, &project, &solution),
        Commands::Show {
            project,
            sort,
            format,
            explain,
        } => show(&store, &project, sort, format, explain, use_colors),
        Commands::Risks { project, threshold } => risks(
            &store,
            &project,
            threshold.unwrap_or(config.weak_threshold),
            use_colors,
        ),
        Commands::View { project } => view(store, project, config.theme),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Map an application error to the process exit code
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<StoreError>() {
        Some(e) if e.is_user_input() => EXIT_INPUT,
        _ if error.downcast_ref::<InvalidInput>().is_some() => EXIT_INPUT,
        _ => EXIT_STORE,
    }
}

/// Command-line input rejected before touching the store
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct InvalidInput(String);

fn list(store: &ProjectStore, use_colors: bool) -> anyhow::Result<()> {
    let projects = store.list_projects()?;
    println!(
        "{}",
        eval_ia::output::format_project_list(&projects, use_colors)
    );
    Ok(())
}

fn create(store: &ProjectStore, name: &str, description: &str) -> anyhow::Result<()> {
    store.create_project(name, description)?;
    println!(
        "Created project '{}' in {}",
        name,
        store.project_dir(name).display()
    );
    Ok(())
}

fn criteria(
    store: &ProjectStore,
    project: &str,
    useful: &[String],
    usable: &[String],
    used: &[String],
) -> anyhow::Result<()> {
    let current = store.load_project(project)?;

    let criteria = if useful.is_empty() && usable.is_empty() && used.is_empty() {
        let stdin = io::stdin();
        let mut prompter = eval_ia::wizard::Prompter::new(stdin.lock(), io::stdout());
        prompter.criteria(&current)?
    } else {
        eval_ia::wizard::criteria_from_flags(useful, usable, used)
    };

    if criteria.is_empty() {
        return Err(InvalidInput("at least one criterion is required".to_string()).into());
    }

    let saved = store.save_criteria(project, criteria)?;
    println!(
        "Saved {} criteria for project '{}'",
        saved.criteria.len(),
        project
    );
    Ok(())
}

fn score(
    store: &ProjectStore,
    project: &str,
    solution: &str,
    assignments: &[String],
) -> anyhow::Result<()> {
    eval_ia::store::validate_solution_name(solution)?;
    let current = store.load_project(project)?;

    let scores = if assignments.is_empty() {
        let previous = match store.load_solution(project, solution) {
            Ok(s) => Some(s),
            Err(StoreError::NotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };
        let stdin = io::stdin();
        let mut prompter = eval_ia::wizard::Prompter::new(stdin.lock(), io::stdout());
        prompter.scores(&current, solution, previous.as_ref())?
    } else {
        match eval_ia::wizard::parse_assignments(assignments) {
            Ok(scores) => scores,
            Err(errors) => {
                eprintln!("Invalid score assignments:");
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                return Err(InvalidInput(format!("{} invalid assignment(s)", errors.len())).into());
            }
        }
    };

    for entry in eval_ia::wizard::undefined_criteria(&current, &scores) {
        tracing::warn!(
            category = %entry.category,
            criterion = %entry.criterion,
            "criterion is not defined in project '{}'; it still counts toward the mean",
            project
        );
    }

    let saved = store.save_solution(project, solution, scores)?;
    println!(
        "Saved {} scores for solution '{}' in project '{}'",
        saved.scores.len(),
        solution,
        project
    );
    Ok(())
}

fn remove(store: &ProjectStore, project: &str, solution: &str) -> anyhow::Result<()> {
    store.delete_solution(project, solution)?;
    println!("Removed solution '{}' from project '{}'", solution, project);
    Ok(())
}

fn show(
    store: &ProjectStore,
    project: &str,
    sort: SortOrder,
    format: OutputFormat,
    explain: bool,
    use_colors: bool,
) -> anyhow::Result<()> {
    let current = store.load_project(project)?;
    let solutions = store.list_solutions(project)?;
    let mut evaluation = eval_ia::scoring::evaluate(&current, &solutions);
    eval_ia::scoring::sort_summaries(&mut evaluation.summaries, sort);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&evaluation)
                .context("Failed to serialize evaluation")?;
            println!("{}", json);
        }
        OutputFormat::Tsv => {
            if !evaluation.is_empty() {
                println!("{}", eval_ia::output::format_tsv(&evaluation.summaries));
            }
        }
        OutputFormat::Table => {
            if evaluation.is_empty() {
                println!("No solutions recorded for project '{}'.", current.name);
            } else {
                println!(
                    "{}",
                    eval_ia::output::format_summary_table(&evaluation.summaries, use_colors)
                );
                println!();
                println!(
                    "{}",
                    eval_ia::output::format_detail_table(&evaluation.detail, use_colors)
                );
            }
            if explain {
                println!();
                println!("{}", eval_ia::output::format_column_descriptions());
            }
        }
    }
    Ok(())
}

fn risks(
    store: &ProjectStore,
    project: &str,
    threshold: u8,
    use_colors: bool,
) -> anyhow::Result<()> {
    store.load_project(project)?;
    let solutions = store.list_solutions(project)?;
    let weak = eval_ia::scoring::weak_criteria(&solutions, threshold);
    println!(
        "{}",
        eval_ia::output::format_weak_criteria(&weak, threshold, use_colors)
    );
    Ok(())
}

fn view(
    store: ProjectStore,
    project: Option<String>,
    theme: eval_ia::config::ThemePreference,
) -> anyhow::Result<()> {
    let theme = eval_ia::tui::resolve_theme(theme);
    let app = eval_ia::tui::App::new(store, project, theme);
    eval_ia::tui::run_tui(app)
}
