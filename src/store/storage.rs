use super::error::StoreError;
use super::types::{Criteria, Project, ScoreEntry, Solution};
use super::validation::{validate_name, validate_solution_name, validate_scores};
use atomic_write_file::AtomicWriteFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name of the project descriptor inside each project directory
pub const PROJECT_FILE: &str = "projet.json";

/// Directory-per-project JSON store.
///
/// Holds no state beyond its root: every call re-reads the files it needs,
/// so the value can be passed around freely and cloned per request.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn project_file(&self, name: &str) -> PathBuf {
        self.project_dir(name).join(PROJECT_FILE)
    }

    fn solution_file(&self, project: &str, solution: &str) -> PathBuf {
        self.project_dir(project).join(format!("{}.json", solution))
    }

    /// Create a project with an empty criteria mapping
    pub fn create_project(&self, name: &str, description: &str) -> Result<Project, StoreError> {
        validate_name(name)?;

        let path = self.project_file(name);
        if path.exists() {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        let dir = self.project_dir(name);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let project = Project::new(name, description);
        write_json(&path, &project)?;
        tracing::info!(project = name, "created project");
        Ok(project)
    }

    pub fn load_project(&self, name: &str) -> Result<Project, StoreError> {
        validate_name(name)?;
        read_json(&self.project_file(name), "project", name)
    }

    /// Replace the criteria mapping wholesale
    pub fn save_criteria(&self, name: &str, criteria: Criteria) -> Result<Project, StoreError> {
        let mut project = self.load_project(name)?;
        project.criteria = criteria;
        write_json(&self.project_file(name), &project)?;
        tracing::info!(
            project = name,
            criteria = project.criteria.len(),
            "saved criteria"
        );
        Ok(project)
    }

    /// Persist (or overwrite) a solution's full score set
    pub fn save_solution(
        &self,
        project: &str,
        solution: &str,
        scores: Vec<ScoreEntry>,
    ) -> Result<Solution, StoreError> {
        validate_solution_name(solution)?;
        if let Err(mut errors) = validate_scores(&scores) {
            return Err(errors.remove(0));
        }

        // Only to surface NotFound / Malformed before writing
        self.load_project(project)?;

        let record = Solution {
            name: solution.to_string(),
            scores,
        };
        write_json(&self.solution_file(project, solution), &record)?;
        tracing::info!(
            project,
            solution,
            scores = record.scores.len(),
            "saved solution"
        );
        Ok(record)
    }

    pub fn load_solution(&self, project: &str, solution: &str) -> Result<Solution, StoreError> {
        validate_name(project)?;
        validate_solution_name(solution)?;
        read_solution(&self.solution_file(project, solution), solution)
    }

    pub fn delete_solution(&self, project: &str, solution: &str) -> Result<(), StoreError> {
        validate_name(project)?;
        validate_solution_name(solution)?;
        let path = self.solution_file(project, solution);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(project, solution, "deleted solution");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
                kind: "solution",
                name: solution.to_string(),
            }),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Names of every directory under the root holding a project descriptor, sorted
    pub fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let path = entry.path();
            if !path.join(PROJECT_FILE).is_file() {
                tracing::debug!(path = %path.display(), "skipping entry without descriptor");
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Every solution record stored under a project, sorted by file name.
    /// The project descriptor itself is excluded.
    pub fn list_solutions(&self, project: &str) -> Result<Vec<Solution>, StoreError> {
        validate_name(project)?;
        let dir = self.project_dir(project);
        if !dir.join(PROJECT_FILE).is_file() {
            return Err(StoreError::NotFound {
                kind: "project",
                name: project.to_string(),
            });
        }

        let pattern = format!(
            "{}{}{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            std::path::MAIN_SEPARATOR,
            "*.json"
        );
        tracing::debug!(pattern = %pattern, "listing solutions");

        let paths = glob::glob(&pattern).map_err(|e| StoreError::Malformed {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for path in paths {
            let path = path.map_err(|e| {
                let path = e.path().to_path_buf();
                StoreError::io(path, e.into_error())
            })?;
            if path.file_name().and_then(|n| n.to_str()) == Some(PROJECT_FILE) {
                continue;
            }
            files.push(path);
        }
        files.sort();

        files
            .iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                read_solution(path, &name)
            })
            .collect()
    }
}

/// Read and parse a JSON file, mapping a missing file to `NotFound`
/// and any parse failure to `Malformed`
fn read_json<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
    name: &str,
) -> Result<T, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                kind,
                name: name.to_string(),
            })
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read a solution file; out-of-range scores make the file `Malformed`
fn read_solution(path: &Path, name: &str) -> Result<Solution, StoreError> {
    let solution: Solution = read_json(path, "solution", name)?;
    if let Err(errors) = validate_scores(&solution.scores) {
        let reason = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(StoreError::Malformed {
            path: path.to_path_buf(),
            reason,
        });
    }
    Ok(solution)
}

/// Write JSON with pretty formatting, atomically
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut file = AtomicWriteFile::open(path).map_err(|e| StoreError::io(path, e))?;

    serde_json::to_writer_pretty(&mut file, value).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    file.write_all(b"\n").map_err(|e| StoreError::io(path, e))?;

    file.commit().map_err(|e| StoreError::io(path, e))?;
    Ok(())
}
