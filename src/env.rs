//! Process environment bootstrap
//!
//! Variables from a local `.env` file are copied into the process
//! environment once, before any configuration is read. There is no reload:
//! later calls observe the outcome of the first one. Existing process
//! variables always win over file values.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Outcome of loading the `.env` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvStatus {
    /// File found and applied
    Loaded(PathBuf),
    /// No file present; nothing was changed
    Missing,
    /// File present but unreadable or malformed; loading stopped at the error
    Invalid(String),
}

impl EnvStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, EnvStatus::Loaded(_))
    }
}

static ENV_STATUS: OnceLock<EnvStatus> = OnceLock::new();

/// Load `.env` from the working directory or its ancestors, once per process.
///
/// Must run before logging and configuration are initialized, since both
/// read the environment.
pub fn init() -> &'static EnvStatus {
    ENV_STATUS.get_or_init(|| classify(dotenvy::dotenv(), None))
}

/// Load a specific env file without touching the process-wide status
pub fn load_file(path: &Path) -> EnvStatus {
    classify(dotenvy::from_path(path).map(|()| path.to_path_buf()), Some(path))
}

fn classify(result: Result<PathBuf, dotenvy::Error>, requested: Option<&Path>) -> EnvStatus {
    match result {
        Ok(path) => EnvStatus::Loaded(path),
        Err(e) if e.not_found() => EnvStatus::Missing,
        Err(e) => match requested {
            Some(path) => EnvStatus::Invalid(format!("{}: {}", path.display(), e)),
            None => EnvStatus::Invalid(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("card-quiz-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_init_runs_once() {
        let first = init();
        let second = init();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_missing_file_is_noop() {
        let path = std::env::temp_dir().join("card-quiz-definitely-missing.env");
        assert_eq!(load_file(&path), EnvStatus::Missing);
    }

    #[test]
    fn test_load_file_sets_variables() {
        let path = scratch_file("ok.env", "CARD_QUIZ_TEST_GREETING=hello\n");

        let status = load_file(&path);

        assert_eq!(status, EnvStatus::Loaded(path.clone()));
        assert!(status.is_loaded());
        assert_eq!(std::env::var("CARD_QUIZ_TEST_GREETING").unwrap(), "hello");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let path = scratch_file("bad.env", "this line is not an assignment\n");

        let status = load_file(&path);

        assert!(matches!(status, EnvStatus::Invalid(_)));
        fs::remove_file(path).ok();
    }
}
