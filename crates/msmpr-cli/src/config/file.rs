use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolverConfig {
    pub initial_guess: Option<f64>,
    pub relative_tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSamplingConfig {
    pub mesh_size: Option<f64>,
    pub cutoff_factor: Option<f64>,
}

/// Run configuration as written in a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub settings_file: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub solver: Option<FileSolverConfig>,
    pub sampling: Option<FileSamplingConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading run configuration from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_nested_kebab_case_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            r#"
            settings-file = "inputs/setting.toml"

            [solver]
            initial-guess = 5.0
            max-iterations = 80

            [sampling]
            mesh-size = 0.5
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.settings_file, Some(PathBuf::from("inputs/setting.toml")));
        assert_eq!(config.results_dir, None);
        let solver = config.solver.unwrap();
        assert_eq!(solver.initial_guess, Some(5.0));
        assert_eq!(solver.relative_tolerance, None);
        assert_eq!(solver.max_iterations, Some(80));
        assert_eq!(config.sampling.unwrap().mesh_size, Some(0.5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "[sampling]\nmesh = 1.0\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parsing error, got {:?}", other),
        }
    }
}
