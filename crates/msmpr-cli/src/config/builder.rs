use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::RunArgs;
use crate::error::Result;
use crate::utils::parser::{self, ParseError};
use msmpr::engine::config::SimulationConfigBuilder;
use tracing::debug;

/// Merges defaults, the optional config file, `--set` overrides and explicit flags,
/// in increasing order of precedence.
pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let solver_file = file_config.solver.take().unwrap_or_default();
    let sampling_file = file_config.sampling.take().unwrap_or_default();

    let settings_file = args
        .settings
        .clone()
        .or(file_config.settings_file)
        .unwrap_or(defaults.settings_file);
    let results_dir = args
        .results_dir
        .clone()
        .or(file_config.results_dir)
        .unwrap_or(defaults.results_dir);

    let simulation = SimulationConfigBuilder::new()
        .initial_guess(
            args.initial_guess
                .or(solver_file.initial_guess)
                .unwrap_or(defaults.initial_guess),
        )
        .relative_tolerance(
            args.tolerance
                .or(solver_file.relative_tolerance)
                .unwrap_or(defaults.relative_tolerance),
        )
        .max_iterations(
            args.max_iterations
                .or(solver_file.max_iterations)
                .unwrap_or(defaults.max_iterations),
        )
        .mesh_size(
            args.mesh_size
                .or(sampling_file.mesh_size)
                .unwrap_or(defaults.mesh_size),
        )
        .cutoff_factor(
            args.cutoff_factor
                .or(sampling_file.cutoff_factor)
                .unwrap_or(defaults.cutoff_factor),
        )
        .build()?;
    debug!("Resolved simulation configuration: {:?}", simulation);

    // Relative paths hang off the working directory; absolute ones replace it.
    Ok(AppConfig {
        settings_path: args.working_dir.join(settings_file),
        results_dir: args.working_dir.join(results_dir),
        working_dir: args.working_dir.clone(),
        simulation,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = parser::parse_key_value(kv_pair)?;
        match key {
            "settings-file" => config.settings_file = Some(value.into()),
            "results-dir" => config.results_dir = Some(value.into()),
            "solver.initial-guess" => {
                config.solver.get_or_insert_with(Default::default).initial_guess =
                    Some(parser::parse_value(key, value, "float")?);
            }
            "solver.relative-tolerance" => {
                config
                    .solver
                    .get_or_insert_with(Default::default)
                    .relative_tolerance = Some(parser::parse_value(key, value, "float")?);
            }
            "solver.max-iterations" => {
                config.solver.get_or_insert_with(Default::default).max_iterations =
                    Some(parser::parse_value(key, value, "integer")?);
            }
            "sampling.mesh-size" => {
                config.sampling.get_or_insert_with(Default::default).mesh_size =
                    Some(parser::parse_value(key, value, "float")?);
            }
            "sampling.cutoff-factor" => {
                config.sampling.get_or_insert_with(Default::default).cutoff_factor =
                    Some(parser::parse_value(key, value, "float")?);
            }
            _ => return Err(ParseError::UnsupportedKey(key.to_string()).into()),
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_run_args(dir: &std::path::Path) -> RunArgs {
        RunArgs {
            working_dir: dir.to_path_buf(),
            config: None,
            settings: None,
            results_dir: None,
            mesh_size: None,
            cutoff_factor: None,
            initial_guess: None,
            tolerance: None,
            max_iterations: None,
            set_values: vec![],
        }
    }

    #[test]
    fn defaults_fill_every_value() {
        let dir = tempdir().unwrap();
        let config = build_config(&base_run_args(dir.path())).unwrap();

        assert_eq!(config.settings_path, dir.path().join("setting.csv"));
        assert_eq!(config.results_dir, dir.path().join("Result"));
        assert_eq!(config.simulation.solver.initial_guess, 10.0);
        assert_eq!(config.simulation.solver.relative_tolerance, 1e-8);
        assert_eq!(config.simulation.solver.max_iterations, 200);
        assert_eq!(config.simulation.sampling.mesh_size, 1.0);
        assert_eq!(config.simulation.sampling.cutoff_factor, 15.0);
    }

    #[test]
    fn file_values_override_defaults_and_flags_override_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("run.toml");
        fs::write(
            &config_path,
            r#"
            results-dir = "Out"
            [solver]
            initial-guess = 3.0
            [sampling]
            mesh-size = 2.0
            cutoff-factor = 10.0
            "#,
        )
        .unwrap();

        let mut args = base_run_args(dir.path());
        args.config = Some(config_path);
        args.mesh_size = Some(0.25);
        let config = build_config(&args).unwrap();

        assert_eq!(config.results_dir, dir.path().join("Out"));
        assert_eq!(config.simulation.solver.initial_guess, 3.0);
        assert_eq!(config.simulation.sampling.mesh_size, 0.25);
        assert_eq!(config.simulation.sampling.cutoff_factor, 10.0);
    }

    #[test]
    fn set_values_sit_between_file_and_flags() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args(dir.path());
        args.set_values = vec![
            "solver.max-iterations=50".to_string(),
            "sampling.mesh-size=4".to_string(),
            "settings-file=params.toml".to_string(),
        ];
        args.max_iterations = Some(75);
        let config = build_config(&args).unwrap();

        assert_eq!(config.simulation.solver.max_iterations, 75);
        assert_eq!(config.simulation.sampling.mesh_size, 4.0);
        assert_eq!(config.settings_path, dir.path().join("params.toml"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let mut args = base_run_args(dir.path());
        args.results_dir = Some(elsewhere.path().to_path_buf());
        let config = build_config(&args).unwrap();
        assert_eq!(config.results_dir, PathBuf::from(elsewhere.path()));
    }

    #[test]
    fn unsupported_or_malformed_set_values_fail() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args(dir.path());
        args.set_values = vec!["solver.damping=0.5".to_string()];
        assert!(matches!(
            build_config(&args),
            Err(CliError::SetValue(ParseError::UnsupportedKey(_)))
        ));

        args.set_values = vec!["solver.max-iterations=many".to_string()];
        assert!(matches!(
            build_config(&args),
            Err(CliError::SetValue(ParseError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn invalid_values_are_rejected_by_core_builder() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args(dir.path());
        args.mesh_size = Some(0.0);
        match build_config(&args) {
            Err(CliError::Config(message)) => assert!(message.contains("mesh_size")),
            other => panic!("expected configuration error, got {:?}", other.err()),
        }
    }
}
